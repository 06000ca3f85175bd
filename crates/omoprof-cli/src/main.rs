//! omoprof CLI - Profile manager for the oh-my-opencode config
//!
//! Without a subcommand the terminal UI opens on the profile list.
//! Subcommands cover scripting use: listing, diffing, validating,
//! importing/exporting and switching profiles.

mod cli;
mod commands;
mod context;
mod logging;
mod tui;

use anyhow::Result;
use clap::Parser;
use omoprof_core::settings::Settings;

use crate::cli::{Cli, Commands};
use crate::context::AppContext;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let home = Settings::home_dir()?;
    let log_dir = Settings::log_dir(&home);

    // The TUI owns the terminal, so its logs go to a file instead of stderr.
    let _guard = if cli.opens_tui() {
        logging::cleanup_old_logs(&log_dir);
        Some(logging::init_file(&log_dir)?)
    } else {
        logging::init_stderr();
        None
    };

    let ctx = AppContext::load(home, &cli)?;

    match cli.command {
        None => tui::run(ctx, tui::Launch::List).await,
        Some(Commands::New) => tui::run(ctx, tui::Launch::Create).await,
        Some(Commands::Edit { name }) => tui::run(ctx, tui::Launch::Edit(name)).await,
        Some(Commands::List) => commands::profile::list(&ctx),
        Some(Commands::Show { name, json }) => commands::profile::show(&ctx, &name, json),
        Some(Commands::Create { name, from }) => {
            commands::profile::create(&ctx, &name, from.as_deref())
        }
        Some(Commands::Delete { name, force }) => commands::profile::delete(&ctx, &name, force),
        Some(Commands::Diff {
            left,
            right,
            side_by_side,
            width,
        }) => commands::diff::run(&ctx, &left, &right, side_by_side, width),
        Some(Commands::Import { file, name }) => {
            commands::profile::import(&ctx, &file, name.as_deref())
        }
        Some(Commands::Export { name, output }) => {
            commands::profile::export(&ctx, &name, output.as_deref())
        }
        Some(Commands::Validate { name, file }) => {
            commands::profile::validate(&ctx, name.as_deref(), file.as_deref())
        }
        Some(Commands::Use { name }) => commands::profile::use_profile(&ctx, &name),
        Some(Commands::Current) => commands::profile::current(&ctx),
        Some(Commands::SchemaCheck) => commands::schema::check(&ctx).await,
        Some(Commands::Models { provider }) => {
            commands::models::list(&ctx, provider.as_deref()).await
        }
    }
}
