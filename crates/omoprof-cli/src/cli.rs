//! Command-line argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "omoprof")]
#[command(about = "omoprof - oh-my-opencode profile manager")]
#[command(version)]
pub struct Cli {
    /// Directory holding profiles (overrides settings)
    #[arg(long, global = true, value_name = "DIR")]
    pub profiles_dir: Option<PathBuf>,

    /// Live oh-my-opencode config file (overrides settings)
    #[arg(long, global = true, value_name = "FILE")]
    pub target: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Whether this invocation takes over the terminal
    pub fn opens_tui(&self) -> bool {
        matches!(
            self.command,
            None | Some(Commands::New | Commands::Edit { .. })
        )
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all profiles
    List,
    /// Show a profile
    Show {
        /// Profile name
        name: String,
        /// Print only the config JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a profile, empty or copied from another
    Create {
        /// Profile name
        name: String,
        /// Profile to copy the config from
        #[arg(long, value_name = "PROFILE")]
        from: Option<String>,
    },
    /// Edit a profile in the wizard
    Edit {
        /// Profile name
        name: String,
    },
    /// Create a profile in the wizard
    New,
    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Compare two profiles
    Diff {
        /// First profile
        left: String,
        /// Second profile
        right: String,
        /// Two-column output instead of a unified diff
        #[arg(long)]
        side_by_side: bool,
        /// Column width for side-by-side output
        #[arg(long, default_value_t = 60)]
        width: usize,
    },
    /// Import a config file as a profile
    Import {
        /// Config file to import
        file: PathBuf,
        /// Profile name (defaults to the file name)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Export a profile to a config file
    Export {
        /// Profile name
        name: String,
        /// Output file (defaults to ./<name>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a profile or file against the schema
    Validate {
        /// Profile name
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        name: Option<String>,
        /// Validate a file instead of a stored profile
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
    /// Make a profile the live oh-my-opencode config
    Use {
        /// Profile name
        name: String,
    },
    /// Show which profile matches the live config
    Current,
    /// Compare the built-in schema with the published one
    SchemaCheck,
    /// List models from the model catalog
    Models {
        /// Only show models from this provider
        #[arg(long)]
        provider: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_opens_tui() {
        let cli = Cli::parse_from(["omoprof"]);
        assert!(cli.opens_tui());
        let cli = Cli::parse_from(["omoprof", "list"]);
        assert!(!cli.opens_tui());
    }

    #[test]
    fn test_validate_requires_name_or_file() {
        assert!(Cli::try_parse_from(["omoprof", "validate"]).is_err());
        assert!(Cli::try_parse_from(["omoprof", "validate", "work"]).is_ok());
        assert!(Cli::try_parse_from(["omoprof", "validate", "--file", "x.json"]).is_ok());
        assert!(Cli::try_parse_from(["omoprof", "validate", "work", "--file", "x.json"]).is_err());
    }
}
