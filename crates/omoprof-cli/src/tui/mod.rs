//! Terminal UI
//!
//! Single-threaded event loop: draw, poll the terminal for 100 ms, then
//! drain results from background tasks.

mod app;
mod diff_view;
mod form;
mod list;
mod wizard;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use omoprof_core::SchemaValidator;
use ratatui::DefaultTerminal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::context::AppContext;
use app::{App, AppEvent};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Screen the TUI opens on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launch {
    List,
    /// Wizard for a new profile, exiting when it closes
    Create,
    /// Wizard for an existing profile, exiting when it closes
    Edit(String),
}

/// Run the TUI until the user quits
///
/// # Errors
///
/// Returns an error if the profile to edit cannot be loaded or the
/// terminal fails.
pub async fn run(ctx: AppContext, launch: Launch) -> Result<()> {
    let validator = match SchemaValidator::embedded() {
        Ok(validator) => Some(Arc::new(validator)),
        Err(e) => {
            tracing::error!(error = %e, "embedded schema unusable, saving disabled");
            None
        }
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(ctx, validator, tx);
    app.launch(launch)?;
    app.spawn_catalog();

    let mut terminal = ratatui::init();
    if let Ok(size) = terminal.size() {
        app.resize(size.width, size.height);
    }
    let result = event_loop(&mut terminal, &mut app, &mut rx);
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    rx: &mut UnboundedReceiver<AppEvent>,
) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Resize(width, height) => app.resize(width, height),
                _ => {}
            }
        }

        while let Ok(event) = rx.try_recv() {
            app.handle_event(event);
        }
    }
    Ok(())
}
