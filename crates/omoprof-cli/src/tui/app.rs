//! TUI application state
//!
//! Key handling and rendering happen on the event loop. Saving, deleting
//! and activating run on the blocking pool, and the model catalog is
//! fetched on the runtime. Each task owns a copy of its inputs and reports
//! back through an [`AppEvent`].

use anyhow::Result;
use crossterm::event::KeyEvent;
use omoprof_core::profile::{
    activate_profile, commit_profile, detect_active, Activation, CommitOutcome, Profile,
};
use omoprof_core::diff::diff_configs;
use omoprof_core::SchemaValidator;
use omoprof_providers::{build_client, CatalogModel, HttpCatalog, ModelCatalog, NetworkError};
use ratatui::layout::Rect;
use ratatui::Frame;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

use super::diff_view::DiffView;
use super::list::{ListAction, ListView};
use super::wizard::{SaveRequest, Wizard, WizardMode, WizardOutcome};
use super::Launch;
use crate::context::AppContext;

/// Completion of a background task
#[derive(Debug)]
pub enum AppEvent {
    Saved {
        name: String,
        result: Result<CommitOutcome, String>,
    },
    Deleted {
        name: String,
        result: Result<(), String>,
    },
    Activated {
        name: String,
        result: Result<Activation, String>,
    },
    CatalogLoaded(Result<Vec<CatalogModel>, String>),
}

enum Screen {
    List,
    Diff(DiffView),
    Wizard(Box<Wizard>),
}

pub struct App {
    ctx: AppContext,
    validator: Option<Arc<SchemaValidator>>,
    list: ListView,
    screen: Screen,
    /// Catalog models offered in model fields
    models: Vec<CatalogModel>,
    tx: UnboundedSender<AppEvent>,
    /// Opened straight into the wizard from the command line
    exit_after_wizard: bool,
    should_quit: bool,
    size: (u16, u16),
}

impl App {
    pub fn new(
        ctx: AppContext,
        validator: Option<Arc<SchemaValidator>>,
        tx: UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            ctx,
            validator,
            list: ListView::default(),
            screen: Screen::List,
            models: Vec::new(),
            tx,
            exit_after_wizard: false,
            should_quit: false,
            size: (80, 24),
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Open the first screen
    ///
    /// # Errors
    /// Returns an error if a profile to edit cannot be loaded
    pub fn launch(&mut self, launch: Launch) -> Result<()> {
        self.refresh_list();
        match launch {
            Launch::List => {}
            Launch::Create => {
                self.exit_after_wizard = true;
                self.open_wizard(WizardMode::Create);
            }
            Launch::Edit(name) => {
                self.exit_after_wizard = true;
                self.open_edit(&name)?;
            }
        }
        if self.validator.is_none() {
            self.list
                .set_error("Embedded schema failed to load; saving is disabled");
        }
        Ok(())
    }

    fn refresh_list(&mut self) {
        let names = match self.ctx.store.list() {
            Ok(names) => names,
            Err(e) => {
                self.list.set_error(e.to_string());
                Vec::new()
            }
        };
        let active = match detect_active(&self.ctx.store, &self.ctx.target) {
            Ok(active) => active,
            Err(e) => {
                tracing::warn!(error = %e, "could not detect the active profile");
                None
            }
        };
        self.list.set_profiles(names, active);
        self.refresh_preview();
    }

    fn refresh_preview(&mut self) {
        let lines = match self.list.selected_name() {
            None => Vec::new(),
            Some(name) => match self
                .ctx
                .store
                .load(name)
                .map_err(anyhow::Error::from)
                .and_then(|p| p.config.to_json_pretty().map_err(anyhow::Error::from))
            {
                Ok(json) => json.lines().map(ToString::to_string).collect(),
                Err(e) => vec![format!("<{e}>")],
            },
        };
        self.list.set_preview(lines);
    }

    fn open_wizard(&mut self, mode: WizardMode) {
        let taken = self.ctx.store.list().unwrap_or_default();
        let mut wizard = Wizard::new(mode, taken, self.validator.clone());
        wizard.set_model_suggestions(&self.models);
        wizard.resize(self.size.0, self.size.1);
        self.screen = Screen::Wizard(Box::new(wizard));
    }

    fn open_edit(&mut self, name: &str) -> Result<()> {
        let recovered = self.ctx.store.load_or_recover(name)?;
        if let Some(backup) = &recovered.backup {
            self.list.set_error(format!(
                "'{name}' could not be parsed and was reset; the old file is at {}",
                backup.display()
            ));
        }
        self.open_wizard(WizardMode::Edit {
            original: recovered.value,
        });
        Ok(())
    }

    fn open_copy(&mut self, name: &str) -> Result<()> {
        let source = self.ctx.store.load(name)?;
        self.open_wizard(WizardMode::Template { source });
        Ok(())
    }

    fn open_diff(&mut self, left: &str, right: &str) -> Result<()> {
        let a = self.ctx.store.load(left)?;
        let b = self.ctx.store.load(right)?;
        let result = diff_configs(&a.config, &b.config)?;
        let mut view = DiffView::new(left.to_string(), right.to_string(), result);
        view.resize(self.size.1);
        self.screen = Screen::Diff(view);
        Ok(())
    }

    fn close_wizard(&mut self) {
        self.screen = Screen::List;
        if self.exit_after_wizard {
            self.should_quit = true;
        }
        self.refresh_list();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match &mut self.screen {
            Screen::List => {
                let before = self.list.selected_name().map(ToString::to_string);
                let action = self.list.handle_key(key);
                if let Err(e) = self.perform(action) {
                    self.list.set_error(format!("{e:#}"));
                }
                if self.list.selected_name().map(ToString::to_string) != before {
                    self.refresh_preview();
                }
            }
            Screen::Diff(view) => {
                if !view.handle_key(key) {
                    self.screen = Screen::List;
                }
            }
            Screen::Wizard(wizard) => match wizard.handle_key(key) {
                None => {}
                Some(WizardOutcome::Cancelled) => {
                    tracing::debug!("wizard cancelled");
                    self.close_wizard();
                }
                Some(WizardOutcome::Save(request)) => self.spawn_save(request),
            },
        }
    }

    fn perform(&mut self, action: ListAction) -> Result<()> {
        match action {
            ListAction::None => {}
            ListAction::Quit => self.should_quit = true,
            ListAction::New => self.open_wizard(WizardMode::Create),
            ListAction::Edit(name) => self.open_edit(&name)?,
            ListAction::Copy(name) => self.open_copy(&name)?,
            ListAction::Delete(name) => self.spawn_delete(name),
            ListAction::Use(name) => self.spawn_activate(name),
            ListAction::Diff(left, right) => self.open_diff(&left, &right)?,
            ListAction::Refresh => {
                self.refresh_list();
                self.list.set_status("Refreshed");
            }
        }
        Ok(())
    }

    fn spawn_save(&self, request: SaveRequest) {
        let store = self.ctx.store.clone();
        let tx = self.tx.clone();
        tokio::task::spawn_blocking(move || {
            let SaveRequest {
                profile,
                original_name,
            } = request;
            let result = commit_profile(&store, &profile, original_name.as_deref())
                .map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::Saved {
                name: profile.name,
                result,
            });
        });
    }

    fn spawn_delete(&self, name: String) {
        let store = self.ctx.store.clone();
        let tx = self.tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = store.delete(&name).map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::Deleted { name, result });
        });
    }

    fn spawn_activate(&self, name: String) {
        let store = self.ctx.store.clone();
        let target = self.ctx.target.clone();
        let tx = self.tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = store
                .load(&name)
                .map_err(|e| e.to_string())
                .and_then(|profile: Profile| {
                    activate_profile(&profile, &target).map_err(|e| e.to_string())
                });
            let _ = tx.send(AppEvent::Activated { name, result });
        });
    }

    /// Fetch the model catalog in the background
    pub fn spawn_catalog(&self) {
        let url = self.ctx.settings.catalog_url.clone();
        let timeout = self.ctx.settings.fetch_timeout();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = async {
                let client = build_client(timeout)?;
                HttpCatalog::new(client, url).models().await
            }
            .await
            .map_err(|e: NetworkError| e.to_string());
            let _ = tx.send(AppEvent::CatalogLoaded(result));
        });
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Saved { name, result } => self.on_saved(&name, result),
            AppEvent::Deleted { name, result } => {
                match result {
                    Ok(()) => self.list.set_status(format!("Deleted '{name}'")),
                    Err(e) => self.list.set_error(format!("Delete failed: {e}")),
                }
                self.refresh_list();
            }
            AppEvent::Activated { name, result } => {
                if !matches!(self.screen, Screen::List) {
                    tracing::debug!(profile = %name, "activation result arrived off the list screen");
                    return;
                }
                match result {
                    Ok(activation) => {
                        let mut message =
                            format!("Activated '{name}' -> {}", activation.target.display());
                        if let Some(backup) = activation.backup {
                            message.push_str(&format!(" (previous config at {})", backup.display()));
                        }
                        self.list.set_status(message);
                    }
                    Err(e) => self.list.set_error(format!("Activation failed: {e}")),
                }
                self.refresh_list();
            }
            AppEvent::CatalogLoaded(Ok(models)) => {
                tracing::info!(count = models.len(), "model catalog loaded");
                self.models = models;
                if let Screen::Wizard(wizard) = &mut self.screen {
                    wizard.set_model_suggestions(&self.models);
                }
            }
            AppEvent::CatalogLoaded(Err(e)) => {
                tracing::warn!(error = %e, "model catalog unavailable");
            }
        }
    }

    fn on_saved(&mut self, name: &str, result: Result<CommitOutcome, String>) {
        let saving = matches!(&self.screen, Screen::Wizard(w) if w.is_saving());
        match result {
            Ok(outcome) => {
                let mut message = match &outcome.renamed_from {
                    Some(old) => format!("Saved '{name}' (renamed from '{old}')"),
                    None => format!("Saved '{name}'"),
                };
                if let Some(stale) = &outcome.stale_old_name {
                    message.push_str(&format!("; could not remove old profile '{stale}'"));
                }
                if saving {
                    self.close_wizard();
                }
                self.list.set_status(message);
            }
            Err(e) => {
                if let (true, Screen::Wizard(wizard)) = (saving, &mut self.screen) {
                    wizard.save_failed(e);
                } else {
                    self.list.set_error(format!("Save of '{name}' failed: {e}"));
                }
            }
        }
        self.refresh_list();
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        match &mut self.screen {
            Screen::List => {}
            Screen::Diff(view) => view.resize(height),
            Screen::Wizard(wizard) => wizard.resize(width, height),
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let area: Rect = frame.area();
        match &self.screen {
            Screen::List => {
                let target = self.ctx.target.display().to_string();
                self.list.render(frame, area, &target);
            }
            Screen::Diff(view) => view.render(frame, area),
            Screen::Wizard(wizard) => wizard.render(frame, area),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use omoprof_core::profile::ProfileStore;
    use omoprof_core::settings::Settings;
    use omoprof_core::Config;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    fn app(dir: &TempDir) -> (App, mpsc::UnboundedReceiver<AppEvent>) {
        let ctx = AppContext {
            settings: Settings::default(),
            store: ProfileStore::new(dir.path().join("profiles")),
            target: dir.path().join("oh-my-opencode.json"),
        };
        let (tx, rx) = mpsc::unbounded_channel();
        let validator = Some(Arc::new(SchemaValidator::embedded().unwrap()));
        (App::new(ctx, validator, tx), rx)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[tokio::test]
    async fn test_create_profile_through_wizard() {
        let dir = TempDir::new().unwrap();
        let (mut app, mut rx) = app(&dir);
        app.launch(Launch::List).unwrap();

        press(&mut app, KeyCode::Char('n'));
        for c in "fresh".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        for _ in 0..4 {
            app.handle_key(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL));
        }
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Char('y'));

        let event = rx.recv().await.unwrap();
        assert!(matches!(&event, AppEvent::Saved { name, result: Ok(_) } if name == "fresh"));
        app.handle_event(event);

        assert!(matches!(app.screen, Screen::List));
        assert!(app.ctx.store.exists("fresh"));
        assert!(screen_text(&app).contains("fresh"));
    }

    #[tokio::test]
    async fn test_launch_edit_quits_after_cancel() {
        let dir = TempDir::new().unwrap();
        let (mut app, _rx) = app(&dir);
        app.ctx
            .store
            .save(&Profile::new("work", Config::default()))
            .unwrap();

        app.launch(Launch::Edit("work".to_string())).unwrap();
        assert!(matches!(app.screen, Screen::Wizard(_)));
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }

    #[test]
    fn test_launch_edit_missing_profile_fails() {
        let dir = TempDir::new().unwrap();
        let (mut app, _rx) = app(&dir);
        assert!(app.launch(Launch::Edit("ghost".to_string())).is_err());
    }

    #[tokio::test]
    async fn test_delete_and_activate_report_back() {
        let dir = TempDir::new().unwrap();
        let (mut app, mut rx) = app(&dir);
        let config: Config = r#"{"auto_update":false}"#.parse().unwrap();
        app.ctx.store.save(&Profile::new("work", config)).unwrap();
        app.launch(Launch::List).unwrap();

        press(&mut app, KeyCode::Char('u'));
        let event = rx.recv().await.unwrap();
        app.handle_event(event);
        assert!(screen_text(&app).contains("* work"));

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        let event = rx.recv().await.unwrap();
        app.handle_event(event);
        assert!(!app.ctx.store.exists("work"));
        assert!(screen_text(&app).contains("No profiles yet"));
    }

    #[test]
    fn test_diff_screen_opens_and_closes() {
        let dir = TempDir::new().unwrap();
        let (mut app, _rx) = app(&dir);
        for (name, json) in [("a", r#"{"auto_update":true}"#), ("b", r#"{"auto_update":false}"#)] {
            app.ctx
                .store
                .save(&Profile::new(name, json.parse().unwrap()))
                .unwrap();
        }
        app.launch(Launch::List).unwrap();

        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('v'));
        assert!(matches!(app.screen, Screen::Diff(_)));
        assert!(screen_text(&app).contains("\"auto_update\": false"));

        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.screen, Screen::List));
    }

    #[test]
    fn test_catalog_feeds_suggestions() {
        let dir = TempDir::new().unwrap();
        let (mut app, _rx) = app(&dir);
        app.handle_event(AppEvent::CatalogLoaded(Ok(vec![CatalogModel {
            provider: "openai".to_string(),
            id: "gpt-5.2".to_string(),
            name: "GPT-5.2".to_string(),
        }])));
        assert_eq!(app.models.len(), 1);
        assert_eq!(app.models[0].qualified_id(), "openai/gpt-5.2");
    }
}
