//! Profile editing wizard
//!
//! Six steps edit one shared [`Config`]: Name, Categories, Agents, Hooks,
//! Other and Review. Moving forward applies the step being left to the
//! shared config and reloads the step being entered from it. Moving back
//! applies nothing, so edits made on a step since the last forward move are
//! dropped when it is left backwards.

mod agents;
mod categories;
mod hooks;
mod name;
mod other;
mod review;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use omoprof_core::profile::Profile;
use omoprof_core::{Config, SchemaValidator};
use omoprof_providers::CatalogModel;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use std::sync::Arc;

use agents::AgentsStep;
use categories::CategoriesStep;
use hooks::HooksStep;
use name::NameStep;
use other::OtherStep;
use review::ReviewStep;

/// What a step asks the wizard to do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepSignal {
    Stay,
    Next,
    Back,
    /// Confirmed save from the review step
    Save,
}

/// Lifecycle and presentation of a step
pub trait StepView {
    /// Called once after the wizard is built
    fn init(&mut self) {}

    /// Terminal size changed
    fn resize(&mut self, _width: u16, _height: u16) {}

    fn render(&self, frame: &mut Frame, area: Rect);

    fn handle_key(&mut self, key: KeyEvent) -> StepSignal;

    fn title(&self) -> &'static str;

    /// Key hints shown under the step
    fn help(&self) -> &'static str;

    /// Whether the step may be left forwards
    ///
    /// # Errors
    /// Returns the message shown to the user when it may not
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Data flow between a step and the shared config
pub trait ConfigSection {
    /// Replace local state with the slice of `config` this step owns
    fn load_from(&mut self, config: &Config);

    /// Write local state into the slice of `config` this step owns
    fn apply_to(&self, config: &mut Config);
}

pub trait WizardStep: StepView + ConfigSection {}

impl<T: StepView + ConfigSection> WizardStep for T {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepId {
    Name,
    Categories,
    Agents,
    Hooks,
    Other,
    Review,
}

impl StepId {
    pub const ALL: [StepId; 6] = [
        Self::Name,
        Self::Categories,
        Self::Agents,
        Self::Hooks,
        Self::Other,
        Self::Review,
    ];

    pub fn number(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0) + 1
    }

    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.number()).copied()
    }

    pub fn prev(self) -> Option<Self> {
        self.number()
            .checked_sub(2)
            .and_then(|i| Self::ALL.get(i).copied())
    }
}

/// How the wizard was opened
#[derive(Debug, Clone)]
pub enum WizardMode {
    Create,
    Edit { original: Profile },
    /// New profile starting from a copy of another one
    Template { source: Profile },
}

impl WizardMode {
    fn original_name(&self) -> Option<String> {
        match self {
            Self::Edit { original } => Some(original.name.clone()),
            _ => None,
        }
    }

    fn heading(&self) -> String {
        match self {
            Self::Create => "New profile".to_string(),
            Self::Edit { original } => format!("Edit profile '{}'", original.name),
            Self::Template { source } => format!("New profile from '{}'", source.name),
        }
    }
}

/// Everything needed to persist the edited profile
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub profile: Profile,
    /// Name the profile had when editing started
    pub original_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WizardOutcome {
    Save(SaveRequest),
    Cancelled,
}

struct Steps {
    name: NameStep,
    categories: CategoriesStep,
    agents: AgentsStep,
    hooks: HooksStep,
    other: OtherStep,
    review: ReviewStep,
}

impl Steps {
    fn get(&self, id: StepId) -> &dyn WizardStep {
        match id {
            StepId::Name => &self.name,
            StepId::Categories => &self.categories,
            StepId::Agents => &self.agents,
            StepId::Hooks => &self.hooks,
            StepId::Other => &self.other,
            StepId::Review => &self.review,
        }
    }

    fn get_mut(&mut self, id: StepId) -> &mut dyn WizardStep {
        match id {
            StepId::Name => &mut self.name,
            StepId::Categories => &mut self.categories,
            StepId::Agents => &mut self.agents,
            StepId::Hooks => &mut self.hooks,
            StepId::Other => &mut self.other,
            StepId::Review => &mut self.review,
        }
    }
}

pub struct Wizard {
    mode: WizardMode,
    config: Config,
    current: StepId,
    steps: Steps,
    error: Option<String>,
}

impl Wizard {
    /// Build a wizard
    ///
    /// `taken` lists the stored profile names; the name step refuses them
    /// unless it is the profile's own name. Without a validator the review
    /// step refuses to save.
    pub fn new(
        mode: WizardMode,
        taken: Vec<String>,
        validator: Option<Arc<SchemaValidator>>,
    ) -> Self {
        let (config, name) = match &mode {
            WizardMode::Create => (Config::default(), String::new()),
            WizardMode::Edit { original } => (original.config.clone(), original.name.clone()),
            WizardMode::Template { source } => {
                let copy = Profile::from_template(source);
                (copy.config, copy.name)
            }
        };

        let steps = Steps {
            name: NameStep::new(name, mode.original_name(), taken),
            categories: CategoriesStep::default(),
            agents: AgentsStep::default(),
            hooks: HooksStep::default(),
            other: OtherStep::default(),
            review: ReviewStep::new(validator),
        };

        let mut wizard = Self {
            mode,
            config,
            current: StepId::Name,
            steps,
            error: None,
        };
        for id in StepId::ALL {
            let step = wizard.steps.get_mut(id);
            step.init();
            step.load_from(&wizard.config);
        }
        wizard
    }

    pub fn current(&self) -> StepId {
        self.current
    }

    /// The shared config as last applied
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Handle a key, returning an outcome once the wizard is finished
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<WizardOutcome> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(WizardOutcome::Cancelled);
        }

        self.error = None;
        match self.steps.get_mut(self.current).handle_key(key) {
            StepSignal::Stay => None,
            StepSignal::Next if self.current == StepId::Review => None,
            StepSignal::Next | StepSignal::Save => self.forward(),
            StepSignal::Back => self.back(),
        }
    }

    fn forward(&mut self) -> Option<WizardOutcome> {
        let id = self.current;
        if let Err(message) = self.steps.get(id).check() {
            self.error = Some(message);
            return None;
        }
        self.steps.get(id).apply_to(&mut self.config);

        match id.next() {
            Some(next) => {
                self.enter(next);
                None
            }
            None => {
                self.steps.review.begin_save();
                Some(WizardOutcome::Save(SaveRequest {
                    profile: Profile::new(self.steps.name.value(), self.config.clone()),
                    original_name: self.mode.original_name(),
                }))
            }
        }
    }

    fn back(&mut self) -> Option<WizardOutcome> {
        match self.current.prev() {
            Some(prev) => {
                self.enter(prev);
                None
            }
            None => Some(WizardOutcome::Cancelled),
        }
    }

    fn enter(&mut self, id: StepId) {
        self.current = id;
        if id == StepId::Review {
            self.steps.review.set_name(self.steps.name.value());
        }
        self.steps.get_mut(id).load_from(&self.config);
        tracing::debug!(step = self.steps.get(id).title(), "wizard step entered");
    }

    /// A save request has been handed out and no result has come back
    pub fn is_saving(&self) -> bool {
        self.steps.review.is_saving()
    }

    /// Show a failed save on the review step and allow another attempt
    pub fn save_failed(&mut self, message: String) {
        self.steps.review.save_failed(message);
    }

    /// Model ids offered for completion in model fields
    pub fn set_model_suggestions(&mut self, models: &[CatalogModel]) {
        self.steps.categories.set_model_suggestions(models.to_vec());
        self.steps.agents.set_model_suggestions(models.to_vec());
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        for id in StepId::ALL {
            self.steps.get_mut(id).resize(width, height);
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let step = self.steps.get(self.current);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(Span::styled(
                format!(" {} ", self.mode.heading()),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Step indicator
                Constraint::Length(1), // Breadcrumb
                Constraint::Min(4),    // Content
                Constraint::Length(1), // Error message
                Constraint::Length(1), // Controls
            ])
            .split(inner);

        let indicator = Paragraph::new(format!(
            "Step {} of {}: {}",
            self.current.number(),
            StepId::ALL.len(),
            step.title()
        ))
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(indicator, chunks[0]);
        frame.render_widget(Paragraph::new(self.breadcrumb()), chunks[1]);

        step.render(frame, chunks[2]);

        if let Some(error) = &self.error {
            let error = Paragraph::new(format!("⚠ {error}")).style(Style::default().fg(Color::Red));
            frame.render_widget(error, chunks[3]);
        }

        let controls = Paragraph::new(format!("{}  [Ctrl+C] Cancel", step.help()))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(controls, chunks[4]);
    }

    fn breadcrumb(&self) -> Line<'static> {
        let mut spans = Vec::new();
        for (i, id) in StepId::ALL.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
            }
            let style = if *id == self.current {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if id.number() < self.current.number() {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(self.steps.get(*id).title(), style));
        }
        Line::from(spans)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    pub(crate) fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub(crate) fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub(crate) fn type_text(wizard: &mut Wizard, text: &str) {
        for c in text.chars() {
            wizard.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn validator() -> Option<Arc<SchemaValidator>> {
        Some(Arc::new(SchemaValidator::embedded().unwrap()))
    }

    fn sample_config() -> Config {
        r#"{
            "$schema": "https://example.com/schema.json",
            "disabled_hooks": ["comment-checker"],
            "disabled_agents": ["oracle"],
            "auto_update": false,
            "agents": {
                "sisyphus": {
                    "model": "anthropic/claude-opus-4-5",
                    "permission": { "bash": { "git push": "deny", "*": "ask" } }
                },
                "librarian": { "temperature": 0.2, "mode": "subagent" }
            },
            "categories": {
                "quick": { "model": "openai/gpt-5.2", "thinking": { "type": "enabled", "budgetTokens": 2000 } }
            },
            "experimental": { "dynamic_context_pruning": { "enabled": true, "protected_tools": ["task"] } },
            "background_task": { "defaultConcurrency": 3, "providerConcurrency": { "anthropic": 2 } },
            "skills": { "sources": ["./skills"], "enable": ["playwright"] },
            "tmux": { "enabled": true, "layout": "main-vertical" },
            "future_key": { "kept": true }
        }"#
        .parse()
        .unwrap()
    }

    fn edit_wizard(config: Config) -> Wizard {
        Wizard::new(
            WizardMode::Edit {
                original: Profile::new("work", config),
            },
            vec!["work".to_string(), "home".to_string()],
            validator(),
        )
    }

    /// Press forward on each editing step until `target` is current
    fn advance_to(wizard: &mut Wizard, target: StepId) {
        while wizard.current() != target {
            let before = wizard.current();
            wizard.handle_key(ctrl('n'));
            assert_ne!(wizard.current(), before, "stuck on {before:?}: {:?}", wizard.error());
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    #[test]
    fn test_step_order() {
        assert_eq!(StepId::Name.next(), Some(StepId::Categories));
        assert_eq!(StepId::Other.next(), Some(StepId::Review));
        assert_eq!(StepId::Review.next(), None);
        assert_eq!(StepId::Name.prev(), None);
        assert_eq!(StepId::Categories.prev(), Some(StepId::Name));
        assert_eq!(StepId::Review.number(), 6);
    }

    #[test]
    fn test_escape_on_name_cancels() {
        let mut wizard = Wizard::new(WizardMode::Create, vec![], validator());
        assert_eq!(
            wizard.handle_key(key(KeyCode::Esc)),
            Some(WizardOutcome::Cancelled)
        );
    }

    #[test]
    fn test_ctrl_c_cancels_anywhere() {
        let mut wizard = edit_wizard(sample_config());
        advance_to(&mut wizard, StepId::Hooks);
        assert_eq!(wizard.handle_key(ctrl('c')), Some(WizardOutcome::Cancelled));
    }

    #[test]
    fn test_empty_name_blocks_forward() {
        let mut wizard = Wizard::new(WizardMode::Create, vec![], validator());
        wizard.handle_key(key(KeyCode::Enter));
        assert_eq!(wizard.current(), StepId::Name);
        assert!(wizard.error().is_some());
    }

    #[test]
    fn test_invalid_name_blocks_forward() {
        let mut wizard = Wizard::new(WizardMode::Create, vec![], validator());
        type_text(&mut wizard, "my profile");
        wizard.handle_key(key(KeyCode::Enter));
        assert_eq!(wizard.current(), StepId::Name);
    }

    #[test]
    fn test_taken_name_blocks_forward() {
        let mut wizard = Wizard::new(WizardMode::Create, vec!["home".to_string()], validator());
        type_text(&mut wizard, "home");
        wizard.handle_key(key(KeyCode::Enter));
        assert_eq!(wizard.current(), StepId::Name);
        assert!(wizard.error().unwrap_or_default().contains("home"));
    }

    #[test]
    fn test_own_name_is_allowed_when_editing() {
        let mut wizard = edit_wizard(Config::default());
        wizard.handle_key(key(KeyCode::Enter));
        assert_eq!(wizard.current(), StepId::Categories);
    }

    // =========================================================================
    // Apply and discard
    // =========================================================================

    #[test]
    fn test_load_then_apply_is_identity() {
        let original = sample_config();
        let mut wizard = edit_wizard(original.clone());
        advance_to(&mut wizard, StepId::Review);
        assert_eq!(wizard.config(), &original);
    }

    #[test]
    fn test_template_copies_config_without_name() {
        let source = Profile::new("work", sample_config());
        let mut wizard = Wizard::new(
            WizardMode::Template {
                source: source.clone(),
            },
            vec!["work".to_string()],
            validator(),
        );
        assert_eq!(wizard.config(), &source.config);
        wizard.handle_key(key(KeyCode::Enter));
        assert_eq!(wizard.current(), StepId::Name);
    }

    #[test]
    fn test_back_then_forward_reproduces_config() {
        let mut straight = edit_wizard(sample_config());
        advance_to(&mut straight, StepId::Review);

        let mut wandering = edit_wizard(sample_config());
        advance_to(&mut wandering, StepId::Other);
        wandering.handle_key(key(KeyCode::Esc));
        assert_eq!(wandering.current(), StepId::Hooks);
        wandering.handle_key(key(KeyCode::Esc));
        assert_eq!(wandering.current(), StepId::Agents);
        advance_to(&mut wandering, StepId::Review);

        assert_eq!(straight.config(), wandering.config());
    }

    #[test]
    fn test_back_discards_unapplied_edits() {
        let mut wizard = edit_wizard(sample_config());
        advance_to(&mut wizard, StepId::Hooks);

        // Toggle the first hook, then leave backwards
        wizard.handle_key(key(KeyCode::Char(' ')));
        wizard.handle_key(key(KeyCode::Esc));
        assert_eq!(wizard.current(), StepId::Agents);

        advance_to(&mut wizard, StepId::Other);
        assert_eq!(
            wizard.config().disabled_hooks,
            Some(vec!["comment-checker".to_string()])
        );
    }

    #[test]
    fn test_forward_applies_edits() {
        let mut wizard = Wizard::new(WizardMode::Create, vec![], validator());
        type_text(&mut wizard, "fresh");
        wizard.handle_key(key(KeyCode::Enter));
        advance_to(&mut wizard, StepId::Hooks);

        wizard.handle_key(key(KeyCode::Char(' ')));
        wizard.handle_key(ctrl('n'));
        assert_eq!(wizard.current(), StepId::Other);
        assert_eq!(wizard.config().disabled_hooks.as_ref().map(Vec::len), Some(1));
    }

    // =========================================================================
    // Review and save
    // =========================================================================

    #[test]
    fn test_confirmed_save_returns_request() {
        let mut wizard = edit_wizard(sample_config());
        wizard.handle_key(key(KeyCode::Backspace));
        wizard.handle_key(key(KeyCode::Backspace));
        wizard.handle_key(key(KeyCode::Backspace));
        wizard.handle_key(key(KeyCode::Backspace));
        type_text(&mut wizard, "office");
        advance_to(&mut wizard, StepId::Review);

        assert_eq!(wizard.handle_key(key(KeyCode::Char('s'))), None);
        let outcome = wizard.handle_key(key(KeyCode::Char('y')));
        match outcome {
            Some(WizardOutcome::Save(request)) => {
                assert_eq!(request.profile.name, "office");
                assert_eq!(request.original_name.as_deref(), Some("work"));
                assert_eq!(request.profile.config, sample_config());
            }
            other => panic!("expected save, got {other:?}"),
        }
    }

    #[test]
    fn test_declined_confirmation_stays() {
        let mut wizard = edit_wizard(sample_config());
        advance_to(&mut wizard, StepId::Review);
        wizard.handle_key(key(KeyCode::Char('s')));
        assert_eq!(wizard.handle_key(key(KeyCode::Char('n'))), None);
        assert_eq!(wizard.current(), StepId::Review);
    }

    #[test]
    fn test_invalid_config_blocks_save() {
        let config: Config = r#"{ "agents": { "oracle": { "temperature": 5 } } }"#.parse().unwrap();
        let mut wizard = edit_wizard(config);
        advance_to(&mut wizard, StepId::Review);
        wizard.handle_key(key(KeyCode::Char('s')));
        assert_eq!(wizard.handle_key(key(KeyCode::Char('y'))), None);
        assert!(wizard.error().is_some());
    }

    #[test]
    fn test_missing_validator_blocks_save() {
        let mut wizard = Wizard::new(
            WizardMode::Edit {
                original: Profile::new("work", Config::default()),
            },
            vec![],
            None,
        );
        advance_to(&mut wizard, StepId::Review);
        wizard.handle_key(key(KeyCode::Char('s')));
        assert_eq!(wizard.handle_key(key(KeyCode::Char('y'))), None);
    }

    #[test]
    fn test_save_in_flight_blocks_second_save() {
        let mut wizard = edit_wizard(Config::default());
        advance_to(&mut wizard, StepId::Review);
        wizard.handle_key(key(KeyCode::Char('s')));
        assert!(wizard.handle_key(key(KeyCode::Char('y'))).is_some());

        wizard.handle_key(key(KeyCode::Char('s')));
        assert_eq!(wizard.handle_key(key(KeyCode::Char('y'))), None);

        wizard.save_failed("disk full".to_string());
        wizard.handle_key(key(KeyCode::Char('s')));
        assert!(wizard.handle_key(key(KeyCode::Char('y'))).is_some());
    }

    #[test]
    fn test_render_shows_step_indicator() {
        let wizard = edit_wizard(sample_config());
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|frame| wizard.render(frame, frame.area()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect();
        assert!(text.contains("Step 1 of 6"));
        assert!(text.contains("Edit profile 'work'"));
    }
}
