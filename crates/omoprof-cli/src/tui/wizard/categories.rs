//! Category overrides
//!
//! The left pane lists configured categories, the right pane edits the
//! selected one. Keys of a category the form does not show (`tools` and
//! unknown keys) are kept as loaded.

use super::{ConfigSection, StepSignal, StepView};
use crate::tui::form::{Field, Form};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use omoprof_core::config::{CategoryConfig, ThinkingConfig, ThinkingType, BUILTIN_CATEGORIES};
use omoprof_core::Config;
use omoprof_providers::CatalogModel;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;
use std::collections::BTreeMap;

const THINKING_TYPES: &[&str] = &["enabled", "disabled"];
const REASONING_EFFORTS: &[&str] = &["low", "medium", "high", "xhigh"];
const TEXT_VERBOSITIES: &[&str] = &["low", "medium", "high"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Focus {
    #[default]
    List,
    Form,
}

#[derive(Debug)]
pub struct CategoriesStep {
    entries: Vec<(String, CategoryConfig)>,
    /// `categories` was present when loaded
    present: bool,
    selected: usize,
    focus: Focus,
    form: Form,
    /// Name being typed for a new category
    adding: Option<String>,
    completion: usize,
    notice: Option<String>,
}

impl Default for CategoriesStep {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            present: false,
            selected: 0,
            focus: Focus::List,
            form: category_form(),
            adding: None,
            completion: 0,
            notice: None,
        }
    }
}

fn category_form() -> Form {
    Form::new(vec![
        Field::heading("Model"),
        Field::model("model", "model"),
        Field::text("variant", "variant"),
        Field::heading("Sampling"),
        Field::float("temperature", "temperature"),
        Field::float("top_p", "top_p"),
        Field::integer("max_tokens", "max_tokens"),
        Field::heading("Reasoning"),
        Field::choice("thinking", "thinking.type", THINKING_TYPES),
        Field::integer("budget", "thinking.budgetTokens"),
        Field::choice("reasoning_effort", "reasoningEffort", REASONING_EFFORTS),
        Field::choice("text_verbosity", "textVerbosity", TEXT_VERBOSITIES),
        Field::heading("Behaviour"),
        Field::text("prompt_append", "prompt_append"),
        Field::toggle("is_unstable_agent", "is_unstable_agent"),
    ])
}

fn fill_form(form: &mut Form, category: &CategoryConfig) {
    form.reset();
    form.set_text("model", category.model.as_deref());
    form.set_text("variant", category.variant.as_deref());
    form.set_number("temperature", category.temperature);
    form.set_number("top_p", category.top_p);
    form.set_number("max_tokens", category.max_tokens);
    form.set_text(
        "thinking",
        category.thinking.as_ref().map(|t| t.kind.as_str()),
    );
    form.set_number(
        "budget",
        category.thinking.as_ref().and_then(|t| t.budget_tokens),
    );
    form.set_text("reasoning_effort", category.reasoning_effort.as_deref());
    form.set_text("text_verbosity", category.text_verbosity.as_deref());
    form.set_text("prompt_append", category.prompt_append.as_deref());
    form.set_toggle("is_unstable_agent", category.is_unstable_agent);
}

/// Write the form into `category`
///
/// Numbers are converted first, so on error `category` is left unchanged.
fn read_form(form: &Form, category: &mut CategoryConfig) -> Result<(), String> {
    let temperature = form.number("temperature")?;
    let top_p = form.number("top_p")?;
    let max_tokens = form.number("max_tokens")?;
    let budget_tokens = form.number("budget")?;

    category.model = form.text("model");
    category.variant = form.text("variant");
    category.temperature = temperature;
    category.top_p = top_p;
    category.max_tokens = max_tokens;
    category.thinking =
        thinking_type(form.get("thinking")).map(|kind| ThinkingConfig { kind, budget_tokens });
    category.reasoning_effort = form.text("reasoning_effort");
    category.text_verbosity = form.text("text_verbosity");
    category.prompt_append = form.text("prompt_append");
    category.is_unstable_agent = form.toggle("is_unstable_agent");
    Ok(())
}

fn thinking_type(value: Option<&str>) -> Option<ThinkingType> {
    match value? {
        "enabled" => Some(ThinkingType::Enabled),
        "disabled" => Some(ThinkingType::Disabled),
        _ => None,
    }
}

fn check_form(form: &Form) -> Result<(), String> {
    form.check()?;
    if form.get("budget").is_some() && form.get("thinking").is_none() {
        return Err("thinking.budgetTokens needs thinking.type".to_string());
    }
    Ok(())
}

impl CategoriesStep {
    pub fn set_model_suggestions(&mut self, models: Vec<CatalogModel>) {
        self.form.set_model_suggestions(models);
    }

    /// Entries with the open form written into the selected one
    fn current_entries(&self) -> Vec<(String, CategoryConfig)> {
        let mut entries = self.entries.clone();
        if self.focus == Focus::Form {
            if let Some((name, category)) = entries.get_mut(self.selected) {
                if let Err(message) = read_form(&self.form, category) {
                    tracing::warn!(category = %name, %message, "category form not applied");
                }
            }
        }
        entries
    }

    fn open_form(&mut self) {
        if let Some((_, category)) = self.entries.get(self.selected) {
            fill_form(&mut self.form, category);
            self.focus = Focus::Form;
        }
    }

    fn close_form(&mut self) {
        if let Err(message) = check_form(&self.form) {
            self.notice = Some(message);
            return;
        }
        if let Some((_, category)) = self.entries.get_mut(self.selected) {
            if let Err(message) = read_form(&self.form, category) {
                self.notice = Some(message);
                return;
            }
        }
        self.focus = Focus::List;
    }

    fn unconfigured_builtins(&self) -> Vec<&'static str> {
        BUILTIN_CATEGORIES
            .iter()
            .copied()
            .filter(|b| !self.entries.iter().any(|(name, _)| name == b))
            .collect()
    }

    fn add(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            self.notice = Some(format!("'{name}' is not a usable category name"));
            return;
        }
        let position = match self.entries.iter().position(|(n, _)| n == name) {
            Some(position) => position,
            None => {
                self.entries.push((name.to_string(), CategoryConfig::default()));
                self.entries.sort_by(|a, b| a.0.cmp(&b.0));
                self.entries
                    .iter()
                    .position(|(n, _)| n == name)
                    .unwrap_or_default()
            }
        };
        self.selected = position;
        self.open_form();
    }

    fn handle_adding_key(&mut self, key: KeyEvent) {
        let Some(buffer) = self.adding.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Enter => {
                let name = buffer.clone();
                self.adding = None;
                self.add(&name);
            }
            KeyCode::Esc => self.adding = None,
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Tab => {
                let options = self.unconfigured_builtins();
                if !options.is_empty() {
                    let pick = options[self.completion % options.len()].to_string();
                    self.completion += 1;
                    if let Some(buffer) = self.adding.as_mut() {
                        *buffer = pick;
                    }
                }
            }
            KeyCode::Char(c) => buffer.push(c),
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> StepSignal {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(self.entries.len().saturating_sub(1));
            }
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => self.open_form(),
            KeyCode::Char('a') => {
                self.adding = Some(String::new());
                self.completion = 0;
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if self.selected < self.entries.len() {
                    let (name, _) = self.entries.remove(self.selected);
                    self.notice = Some(format!("Removed category '{name}'"));
                    self.selected = self.selected.min(self.entries.len().saturating_sub(1));
                }
            }
            KeyCode::Esc => return StepSignal::Back,
            _ => {}
        }
        StepSignal::Stay
    }

    fn render_list(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|(name, category)| {
                let model = category.model.as_deref().unwrap_or("-");
                ListItem::new(Line::from(vec![
                    Span::raw(name.clone()),
                    Span::styled(format!("  {model}"), Style::default().fg(Color::DarkGray)),
                ]))
            })
            .collect();

        let border = if self.focus == Focus::List {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border))
                    .title(" Categories "),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        let selected = (!self.entries.is_empty()).then_some(self.selected);
        let mut state = ListState::default().with_selected(selected);
        frame.render_stateful_widget(list, area, &mut state);
    }
}

impl StepView for CategoriesStep {
    fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(rows[0]);

        self.render_list(frame, columns[0]);

        let form_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if self.focus == Focus::Form {
                Color::Cyan
            } else {
                Color::DarkGray
            }));
        match (self.focus, self.entries.get(self.selected)) {
            (Focus::Form, Some((name, _))) => {
                let block = form_block.title(format!(" {name} "));
                let inner = block.inner(columns[1]);
                frame.render_widget(block, columns[1]);
                self.form.render(frame, inner, true);
            }
            _ => {
                let hint = if self.entries.is_empty() {
                    "No categories configured. Press [a] to add one."
                } else {
                    "Press [Enter] to edit the selected category."
                };
                frame.render_widget(
                    Paragraph::new(hint)
                        .style(Style::default().fg(Color::DarkGray))
                        .block(form_block),
                    columns[1],
                );
            }
        }

        let status = match (&self.adding, &self.notice) {
            (Some(buffer), _) => Line::from(vec![
                Span::styled("New category: ", Style::default().fg(Color::Yellow)),
                Span::raw(format!("{buffer}_")),
            ]),
            (None, Some(notice)) => Line::from(Span::styled(
                notice.clone(),
                Style::default().fg(Color::Yellow),
            )),
            (None, None) => Line::default(),
        };
        frame.render_widget(Paragraph::new(status), rows[1]);
    }

    fn handle_key(&mut self, key: KeyEvent) -> StepSignal {
        self.notice = None;
        if self.adding.is_some() {
            self.handle_adding_key(key);
            return StepSignal::Stay;
        }

        let editing = self.focus == Focus::Form && self.form.is_editing();
        if !editing && key.modifiers.contains(KeyModifiers::CONTROL) {
            return if key.code == KeyCode::Char('n') {
                StepSignal::Next
            } else {
                StepSignal::Stay
            };
        }

        match self.focus {
            Focus::List => self.handle_list_key(key),
            Focus::Form => {
                if !self.form.handle_key(key) && matches!(key.code, KeyCode::Esc | KeyCode::Left) {
                    self.close_form();
                }
                StepSignal::Stay
            }
        }
    }

    fn title(&self) -> &'static str {
        "Categories"
    }

    fn help(&self) -> &'static str {
        match (self.focus, self.form.is_editing()) {
            (Focus::List, _) => "[a] Add  [d] Delete  [Enter] Edit  [Ctrl+N] Next  [Esc] Back",
            (Focus::Form, false) => "[Enter] Edit/Cycle  [x] Unset  [Esc] Done  [Ctrl+N] Next",
            (Focus::Form, true) => "[Enter] Accept  [Tab] Suggest model  [Esc] Discard",
        }
    }

    fn check(&self) -> Result<(), String> {
        if self.focus == Focus::Form {
            check_form(&self.form)?;
        }
        Ok(())
    }
}

impl ConfigSection for CategoriesStep {
    fn load_from(&mut self, config: &Config) {
        self.present = config.categories.is_some();
        self.entries = config
            .categories
            .iter()
            .flatten()
            .map(|(name, category)| (name.clone(), category.clone()))
            .collect();
        self.selected = self.selected.min(self.entries.len().saturating_sub(1));
        self.focus = Focus::List;
        self.adding = None;
        self.notice = None;
    }

    fn apply_to(&self, config: &mut Config) {
        let categories: BTreeMap<String, CategoryConfig> =
            self.current_entries().into_iter().collect();
        config.categories = if self.present || !categories.is_empty() {
            Some(categories)
        } else {
            None
        };
    }
}
