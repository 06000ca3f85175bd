//! Agent overrides and `disabled_agents`

use super::{ConfigSection, StepSignal, StepView};
use crate::tui::form::{Field, Form};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use omoprof_core::config::{
    AgentConfig, AgentMode, AgentPermission, BashPermission, Permission, BUILTIN_AGENTS,
};
use omoprof_core::Config;
use omoprof_providers::CatalogModel;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;
use std::collections::{BTreeMap, BTreeSet};

const MODES: &[&str] = &["subagent", "primary", "all"];
const PERMISSIONS: &[&str] = &["allow", "ask", "deny"];
const BASH_CHOICES: &[&str] = &["allow", "ask", "deny", PER_COMMAND];
const PER_COMMAND: &str = "per-command";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Focus {
    #[default]
    List,
    Form,
}

#[derive(Debug)]
pub struct AgentsStep {
    names: Vec<String>,
    /// Overrides by agent; agents without overrides have no entry
    agents: BTreeMap<String, AgentConfig>,
    /// `agents` was present when loaded
    present: bool,
    /// Agents that had an entry when loaded, kept even if emptied
    loaded_entries: BTreeSet<String>,
    disabled: BTreeSet<String>,
    loaded_disabled: Option<Vec<String>>,
    /// Per-command bash rules as loaded, restored when "per-command" is chosen
    bash_rules: BTreeMap<String, BTreeMap<String, Permission>>,
    selected: usize,
    focus: Focus,
    form: Form,
    notice: Option<String>,
}

impl Default for AgentsStep {
    fn default() -> Self {
        Self {
            names: Vec::new(),
            agents: BTreeMap::new(),
            present: false,
            loaded_entries: BTreeSet::new(),
            disabled: BTreeSet::new(),
            loaded_disabled: None,
            bash_rules: BTreeMap::new(),
            selected: 0,
            focus: Focus::List,
            form: agent_form(),
            notice: None,
        }
    }
}

fn agent_form() -> Form {
    Form::new(vec![
        Field::heading("Model"),
        Field::model("model", "model"),
        Field::text("variant", "variant"),
        Field::text("category", "category"),
        Field::heading("Sampling"),
        Field::float("temperature", "temperature"),
        Field::float("top_p", "top_p"),
        Field::heading("Behaviour"),
        Field::text("description", "description"),
        Field::text("prompt_append", "prompt_append"),
        Field::choice("mode", "mode", MODES),
        Field::text("color", "color"),
        Field::toggle("disable", "disable"),
        Field::heading("Permissions"),
        Field::choice("edit", "permission.edit", PERMISSIONS),
        Field::choice("bash", "permission.bash", BASH_CHOICES),
        Field::choice("webfetch", "permission.webfetch", PERMISSIONS),
        Field::choice("doom_loop", "permission.doom_loop", PERMISSIONS),
        Field::choice(
            "external_directory",
            "permission.external_directory",
            PERMISSIONS,
        ),
    ])
}

fn fill_form(form: &mut Form, agent: &AgentConfig) {
    form.reset();
    form.set_text("model", agent.model.as_deref());
    form.set_text("variant", agent.variant.as_deref());
    form.set_text("category", agent.category.as_deref());
    form.set_number("temperature", agent.temperature);
    form.set_number("top_p", agent.top_p);
    form.set_text("description", agent.description.as_deref());
    form.set_text("prompt_append", agent.prompt_append.as_deref());
    form.set_text("mode", agent.mode.map(AgentMode::as_str));
    form.set_text("color", agent.color.as_deref());
    form.set_toggle("disable", agent.disable);

    let permission = agent.permission.clone().unwrap_or_default();
    form.set_text("edit", permission.edit.map(Permission::as_str));
    form.set_text("webfetch", permission.webfetch.map(Permission::as_str));
    form.set_text("doom_loop", permission.doom_loop.map(Permission::as_str));
    form.set_text(
        "external_directory",
        permission.external_directory.map(Permission::as_str),
    );
    form.set_text(
        "bash",
        permission.bash.as_ref().map(|bash| match bash {
            BashPermission::Simple(p) => p.as_str(),
            BashPermission::PerCommand(_) => PER_COMMAND,
        }),
    );
}

fn permission(form: &Form, key: &str) -> Option<Permission> {
    form.get(key).and_then(|v| v.parse().ok())
}

/// Write the form into `agent`
///
/// Numbers are converted first, so on error `agent` is left unchanged.
fn read_form(
    form: &Form,
    agent: &mut AgentConfig,
    rules: Option<&BTreeMap<String, Permission>>,
) -> Result<(), String> {
    let temperature = form.number("temperature")?;
    let top_p = form.number("top_p")?;

    agent.model = form.text("model");
    agent.variant = form.text("variant");
    agent.category = form.text("category");
    agent.temperature = temperature;
    agent.top_p = top_p;
    agent.description = form.text("description");
    agent.prompt_append = form.text("prompt_append");
    agent.mode = form.get("mode").and_then(|v| v.parse().ok());
    agent.color = form.text("color");
    agent.disable = form.toggle("disable");

    let mut updated = agent.permission.clone().unwrap_or_default();
    updated.edit = permission(form, "edit");
    updated.webfetch = permission(form, "webfetch");
    updated.doom_loop = permission(form, "doom_loop");
    updated.external_directory = permission(form, "external_directory");
    updated.bash = match form.get("bash") {
        None => None,
        Some(PER_COMMAND) => Some(BashPermission::PerCommand(
            rules.cloned().unwrap_or_default(),
        )),
        Some(value) => value.parse().ok().map(BashPermission::Simple),
    };
    agent.permission = if agent.permission.is_none() && updated.is_empty() {
        None
    } else {
        Some(updated)
    };
    Ok(())
}

impl AgentsStep {
    pub fn set_model_suggestions(&mut self, models: Vec<CatalogModel>) {
        self.form.set_model_suggestions(models);
    }

    fn selected_name(&self) -> Option<&String> {
        self.names.get(self.selected)
    }

    /// Overrides with the open form written into the selected agent
    fn current_agents(&self) -> BTreeMap<String, AgentConfig> {
        let mut agents = self.agents.clone();
        if self.focus == Focus::Form {
            if let Some(name) = self.selected_name() {
                let agent = agents.entry(name.clone()).or_default();
                if let Err(message) = read_form(&self.form, agent, self.bash_rules.get(name)) {
                    tracing::warn!(agent = %name, %message, "agent form not applied");
                }
            }
        }
        agents.retain(|name, agent| self.loaded_entries.contains(name) || !agent.is_empty());
        agents
    }

    fn disabled_list(&self) -> Vec<String> {
        let loaded = self.loaded_disabled.as_deref().unwrap_or_default();
        let kept = loaded.iter().filter(|a| self.disabled.contains(*a));
        let added = self
            .names
            .iter()
            .filter(|a| self.disabled.contains(*a) && !loaded.contains(*a));
        kept.chain(added).cloned().collect()
    }

    fn open_form(&mut self) {
        let Some(name) = self.selected_name().cloned() else {
            return;
        };
        let agent = self.agents.get(&name).cloned().unwrap_or_default();
        fill_form(&mut self.form, &agent);
        self.focus = Focus::Form;
    }

    fn close_form(&mut self) {
        if let Err(message) = self.form.check() {
            self.notice = Some(message);
            return;
        }
        if let Some(name) = self.selected_name().cloned() {
            let rules = self.bash_rules.get(&name);
            let agent = self.agents.entry(name.clone()).or_default();
            if let Err(message) = read_form(&self.form, agent, rules) {
                self.notice = Some(message);
                return;
            }
        }
        self.focus = Focus::List;
    }

    fn toggle_disabled(&mut self) {
        if let Some(name) = self.selected_name().cloned() {
            if !self.disabled.remove(&name) {
                self.disabled.insert(name);
            }
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> StepSignal {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(self.names.len().saturating_sub(1));
            }
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => self.open_form(),
            KeyCode::Char('x') | KeyCode::Char(' ') => self.toggle_disabled(),
            KeyCode::Char('r') => {
                if let Some(name) = self.selected_name().cloned() {
                    if self.agents.remove(&name).is_some() {
                        self.notice = Some(format!("Cleared overrides for '{name}'"));
                    }
                }
            }
            KeyCode::Esc => return StepSignal::Back,
            _ => {}
        }
        StepSignal::Stay
    }

    fn render_list(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .names
            .iter()
            .map(|name| {
                let disabled = self.disabled.contains(name);
                let name_style = if disabled {
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default()
                };
                let detail = match self.agents.get(name) {
                    Some(agent) => agent.model.clone().unwrap_or_else(|| "custom".to_string()),
                    None => String::new(),
                };
                ListItem::new(Line::from(vec![
                    Span::styled(name.clone(), name_style),
                    Span::styled(format!("  {detail}"), Style::default().fg(Color::DarkGray)),
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
                    .title(" Agents "),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        let mut state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

impl StepView for AgentsStep {
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

        let focused = self.focus == Focus::Form;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }))
            .title(format!(" {} ", self.selected_name().map_or("", String::as_str)));
        if focused {
            let inner = block.inner(columns[1]);
            frame.render_widget(block, columns[1]);
            self.form.render(frame, inner, true);
        } else {
            let summary = self
                .selected_name()
                .and_then(|name| self.agents.get(name))
                .and_then(|agent| serde_json::to_string_pretty(agent).ok())
                .unwrap_or_else(|| "No overrides. Press [Enter] to add some.".to_string());
            frame.render_widget(
                Paragraph::new(summary)
                    .style(Style::default().fg(Color::DarkGray))
                    .block(block),
                columns[1],
            );
        }

        if let Some(notice) = &self.notice {
            frame.render_widget(
                Paragraph::new(notice.as_str()).style(Style::default().fg(Color::Yellow)),
                rows[1],
            );
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> StepSignal {
        self.notice = None;
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
        "Agents"
    }

    fn help(&self) -> &'static str {
        match (self.focus, self.form.is_editing()) {
            (Focus::List, _) => {
                "[Enter] Edit  [x] Disable/enable  [r] Clear overrides  [Ctrl+N] Next  [Esc] Back"
            }
            (Focus::Form, false) => "[Enter] Edit/Cycle  [x] Unset  [Esc] Done  [Ctrl+N] Next",
            (Focus::Form, true) => "[Enter] Accept  [Tab] Suggest model  [Esc] Discard",
        }
    }

    fn check(&self) -> Result<(), String> {
        if self.focus == Focus::Form {
            self.form.check()?;
        }
        Ok(())
    }
}

impl ConfigSection for AgentsStep {
    fn load_from(&mut self, config: &Config) {
        self.present = config.agents.is_some();
        self.agents = config.agents.clone().unwrap_or_default();
        self.loaded_entries = self.agents.keys().cloned().collect();
        self.loaded_disabled = config.disabled_agents.clone();
        self.disabled = self.loaded_disabled.iter().flatten().cloned().collect();
        self.bash_rules = self
            .agents
            .iter()
            .filter_map(|(name, agent)| match agent.permission.as_ref()?.bash.as_ref()? {
                BashPermission::PerCommand(rules) => Some((name.clone(), rules.clone())),
                BashPermission::Simple(_) => None,
            })
            .collect();

        self.names = BUILTIN_AGENTS.iter().map(ToString::to_string).collect();
        let extra = self
            .agents
            .keys()
            .chain(self.loaded_disabled.iter().flatten())
            .cloned()
            .collect::<BTreeSet<_>>();
        for name in extra {
            if !self.names.contains(&name) {
                self.names.push(name);
            }
        }

        self.selected = self.selected.min(self.names.len().saturating_sub(1));
        self.focus = Focus::List;
        self.notice = None;
    }

    fn apply_to(&self, config: &mut Config) {
        let agents = self.current_agents();
        config.agents = if self.present || !agents.is_empty() {
            Some(agents)
        } else {
            None
        };

        let disabled = self.disabled_list();
        config.disabled_agents = if self.loaded_disabled.is_some() || !disabled.is_empty() {
            Some(disabled)
        } else {
            None
        };
    }
}
