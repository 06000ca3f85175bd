//! Hook checklist

use super::{ConfigSection, StepSignal, StepView};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use omoprof_core::config::{is_builtin_hook, BUILTIN_HOOKS};
use omoprof_core::Config;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState};
use ratatui::Frame;
use std::collections::BTreeSet;

#[derive(Debug, Default)]
pub struct HooksStep {
    /// Every hook shown: built-ins first, then unknown names from the config
    names: Vec<String>,
    disabled: BTreeSet<String>,
    /// `disabled_hooks` as loaded, to keep its order
    loaded: Option<Vec<String>>,
    selected: usize,
}

impl HooksStep {
    fn disabled_list(&self) -> Vec<String> {
        let loaded = self.loaded.as_deref().unwrap_or_default();
        let kept = loaded.iter().filter(|h| self.disabled.contains(*h));
        let added = self
            .names
            .iter()
            .filter(|h| self.disabled.contains(*h) && !loaded.contains(*h));
        kept.chain(added).cloned().collect()
    }

    fn toggle_selected(&mut self) {
        if let Some(name) = self.names.get(self.selected) {
            if !self.disabled.remove(name) {
                self.disabled.insert(name.clone());
            }
        }
    }
}

impl StepView for HooksStep {
    fn render(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .names
            .iter()
            .map(|name| {
                let enabled = !self.disabled.contains(name);
                let (mark, style) = if enabled {
                    ("[x]", Style::default().fg(Color::Green))
                } else {
                    ("[ ]", Style::default().fg(Color::DarkGray))
                };
                let mut spans = vec![Span::styled(format!("{mark} "), style), Span::raw(name.clone())];
                if !is_builtin_hook(name) {
                    spans.push(Span::styled("  (unknown)", Style::default().fg(Color::Yellow)));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items).highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        let mut state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn handle_key(&mut self, key: KeyEvent) -> StepSignal {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return if key.code == KeyCode::Char('n') {
                StepSignal::Next
            } else {
                StepSignal::Stay
            };
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(self.names.len().saturating_sub(1));
            }
            KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Char('a') => self.disabled.clear(),
            KeyCode::Enter => return StepSignal::Next,
            KeyCode::Esc => return StepSignal::Back,
            _ => {}
        }
        StepSignal::Stay
    }

    fn title(&self) -> &'static str {
        "Hooks"
    }

    fn help(&self) -> &'static str {
        "[Space] Toggle  [a] Enable all  [Enter] Next  [Esc] Back"
    }
}

impl ConfigSection for HooksStep {
    fn load_from(&mut self, config: &Config) {
        self.loaded = config.disabled_hooks.clone();
        self.disabled = self.loaded.iter().flatten().cloned().collect();

        self.names = BUILTIN_HOOKS.iter().map(ToString::to_string).collect();
        for name in self.loaded.iter().flatten() {
            if !self.names.contains(name) {
                self.names.push(name.clone());
            }
        }
        self.selected = self.selected.min(self.names.len().saturating_sub(1));
    }

    fn apply_to(&self, config: &mut Config) {
        let disabled = self.disabled_list();
        config.disabled_hooks = if self.loaded.is_some() || !disabled.is_empty() {
            Some(disabled)
        } else {
            None
        };
    }
}
