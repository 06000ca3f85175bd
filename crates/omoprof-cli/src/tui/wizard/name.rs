//! Profile name entry

use super::{ConfigSection, StepSignal, StepView};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use omoprof_core::util::{validate_profile_name, MAX_NAME_LEN};
use omoprof_core::Config;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use std::collections::BTreeSet;

pub struct NameStep {
    input: String,
    /// Name of the profile being edited, which may be kept
    original: Option<String>,
    /// Names already in the store
    taken: BTreeSet<String>,
}

impl NameStep {
    pub fn new(input: String, original: Option<String>, taken: Vec<String>) -> Self {
        Self {
            input,
            original,
            taken: taken.into_iter().collect(),
        }
    }

    pub fn value(&self) -> String {
        self.input.trim().to_string()
    }

    fn conflicts(&self, name: &str) -> bool {
        self.taken.contains(name) && self.original.as_deref() != Some(name)
    }
}

impl StepView for NameStep {
    fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);

        let prompt = Paragraph::new("Profile name:").style(Style::default().fg(Color::White));
        frame.render_widget(prompt, chunks[0]);

        let input = Paragraph::new(format!("{}_", self.input)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(input, chunks[1]);

        let hint = match self.check() {
            Ok(()) => Line::from(Span::styled("✓ name available", Style::default().fg(Color::Green))),
            Err(_) if self.input.is_empty() => Line::from(Span::styled(
                format!("Letters, digits, '.', '_' and '-', up to {MAX_NAME_LEN} characters"),
                Style::default().fg(Color::DarkGray),
            )),
            Err(message) => Line::from(Span::styled(message, Style::default().fg(Color::Red))),
        };
        frame.render_widget(Paragraph::new(hint), chunks[2]);
    }

    fn handle_key(&mut self, key: KeyEvent) -> StepSignal {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('n') => StepSignal::Next,
                KeyCode::Char('u') => {
                    self.input.clear();
                    StepSignal::Stay
                }
                _ => StepSignal::Stay,
            };
        }

        match key.code {
            KeyCode::Enter => StepSignal::Next,
            KeyCode::Esc => StepSignal::Back,
            KeyCode::Backspace => {
                self.input.pop();
                StepSignal::Stay
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                StepSignal::Stay
            }
            _ => StepSignal::Stay,
        }
    }

    fn title(&self) -> &'static str {
        "Name"
    }

    fn help(&self) -> &'static str {
        "[Enter] Next  [Esc] Cancel  [Ctrl+U] Clear"
    }

    fn check(&self) -> Result<(), String> {
        let name = self.value();
        validate_profile_name(&name).map_err(|e| e.to_string())?;
        if self.conflicts(&name) {
            return Err(format!("A profile named '{name}' already exists"));
        }
        Ok(())
    }
}

/// The name is not part of the config document
impl ConfigSection for NameStep {
    fn load_from(&mut self, _config: &Config) {}

    fn apply_to(&self, _config: &mut Config) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(input: &str, original: Option<&str>) -> NameStep {
        NameStep::new(
            input.to_string(),
            original.map(ToString::to_string),
            vec!["work".to_string(), "home".to_string()],
        )
    }

    #[test]
    fn test_check_accepts_new_name() {
        assert!(step("travel", None).check().is_ok());
    }

    #[test]
    fn test_check_rejects_existing_name() {
        assert!(step("home", None).check().is_err());
        assert!(step("home", Some("work")).check().is_err());
    }

    #[test]
    fn test_check_accepts_original_name() {
        assert!(step("work", Some("work")).check().is_ok());
    }

    #[test]
    fn test_check_rejects_bad_characters() {
        assert!(step("a/b", None).check().is_err());
        assert!(step("", None).check().is_err());
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut name = step("", None);
        for c in "abcd".chars() {
            name.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        name.handle_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE));
        assert_eq!(name.value(), "abc");
    }
}
