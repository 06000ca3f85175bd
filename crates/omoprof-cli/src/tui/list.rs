//! Profile list screen

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

/// What the app should do after a key on the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    None,
    Quit,
    New,
    Edit(String),
    /// New profile starting from this one
    Copy(String),
    Delete(String),
    Use(String),
    Diff(String, String),
    Refresh,
}

#[derive(Debug, Default)]
pub struct ListView {
    names: Vec<String>,
    selected: usize,
    /// Profile matching the live config
    active: Option<String>,
    /// First side of a pending diff
    mark: Option<String>,
    confirm_delete: Option<String>,
    status: Option<(String, bool)>,
    preview: Vec<String>,
}

impl ListView {
    pub fn set_profiles(&mut self, names: Vec<String>, active: Option<String>) {
        let current = self.selected_name().map(ToString::to_string);
        self.names = names;
        self.active = active;
        self.selected = current
            .and_then(|c| self.names.iter().position(|n| *n == c))
            .unwrap_or(self.selected)
            .min(self.names.len().saturating_sub(1));
        if self
            .mark
            .as_ref()
            .is_some_and(|m| !self.names.contains(m))
        {
            self.mark = None;
        }
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.names.get(self.selected).map(String::as_str)
    }

    pub fn set_preview(&mut self, lines: Vec<String>) {
        self.preview = lines;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), false));
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), true));
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ListAction {
        if let Some(name) = self.confirm_delete.take() {
            return match key.code {
                KeyCode::Char('y' | 'Y') => ListAction::Delete(name),
                _ => {
                    self.set_status("Delete cancelled");
                    ListAction::None
                }
            };
        }

        self.status = None;
        let selected = self.selected_name().map(ToString::to_string);
        match (key.code, selected) {
            (KeyCode::Char('q'), _) => ListAction::Quit,
            (KeyCode::Esc, _) if self.mark.is_some() => {
                self.mark = None;
                ListAction::None
            }
            (KeyCode::Esc, _) => ListAction::Quit,
            (KeyCode::Up | KeyCode::Char('k'), _) => {
                self.selected = self.selected.saturating_sub(1);
                ListAction::None
            }
            (KeyCode::Down | KeyCode::Char('j'), _) => {
                self.selected = (self.selected + 1).min(self.names.len().saturating_sub(1));
                ListAction::None
            }
            (KeyCode::Char('n'), _) => ListAction::New,
            (KeyCode::Char('r'), _) => ListAction::Refresh,
            (KeyCode::Char('e') | KeyCode::Enter, Some(name)) => ListAction::Edit(name),
            (KeyCode::Char('c'), Some(name)) => ListAction::Copy(name),
            (KeyCode::Char('u'), Some(name)) => ListAction::Use(name),
            (KeyCode::Char('d'), Some(name)) => {
                self.set_status(format!("Delete profile '{name}'? [y/N]"));
                self.confirm_delete = Some(name);
                ListAction::None
            }
            (KeyCode::Char('m'), Some(name)) => {
                if self.mark.as_deref() == Some(name.as_str()) {
                    self.mark = None;
                } else {
                    self.set_status(format!("Marked '{name}'; select another profile and press [v]"));
                    self.mark = Some(name);
                }
                ListAction::None
            }
            (KeyCode::Char('v'), Some(name)) => match &self.mark {
                Some(mark) if *mark != name => ListAction::Diff(mark.clone(), name),
                _ => {
                    self.set_error("Mark a different profile with [m] first");
                    ListAction::None
                }
            },
            _ => ListAction::None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, target: &str) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        let header = Line::from(vec![
            Span::styled(
                "omoprof",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  target: {target}"), Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(header), rows[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(rows[1]);

        let items: Vec<ListItem> = self
            .names
            .iter()
            .map(|name| {
                let active = self.active.as_deref() == Some(name.as_str());
                let marked = self.mark.as_deref() == Some(name.as_str());
                let mut spans = vec![
                    Span::styled(
                        if active { "* " } else { "  " },
                        Style::default().fg(Color::Green),
                    ),
                    Span::raw(name.clone()),
                ];
                if marked {
                    spans.push(Span::styled(" [marked]", Style::default().fg(Color::Yellow)));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Profiles ({}) ", self.names.len()));
        if items.is_empty() {
            frame.render_widget(
                Paragraph::new("No profiles yet. Press [n] to create one.")
                    .style(Style::default().fg(Color::DarkGray))
                    .block(block),
                columns[0],
            );
        } else {
            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
            let mut state = ListState::default().with_selected(Some(self.selected));
            frame.render_stateful_widget(list, columns[0], &mut state);
        }

        let preview: Vec<Line> = self.preview.iter().map(|l| Line::from(l.as_str())).collect();
        frame.render_widget(
            Paragraph::new(preview).block(Block::default().borders(Borders::ALL).title(" Preview ")),
            columns[1],
        );

        if let Some((message, is_error)) = &self.status {
            let color = if *is_error { Color::Red } else { Color::Yellow };
            frame.render_widget(
                Paragraph::new(message.as_str()).style(Style::default().fg(color)),
                rows[2],
            );
        }

        frame.render_widget(
            Paragraph::new(
                "[n] New  [e] Edit  [c] Copy  [d] Delete  [u] Use  [m] Mark  [v] Diff  [r] Refresh  [q] Quit",
            )
            .style(Style::default().fg(Color::DarkGray)),
            rows[3],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(view: &mut ListView, code: KeyCode) -> ListAction {
        view.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn view() -> ListView {
        let mut view = ListView::default();
        view.set_profiles(
            vec!["home".to_string(), "office".to_string(), "work".to_string()],
            Some("work".to_string()),
        );
        view
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let mut view = view();
        assert_eq!(press(&mut view, KeyCode::Char('d')), ListAction::None);
        assert_eq!(
            press(&mut view, KeyCode::Char('y')),
            ListAction::Delete("home".to_string())
        );

        press(&mut view, KeyCode::Char('d'));
        assert_eq!(press(&mut view, KeyCode::Char('n')), ListAction::None);
    }

    #[test]
    fn test_mark_then_diff() {
        let mut view = view();
        press(&mut view, KeyCode::Char('m'));
        press(&mut view, KeyCode::Down);
        assert_eq!(
            press(&mut view, KeyCode::Char('v')),
            ListAction::Diff("home".to_string(), "office".to_string())
        );
    }

    #[test]
    fn test_diff_without_mark_is_refused() {
        let mut view = view();
        assert_eq!(press(&mut view, KeyCode::Char('v')), ListAction::None);
        assert!(view.status.as_ref().is_some_and(|(_, error)| *error));
    }

    #[test]
    fn test_selection_follows_name_on_refresh() {
        let mut view = view();
        press(&mut view, KeyCode::Down);
        view.set_profiles(
            vec!["alpha".to_string(), "home".to_string(), "office".to_string()],
            None,
        );
        assert_eq!(view.selected_name(), Some("office"));
    }

    #[test]
    fn test_escape_clears_mark_before_quitting() {
        let mut view = view();
        press(&mut view, KeyCode::Char('m'));
        assert_eq!(press(&mut view, KeyCode::Esc), ListAction::None);
        assert_eq!(press(&mut view, KeyCode::Esc), ListAction::Quit);
    }

    #[test]
    fn test_empty_list_ignores_edit() {
        let mut view = ListView::default();
        assert_eq!(press(&mut view, KeyCode::Enter), ListAction::None);
        assert_eq!(press(&mut view, KeyCode::Char('n')), ListAction::New);
    }
}
