//! JSON preview, schema validation and save confirmation

use super::{ConfigSection, StepSignal, StepView};
use crossterm::event::{KeyCode, KeyEvent};
use omoprof_core::{Config, SchemaValidator, ValidationIssue};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use std::sync::Arc;

/// Most issue lines shown below the preview
const MAX_ISSUE_ROWS: usize = 6;

pub struct ReviewStep {
    validator: Option<Arc<SchemaValidator>>,
    name: String,
    preview: Vec<String>,
    issues: Vec<ValidationIssue>,
    /// Validation could not run
    failure: Option<String>,
    scroll: usize,
    page: usize,
    confirming: bool,
    saving: bool,
    save_error: Option<String>,
}

impl ReviewStep {
    pub fn new(validator: Option<Arc<SchemaValidator>>) -> Self {
        Self {
            validator,
            name: String::new(),
            preview: Vec::new(),
            issues: Vec::new(),
            failure: None,
            scroll: 0,
            page: 10,
            confirming: false,
            saving: false,
            save_error: None,
        }
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn begin_save(&mut self) {
        self.saving = true;
        self.save_error = None;
    }

    pub fn save_failed(&mut self, message: String) {
        self.saving = false;
        self.save_error = Some(message);
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    fn validate(&mut self, config: &Config) {
        self.issues.clear();
        self.failure = None;
        match &self.validator {
            None => self.failure = Some("Schema validator unavailable".to_string()),
            Some(validator) => match validator.validate(config) {
                Ok(issues) => self.issues = issues,
                Err(e) => self.failure = Some(e.to_string()),
            },
        }
        tracing::debug!(
            profile = %self.name,
            issues = self.issues.len(),
            failed = self.failure.is_some(),
            "config validated"
        );
    }

    fn max_scroll(&self) -> usize {
        self.preview.len().saturating_sub(self.page)
    }

    fn status_line(&self) -> Line<'static> {
        if let Some(failure) = &self.failure {
            return Line::from(Span::styled(
                format!("✗ {failure}"),
                Style::default().fg(Color::Red),
            ));
        }
        if self.issues.is_empty() {
            Line::from(Span::styled(
                "✓ Valid against the oh-my-opencode schema",
                Style::default().fg(Color::Green),
            ))
        } else {
            Line::from(Span::styled(
                format!("✗ {} schema issue(s)", self.issues.len()),
                Style::default().fg(Color::Red),
            ))
        }
    }

    /// Issue rows, the last one summarising any that do not fit
    fn issue_lines(&self) -> Vec<Line<'static>> {
        let shown = if self.issues.len() > MAX_ISSUE_ROWS {
            MAX_ISSUE_ROWS - 1
        } else {
            self.issues.len()
        };
        let mut lines: Vec<Line<'static>> = self
            .issues
            .iter()
            .take(shown)
            .map(|issue| Line::from(Span::styled(issue.to_string(), Style::default().fg(Color::Red))))
            .collect();
        let hidden = self.issues.len() - shown;
        if hidden > 0 {
            lines.push(Line::from(format!("... and {hidden} more")));
        }
        lines
    }

    fn footer(&self) -> Line<'static> {
        if self.confirming {
            Line::from(Span::styled(
                format!("Save profile '{}'? [y/N]", self.name),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ))
        } else if self.saving {
            Line::from(Span::styled("Saving...", Style::default().fg(Color::Yellow)))
        } else if let Some(error) = &self.save_error {
            Line::from(Span::styled(
                format!("Save failed: {error}"),
                Style::default().fg(Color::Red),
            ))
        } else {
            Line::default()
        }
    }
}

impl StepView for ReviewStep {
    fn resize(&mut self, _width: u16, height: u16) {
        // Roughly the preview height once the chrome is taken away
        self.page = usize::from(height.saturating_sub(14)).max(1);
        self.scroll = self.scroll.min(self.max_scroll());
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let issue_rows = if self.issues.is_empty() {
            0
        } else {
            self.issues.len().min(MAX_ISSUE_ROWS) + 2
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(u16::try_from(issue_rows).unwrap_or(u16::MAX)),
                Constraint::Length(1),
            ])
            .split(area);

        frame.render_widget(Paragraph::new(self.status_line()), chunks[0]);

        let preview: Vec<Line> = self
            .preview
            .iter()
            .map(|line| Line::from(line.as_str()))
            .collect();
        let scroll = u16::try_from(self.scroll).unwrap_or(u16::MAX);
        frame.render_widget(
            Paragraph::new(preview).scroll((scroll, 0)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {}.json ", self.name)),
            ),
            chunks[1],
        );

        if !self.issues.is_empty() {
            frame.render_widget(
                Paragraph::new(self.issue_lines()).block(Block::default().borders(Borders::ALL).title(" Issues ")),
                chunks[2],
            );
        }

        frame.render_widget(Paragraph::new(self.footer()), chunks[3]);
    }

    fn handle_key(&mut self, key: KeyEvent) -> StepSignal {
        if self.confirming {
            self.confirming = false;
            return match key.code {
                KeyCode::Char('y' | 'Y') => StepSignal::Save,
                _ => StepSignal::Stay,
            };
        }

        match key.code {
            KeyCode::Char('s') | KeyCode::Enter => {
                self.save_error = None;
                self.confirming = true;
            }
            KeyCode::Esc => return StepSignal::Back,
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = (self.scroll + 1).min(self.max_scroll());
            }
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::PageDown => self.scroll = (self.scroll + self.page).min(self.max_scroll()),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(self.page),
            KeyCode::Char('g') | KeyCode::Home => self.scroll = 0,
            KeyCode::Char('G') | KeyCode::End => self.scroll = self.max_scroll(),
            _ => {}
        }
        StepSignal::Stay
    }

    fn title(&self) -> &'static str {
        "Review"
    }

    fn help(&self) -> &'static str {
        if self.confirming {
            "[y] Save  [any other key] Cancel"
        } else {
            "[s/Enter] Save  [j/k] Scroll  [Esc] Back"
        }
    }

    fn check(&self) -> Result<(), String> {
        if self.saving {
            return Err("A save is already in progress".to_string());
        }
        if let Some(failure) = &self.failure {
            return Err(format!("Cannot save: {failure}"));
        }
        if !self.issues.is_empty() {
            return Err(format!(
                "Fix {} schema issue(s) before saving",
                self.issues.len()
            ));
        }
        Ok(())
    }
}

/// Review owns no part of the config; loading refreshes the preview
impl ConfigSection for ReviewStep {
    fn load_from(&mut self, config: &Config) {
        self.preview = match config.to_json_pretty() {
            Ok(json) => json.lines().map(ToString::to_string).collect(),
            Err(e) => vec![format!("<cannot render config: {e}>")],
        };
        self.scroll = 0;
        self.confirming = false;
        self.validate(config);
    }

    fn apply_to(&self, _config: &mut Config) {}
}
