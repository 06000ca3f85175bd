//! Side-by-side diff of two profiles

use crossterm::event::{KeyCode, KeyEvent};
use omoprof_core::diff::{DiffKind, DiffLine, DiffResult, DiffSummary};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub struct DiffView {
    left_name: String,
    right_name: String,
    result: DiffResult,
    summary: DiffSummary,
    scroll: usize,
    page: usize,
}

impl DiffView {
    pub fn new(left_name: String, right_name: String, result: DiffResult) -> Self {
        let summary = DiffSummary::from_result(&result);
        Self {
            left_name,
            right_name,
            result,
            summary,
            scroll: 0,
            page: 20,
        }
    }

    fn max_scroll(&self) -> usize {
        self.result.len().saturating_sub(self.page)
    }

    pub fn resize(&mut self, height: u16) {
        self.page = usize::from(height.saturating_sub(4)).max(1);
        self.scroll = self.scroll.min(self.max_scroll());
    }

    /// Returns false when the view should close
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return false,
            KeyCode::Down | KeyCode::Char('j') => self.scroll = (self.scroll + 1).min(self.max_scroll()),
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::PageDown | KeyCode::Char(' ') => {
                self.scroll = (self.scroll + self.page).min(self.max_scroll());
            }
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(self.page),
            KeyCode::Char('g') | KeyCode::Home => self.scroll = 0,
            KeyCode::Char('G') | KeyCode::End => self.scroll = self.max_scroll(),
            KeyCode::Char('n') => self.next_change(),
            _ => {}
        }
        true
    }

    /// Jump to the next row below the top that is not equal
    fn next_change(&mut self) {
        let found = self
            .result
            .left
            .iter()
            .zip(&self.result.right)
            .enumerate()
            .skip(self.scroll + 1)
            .find(|(_, (l, r))| l.kind != DiffKind::Equal || r.kind != DiffKind::Equal)
            .map(|(i, _)| i);
        if let Some(row) = found {
            self.scroll = row.min(self.max_scroll());
        }
    }

    fn column(&self, lines: &[DiffLine], height: usize) -> Vec<Line<'static>> {
        lines
            .iter()
            .skip(self.scroll)
            .take(height)
            .map(|line| {
                let (marker, style) = match line.kind {
                    DiffKind::Equal => (' ', Style::default()),
                    DiffKind::Added => ('+', Style::default().fg(Color::Green)),
                    DiffKind::Removed => ('-', Style::default().fg(Color::Red)),
                };
                let number = if line.is_placeholder() {
                    "    ".to_string()
                } else {
                    format!("{:>4}", line.number)
                };
                Line::from(vec![
                    Span::styled(number, Style::default().fg(Color::DarkGray)),
                    Span::styled(format!(" {marker} {}", line.text), style),
                ])
            })
            .collect()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);

        let height = usize::from(columns[0].height.saturating_sub(2));
        for (lines, name, area) in [
            (&self.result.left, &self.left_name, columns[0]),
            (&self.result.right, &self.right_name, columns[1]),
        ] {
            let block = Block::default()
                .borders(Borders::ALL)
                .title(format!(" {name} "));
            frame.render_widget(Paragraph::new(self.column(lines, height)).block(block), area);
        }

        let status = if self.result.has_changes() {
            format!(
                "{}  [j/k] Scroll  [n] Next change  [Esc] Close",
                self.summary.one_line()
            )
        } else {
            "Profiles are identical  [Esc] Close".to_string()
        };
        frame.render_widget(
            Paragraph::new(status).style(Style::default().fg(Color::DarkGray)),
            rows[1],
        );
    }
}
