//! Field editor shared by the wizard steps
//!
//! Every field holds an optional string. `None` means the key is absent
//! from the config, which is distinct from an empty string or `false`.
//! Typed accessors convert on the way in and out.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use omoprof_providers::catalog::{matching, CatalogModel};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState};
use ratatui::Frame;
use std::fmt::Display;
use std::str::FromStr;

/// Shown for fields without a value
const UNSET: &str = "(unset)";

/// Width of the label column
const LABEL_WIDTH: usize = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Section title, not selectable
    Heading,
    /// Tri-state boolean: unset, true, false
    Toggle,
    Text,
    /// Comma-separated list of strings
    List,
    Float,
    /// Whole number no larger than the given maximum
    Integer(u64),
    /// One of a fixed set of strings
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    value: Option<String>,
    /// Offer model catalog completions with Tab while editing
    suggest_models: bool,
}

impl Field {
    fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            value: None,
            suggest_models: false,
        }
    }

    pub fn heading(label: &'static str) -> Self {
        Self::new("", label, FieldKind::Heading)
    }

    pub fn toggle(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Toggle)
    }

    pub fn text(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Text)
    }

    pub fn list(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::List)
    }

    pub fn float(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Float)
    }

    pub fn integer(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Integer(u64::MAX))
    }

    /// Integer stored as a `u32` in the config
    pub fn integer32(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Integer(u64::from(u32::MAX)))
    }

    pub fn choice(key: &'static str, label: &'static str, options: &'static [&'static str]) -> Self {
        Self::new(key, label, FieldKind::Choice(options))
    }

    /// Mark a text field as a model id
    pub fn model(key: &'static str, label: &'static str) -> Self {
        Self {
            suggest_models: true,
            ..Self::text(key, label)
        }
    }

    fn is_selectable(&self) -> bool {
        self.kind != FieldKind::Heading
    }

    fn is_typed(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::Text | FieldKind::List | FieldKind::Float | FieldKind::Integer(_)
        )
    }

    /// Advance a toggle or choice to its next state, wrapping through unset
    fn cycle(&mut self) {
        self.value = match self.kind {
            FieldKind::Toggle => match self.value.as_deref() {
                None => Some("true".to_string()),
                Some("true") => Some("false".to_string()),
                Some(_) => None,
            },
            FieldKind::Choice(options) => {
                let position = self
                    .value
                    .as_deref()
                    .and_then(|v| options.iter().position(|o| *o == v));
                match (self.value.as_deref(), position) {
                    (None, _) | (Some(_), None) => options.first().map(ToString::to_string),
                    (Some(_), Some(i)) => options.get(i + 1).map(ToString::to_string),
                }
            }
            _ => return,
        };
    }

    fn display_value(&self) -> String {
        match (&self.kind, self.value.as_deref()) {
            (FieldKind::Heading, _) => String::new(),
            (_, None) => UNSET.to_string(),
            (FieldKind::Text, Some(v)) => format!("\"{v}\""),
            (FieldKind::List, Some(v)) => format!("[{v}]"),
            (_, Some(v)) => v.to_string(),
        }
    }

    /// Error text when the value cannot be converted
    fn problem(&self) -> Option<String> {
        let value = self.value.as_deref()?.trim();
        if value.is_empty() {
            return None;
        }
        match self.kind {
            FieldKind::Float => match value.parse::<f64>() {
                Err(_) => Some(format!("{}: '{value}' is not a number", self.label)),
                Ok(n) if !n.is_finite() => Some(format!(
                    "{}: '{value}' is not a finite number and cannot be stored in JSON",
                    self.label
                )),
                Ok(_) => None,
            },
            FieldKind::Integer(max) => match value.parse::<u64>() {
                Err(_) => Some(format!("{}: '{value}' is not a whole number", self.label)),
                Ok(n) if n > max => Some(format!("{}: {value} is larger than {max}", self.label)),
                Ok(_) => None,
            },
            _ => None,
        }
    }
}

/// A vertical list of fields with one selected
#[derive(Debug, Clone, Default)]
pub struct Form {
    fields: Vec<Field>,
    selected: usize,
    /// Edit buffer while a typed field is being changed
    editing: Option<String>,
    models: Vec<CatalogModel>,
    suggestion: usize,
    completion_query: Option<String>,
}

impl Form {
    pub fn new(fields: Vec<Field>) -> Self {
        let selected = fields.iter().position(Field::is_selectable).unwrap_or(0);
        Self {
            fields,
            selected,
            ..Self::default()
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn set_model_suggestions(&mut self, models: Vec<CatalogModel>) {
        self.models = models;
    }

    /// Clear every value and stop editing
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.value = None;
        }
        self.editing = None;
    }

    fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.key == key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(|f| f.value.as_deref())
    }

    pub fn set(&mut self, key: &str, value: Option<String>) {
        if let Some(field) = self.field_mut(key) {
            field.value = value;
        }
    }

    pub fn toggle(&self, key: &str) -> Option<bool> {
        self.get(key).map(|v| v == "true")
    }

    pub fn set_toggle(&mut self, key: &str, value: Option<bool>) {
        self.set(key, value.map(|v| v.to_string()));
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(ToString::to_string)
    }

    pub fn set_text(&mut self, key: &str, value: Option<&str>) {
        self.set(key, value.map(ToString::to_string));
    }

    pub fn list(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
                .collect()
        })
    }

    pub fn set_list(&mut self, key: &str, value: Option<&[String]>) {
        self.set(key, value.map(|items| items.join(", ")));
    }

    /// Parsed number; empty text counts as unset
    ///
    /// # Errors
    /// Returns a message naming the field when the text does not convert
    /// to `T`
    pub fn number<T: FromStr>(&self, key: &str) -> Result<Option<T>, String> {
        match self.get(key).map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|_| format!("{key}: '{value}' does not fit this field")),
        }
    }

    pub fn set_number<T: Display>(&mut self, key: &str, value: Option<T>) {
        self.set(key, value.map(|v| v.to_string()));
    }

    /// First field whose text does not convert
    ///
    /// # Errors
    /// Returns a message naming the field
    pub fn check(&self) -> Result<(), String> {
        match self.fields.iter().find_map(Field::problem) {
            Some(problem) => Err(problem),
            None => Ok(()),
        }
    }

    fn move_selection(&mut self, forward: bool) {
        let len = self.fields.len();
        let mut index = self.selected;
        for _ in 0..len {
            index = if forward {
                (index + 1).min(len.saturating_sub(1))
            } else {
                index.saturating_sub(1)
            };
            if self.fields.get(index).is_some_and(Field::is_selectable) {
                self.selected = index;
                return;
            }
        }
    }

    /// Handle a key, returning false when the form did not use it
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.editing.is_some() {
            self.handle_edit_key(key);
            return true;
        }

        let Some(field) = self.fields.get_mut(self.selected) else {
            return false;
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Char(' ') | KeyCode::Enter if !field.is_typed() => field.cycle(),
            KeyCode::Enter => {
                self.editing = Some(field.value.clone().unwrap_or_default());
                self.suggestion = 0;
                self.completion_query = None;
            }
            KeyCode::Backspace | KeyCode::Delete | KeyCode::Char('x') => field.value = None,
            _ => return false,
        }
        true
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        let Some(buffer) = self.editing.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Enter => {
                // Clearing the text unsets the key
                let value = self.editing.take().filter(|v| !v.trim().is_empty());
                if let Some(field) = self.fields.get_mut(self.selected) {
                    field.value = value;
                }
            }
            KeyCode::Esc => self.editing = None,
            KeyCode::Backspace => {
                buffer.pop();
                self.completion_query = None;
            }
            KeyCode::Tab => self.complete_model(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                buffer.push(c);
                self.completion_query = None;
            }
            _ => {}
        }
    }

    /// Replace the buffer with the next catalog model matching its prefix
    fn complete_model(&mut self) {
        let suggest = self
            .fields
            .get(self.selected)
            .is_some_and(|f| f.suggest_models);
        let Some(buffer) = self.editing.as_mut() else {
            return;
        };
        if !suggest || self.models.is_empty() {
            return;
        }

        // Repeated Tabs match against what was typed, not the last completion
        let query = self
            .completion_query
            .get_or_insert_with(|| buffer.clone())
            .clone();
        let matches = matching(&self.models, &query);
        if matches.is_empty() {
            return;
        }
        let pick = matches[self.suggestion % matches.len()].qualified_id();
        self.suggestion += 1;
        *buffer = pick;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let items: Vec<ListItem> = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                if field.kind == FieldKind::Heading {
                    return ListItem::new(Line::from(Span::styled(
                        field.label,
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )));
                }

                let value = match (&self.editing, i == self.selected) {
                    (Some(buffer), true) => format!("{buffer}_"),
                    _ => field.display_value(),
                };
                let value_style = if field.value.is_none() && !(self.is_editing() && i == self.selected) {
                    Style::default().fg(Color::DarkGray)
                } else if field.problem().is_some() {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default().fg(Color::Cyan)
                };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("  {:<LABEL_WIDTH$}", field.label)),
                    Span::styled(value, value_style),
                ]))
            })
            .collect();

        let highlight = if focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let list = List::new(items).highlight_style(highlight);
        let mut state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }
}
