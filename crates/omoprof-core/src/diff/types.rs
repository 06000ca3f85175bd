//! Diff result types

use serde::{Deserialize, Serialize};

/// What happened to a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    /// Present on both sides
    Equal,
    /// Only on the right side
    Added,
    /// Only on the left side
    Removed,
}

/// One row of one column of a side-by-side diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    /// Literal line text, empty for placeholders
    pub text: String,
    /// Change classification
    pub kind: DiffKind,
    /// 1-based line number in this column's input, 0 for a placeholder row
    pub number: usize,
}

impl DiffLine {
    pub(crate) fn real(text: &str, kind: DiffKind, number: usize) -> Self {
        Self {
            text: text.to_string(),
            kind,
            number,
        }
    }

    /// A gap row standing in for a line that only exists on the other side
    pub(crate) fn placeholder(kind: DiffKind) -> Self {
        Self {
            text: String::new(),
            kind,
            number: 0,
        }
    }

    /// Whether this row is a gap filler
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.number == 0
    }
}

/// Two aligned columns; `left.len() == right.len()` always holds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    /// Rows from the first document
    pub left: Vec<DiffLine>,
    /// Rows from the second document
    pub right: Vec<DiffLine>,
}

impl DiffResult {
    /// Number of aligned rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// True when both inputs were empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// True when any row differs
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.left
            .iter()
            .chain(&self.right)
            .any(|line| line.kind != DiffKind::Equal)
    }

    /// Iterate aligned `(left, right)` pairs
    pub fn rows(&self) -> impl Iterator<Item = (&DiffLine, &DiffLine)> {
        self.left.iter().zip(&self.right)
    }
}

/// Line counts for a diff
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiffSummary {
    /// Lines only in the second document
    pub added: usize,
    /// Lines only in the first document
    pub removed: usize,
    /// Lines common to both
    pub unchanged: usize,
}

impl DiffSummary {
    /// Count the real lines of a diff result
    #[must_use]
    pub fn from_result(result: &DiffResult) -> Self {
        let mut summary = Self::default();
        for line in result.left.iter().filter(|l| !l.is_placeholder()) {
            match line.kind {
                DiffKind::Removed => summary.removed += 1,
                DiffKind::Equal => summary.unchanged += 1,
                DiffKind::Added => {}
            }
        }
        summary.added = result
            .right
            .iter()
            .filter(|l| !l.is_placeholder() && l.kind == DiffKind::Added)
            .count();
        summary
    }

    /// Format as a one-line summary
    #[must_use]
    pub fn one_line(&self) -> String {
        format!(
            "{} added, {} removed, {} unchanged",
            self.added, self.removed, self.unchanged
        )
    }
}
