//! Plain-text side-by-side rendering for terminal output

use crate::diff::{DiffKind, DiffLine, DiffResult, DiffSummary};
use std::fmt::Write;

/// Width reserved for a line number
const NUMBER_WIDTH: usize = 4;

/// Format a diff as two columns of `column_width` characters each
#[must_use]
pub fn format_side_by_side(result: &DiffResult, column_width: usize) -> String {
    let mut output = String::new();

    for (left, right) in result.rows() {
        let marker = match (left.kind, right.kind) {
            (DiffKind::Equal, DiffKind::Equal) => ' ',
            (DiffKind::Removed, _) => '<',
            _ => '>',
        };
        let _ = writeln!(
            output,
            "{} {marker} {}",
            format_cell(left, column_width),
            format_cell(right, column_width).trim_end()
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "{}", DiffSummary::from_result(result).one_line());
    output
}

fn format_cell(line: &DiffLine, width: usize) -> String {
    let number = if line.is_placeholder() {
        " ".repeat(NUMBER_WIDTH)
    } else {
        format!("{:>NUMBER_WIDTH$}", line.number)
    };
    let text: String = line.text.chars().take(width).collect();
    format!("{number} {text:<width$}")
}
