//! Unified diff text

use similar::{DiffTag, TextDiff};
use std::fmt::Write;

/// Lines of context kept around each hunk
const CONTEXT_LINES: usize = 3;

/// Render a unified diff of two byte buffers
///
/// Output always starts with `--- name_a\n+++ name_b\n`. When the inputs
/// are identical nothing follows the header.
#[must_use]
pub fn compute_unified_diff(name_a: &str, name_b: &str, a: &[u8], b: &[u8]) -> String {
    let old = String::from_utf8_lossy(a);
    let new = String::from_utf8_lossy(b);

    let mut output = String::new();
    let _ = writeln!(output, "--- {name_a}");
    let _ = writeln!(output, "+++ {name_b}");

    let diff = TextDiff::from_lines(old.as_ref(), new.as_ref());
    if diff.ops().iter().all(|op| op.tag() == DiffTag::Equal) {
        return output;
    }

    for group in diff.grouped_ops(CONTEXT_LINES) {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        let old_range = first.old_range().start..last.old_range().end;
        let new_range = first.new_range().start..last.new_range().end;
        let _ = writeln!(
            output,
            "@@ -{} +{} @@",
            hunk_range(old_range.start, old_range.len()),
            hunk_range(new_range.start, new_range.len())
        );

        for op in &group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    similar::ChangeTag::Delete => '-',
                    similar::ChangeTag::Insert => '+',
                    similar::ChangeTag::Equal => ' ',
                };
                output.push(sign);
                output.push_str(change.value().trim_end_matches('\n'));
                output.push('\n');
            }
        }
    }

    output
}

/// Format a hunk range as `start,len` with a 1-based start
fn hunk_range(start: usize, len: usize) -> String {
    match len {
        0 => format!("{start},0"),
        1 => format!("{}", start + 1),
        _ => format!("{},{len}", start + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hunk_range_formats() {
        assert_eq!(hunk_range(0, 1), "1");
        assert_eq!(hunk_range(4, 3), "5,3");
        assert_eq!(hunk_range(2, 0), "2,0");
    }

    #[test]
    fn test_single_change_has_hunk_header() {
        let diff = compute_unified_diff("a", "b", b"one\ntwo\n", b"one\nthree\n");
        assert_eq!(
            diff,
            "--- a\n+++ b\n@@ -1,2 +1,2 @@\n one\n-two\n+three\n"
        );
    }
}
