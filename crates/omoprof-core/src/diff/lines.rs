//! Side-by-side line diff

use crate::diff::{DiffKind, DiffLine, DiffResult};
use similar::{capture_diff_slices, Algorithm, DiffTag};
use std::ops::Range;

/// An equal run shorter than this, made only of JSON punctuation, is folded
/// into the change blocks around it
const MAX_ABSORBED_EQUAL_LINES: usize = 1;

/// A run of lines after cleanup
#[derive(Debug, Clone, PartialEq, Eq)]
enum Block {
    Equal { old: Range<usize>, new: Range<usize> },
    Change { old: Range<usize>, new: Range<usize> },
}

/// Compute an aligned line diff of two texts
///
/// Both inputs are split into lines (an empty input has no lines), diffed
/// line by line, and the edit script is cleaned up into coherent blocks.
/// Every block contributes the same number of rows to both columns:
/// removed lines get a placeholder on the right, added lines get a
/// placeholder on the left.
#[must_use]
pub fn compute_diff(old_text: &str, new_text: &str) -> DiffResult {
    let old: Vec<&str> = old_text.lines().collect();
    let new: Vec<&str> = new_text.lines().collect();

    let blocks = cleanup(&old, build_blocks(&old, &new));

    let mut result = DiffResult::default();
    let mut left_number = 0;
    let mut right_number = 0;

    for block in blocks {
        match block {
            Block::Equal { old: old_range, new: new_range } => {
                for (o, n) in old_range.zip(new_range) {
                    left_number += 1;
                    right_number += 1;
                    result.left.push(DiffLine::real(old[o], DiffKind::Equal, left_number));
                    result.right.push(DiffLine::real(new[n], DiffKind::Equal, right_number));
                }
            }
            Block::Change { old: old_range, new: new_range } => {
                for o in old_range {
                    left_number += 1;
                    result.left.push(DiffLine::real(old[o], DiffKind::Removed, left_number));
                    result.right.push(DiffLine::placeholder(DiffKind::Removed));
                }
                for n in new_range {
                    right_number += 1;
                    result.left.push(DiffLine::placeholder(DiffKind::Added));
                    result.right.push(DiffLine::real(new[n], DiffKind::Added, right_number));
                }
            }
        }
    }

    debug_assert_eq!(result.left.len(), result.right.len());
    result
}

/// Turn the raw edit script into blocks, merging adjacent changes
fn build_blocks(old: &[&str], new: &[&str]) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();

    for op in capture_diff_slices(Algorithm::Myers, old, new) {
        let (old_range, new_range) = (op.old_range(), op.new_range());
        if op.tag() == DiffTag::Equal {
            blocks.push(Block::Equal {
                old: old_range,
                new: new_range,
            });
            continue;
        }

        match blocks.last_mut() {
            Some(Block::Change { old, new }) => {
                old.end = old_range.end;
                new.end = new_range.end;
            }
            _ => blocks.push(Block::Change {
                old: old_range,
                new: new_range,
            }),
        }
    }

    blocks
}

/// Fold trivial equal runs sandwiched between changes into one change
///
/// A lone `}` or `],` that happens to match between two edits splits one
/// logical change into two; merging them keeps the side-by-side view
/// readable.
fn cleanup(old: &[&str], blocks: Vec<Block>) -> Vec<Block> {
    let mut merged: Vec<Block> = Vec::with_capacity(blocks.len());
    let mut iter = blocks.into_iter().peekable();

    while let Some(block) = iter.next() {
        let absorb = match (&block, merged.last(), iter.peek()) {
            (Block::Equal { old: range, .. }, Some(Block::Change { .. }), Some(Block::Change { .. })) => {
                range.len() <= MAX_ABSORBED_EQUAL_LINES
                    && old[range.clone()].iter().all(|line| is_structural(line))
            }
            _ => false,
        };

        if !absorb {
            merged.push(block);
            continue;
        }

        if let (Some(Block::Change { old: prev_old, new: prev_new }), Some(Block::Change { old: next_old, new: next_new })) =
            (merged.last_mut(), iter.next())
        {
            prev_old.end = next_old.end;
            prev_new.end = next_new.end;
        }
    }

    merged
}

/// Lines carrying no content of their own
fn is_structural(line: &str) -> bool {
    matches!(
        line.trim(),
        "" | "{" | "}" | "}," | "[" | "]" | "],"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacent_changes_merge_into_one_block() {
        let old = ["a", "b", "c"];
        let new = ["x", "y", "c"];
        let blocks = build_blocks(&old, &new);
        assert_eq!(
            blocks,
            vec![
                Block::Change { old: 0..2, new: 0..2 },
                Block::Equal { old: 2..3, new: 2..3 },
            ]
        );
    }

    #[test]
    fn test_structural_equal_between_changes_is_absorbed() {
        let old = ["a", "}", "b"];
        let blocks = vec![
            Block::Change { old: 0..1, new: 0..1 },
            Block::Equal { old: 1..2, new: 1..2 },
            Block::Change { old: 2..3, new: 2..3 },
        ];
        assert_eq!(
            cleanup(&old, blocks),
            vec![Block::Change { old: 0..3, new: 0..3 }]
        );
    }

    #[test]
    fn test_content_equal_between_changes_is_kept() {
        let old = ["a", "\"keep\": 1,", "b"];
        let blocks = vec![
            Block::Change { old: 0..1, new: 0..1 },
            Block::Equal { old: 1..2, new: 1..2 },
            Block::Change { old: 2..3, new: 2..3 },
        ];
        assert_eq!(cleanup(&old, blocks.clone()), blocks);
    }

    #[test]
    fn test_absorbed_block_keeps_columns_aligned() {
        let old = "{\n  \"a\": {\n    \"x\": 1\n  },\n  \"b\": 2\n}\n";
        let new = "{\n  \"a\": {\n    \"x\": 5\n  },\n  \"b\": 7\n}\n";
        let result = compute_diff(old, new);
        assert_eq!(result.left.len(), result.right.len());
        let removed: Vec<_> = result
            .left
            .iter()
            .filter(|l| l.kind == DiffKind::Removed && !l.is_placeholder())
            .map(|l| l.text.trim())
            .collect();
        assert_eq!(removed, vec!["\"x\": 1", "},", "\"b\": 2"]);
    }
}
