//! Diff Engine
//!
//! Line diffs between two JSON documents, in two renderings: aligned
//! side-by-side columns ([`compute_diff`]) and unified diff text
//! ([`compute_unified_diff`]).

pub mod display;
mod lines;
mod types;
mod unified;

pub use lines::compute_diff;
pub use types::*;
pub use unified::compute_unified_diff;

use crate::config::Config;

/// Diff two configs by their pretty-printed JSON
///
/// # Errors
/// Returns an error if either config cannot be serialized
pub fn diff_configs(left: &Config, right: &Config) -> Result<DiffResult, serde_json::Error> {
    Ok(compute_diff(&left.to_json_pretty()?, &right.to_json_pretty()?))
}
