//! Comparison of the embedded schema against an upstream copy

use crate::diff::compute_unified_diff;
use serde_json::Value;

/// Outcome of comparing two schema documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDrift {
    /// True when both documents are the same JSON value
    pub identical: bool,
    /// Unified diff of the pretty-printed documents (header only when identical)
    pub diff: String,
}

/// Compare the embedded schema with an upstream schema
///
/// Key order is ignored for the `identical` flag; the diff is computed on
/// the pretty-printed text.
#[must_use]
pub fn schema_drift(embedded: &Value, upstream: &Value) -> SchemaDrift {
    let identical = embedded == upstream;
    let left = serde_json::to_string_pretty(embedded).unwrap_or_default();
    let right = serde_json::to_string_pretty(upstream).unwrap_or_default();
    let diff = if identical {
        compute_unified_diff("embedded", "upstream", b"", b"")
    } else {
        compute_unified_diff("embedded", "upstream", left.as_bytes(), right.as_bytes())
    };
    SchemaDrift { identical, diff }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identical_schemas_have_header_only_diff() {
        let schema = json!({"type": "object"});
        let drift = schema_drift(&schema, &schema.clone());
        assert!(drift.identical);
        assert_eq!(drift.diff, "--- embedded\n+++ upstream\n");
    }

    #[test]
    fn test_changed_schema_reports_lines() {
        let embedded = json!({"type": "object"});
        let upstream = json!({"type": "array"});
        let drift = schema_drift(&embedded, &upstream);
        assert!(!drift.identical);
        assert!(drift.diff.contains("-  \"type\": \"object\""));
        assert!(drift.diff.contains("+  \"type\": \"array\""));
    }
}
