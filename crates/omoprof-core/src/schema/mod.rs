//! Schema Validator
//!
//! Validates config documents against the oh-my-opencode JSON schema that is
//! embedded at build time. The schema is compiled once; a compiled
//! [`SchemaValidator`] is immutable and can be shared across threads.

mod drift;

pub use drift::{schema_drift, SchemaDrift};

use crate::config::Config;
use jsonschema::{Draft, Validator};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// The schema shipped with this build
const EMBEDDED_SCHEMA: &str = include_str!("../../schema/oh-my-opencode.schema.json");

/// Errors building a validator or preparing a document for validation
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema text is not JSON
    #[error("Schema is not valid JSON: {0}")]
    InvalidJson(String),

    /// The schema is JSON but not a usable JSON schema
    #[error("Schema failed to compile: {0}")]
    Compile(String),

    /// The config could not be serialized for validation
    #[error("Failed to serialize config for validation: {0}")]
    Serialize(String),
}

/// One schema violation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValidationIssue {
    /// JSON pointer of the offending value, `""` for the document root
    pub path: String,
    /// Human-readable description
    pub message: String,
}

impl ValidationIssue {
    /// The path for display, with the root shown as `/`
    #[must_use]
    pub fn display_path(&self) -> &str {
        if self.path.is_empty() {
            "/"
        } else {
            &self.path
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.display_path(), self.message)
    }
}

/// The raw embedded schema document
///
/// # Errors
/// Returns an error if the embedded schema text is not JSON
pub fn embedded_schema() -> Result<Value, SchemaError> {
    serde_json::from_str(EMBEDDED_SCHEMA).map_err(|e| SchemaError::InvalidJson(e.to_string()))
}

/// A compiled schema
pub struct SchemaValidator {
    validator: Validator,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator").finish_non_exhaustive()
    }
}

impl SchemaValidator {
    /// Compile the embedded schema
    ///
    /// # Errors
    /// Returns an error if the embedded schema cannot be parsed or compiled.
    /// Callers treat this as fatal for any save attempt.
    pub fn embedded() -> Result<Self, SchemaError> {
        Self::from_value(&embedded_schema()?)
    }

    /// Compile an arbitrary schema document
    ///
    /// # Errors
    /// Returns an error if the schema cannot be compiled
    pub fn from_value(schema: &Value) -> Result<Self, SchemaError> {
        let validator = jsonschema::options()
            .with_draft(Draft::Draft7)
            .build(schema)
            .map_err(|e| SchemaError::Compile(e.to_string()))?;
        Ok(Self { validator })
    }

    /// Validate a typed config
    ///
    /// The config is serialized first, so the result reflects exactly what
    /// would be written to disk.
    ///
    /// # Errors
    /// Returns an error only if the config cannot be serialized
    pub fn validate(&self, config: &Config) -> Result<Vec<ValidationIssue>, SchemaError> {
        let value = config
            .to_value()
            .map_err(|e| SchemaError::Serialize(e.to_string()))?;
        Ok(self.validate_value(&value))
    }

    /// Validate a raw JSON document
    ///
    /// An empty list means the document is valid.
    #[must_use]
    pub fn validate_value(&self, document: &Value) -> Vec<ValidationIssue> {
        let issues: Vec<ValidationIssue> = self
            .validator
            .iter_errors(document)
            .map(|err| ValidationIssue {
                path: err.instance_path().to_string(),
                message: err.to_string(),
            })
            .collect();
        tracing::debug!(count = issues.len(), "schema validation finished");
        issues
    }

    /// Validate raw bytes, reporting a JSON syntax error as a root issue
    #[must_use]
    pub fn validate_bytes(&self, bytes: &[u8]) -> Vec<ValidationIssue> {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => self.validate_value(&value),
            Err(e) => vec![ValidationIssue {
                path: String::new(),
                message: format!("invalid JSON: {e}"),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_embedded_schema_compiles() {
        assert!(SchemaValidator::embedded().is_ok());
    }

    #[test]
    fn test_invalid_schema_is_compile_error() {
        let result = SchemaValidator::from_value(&json!({"type": 12}));
        assert!(matches!(result, Err(SchemaError::Compile(_))));
    }

    #[test]
    fn test_issue_display_uses_root_slash() {
        let issue = ValidationIssue {
            path: String::new(),
            message: "bad".to_string(),
        };
        assert_eq!(issue.to_string(), "/: bad");
    }

    #[test]
    fn test_validate_bytes_reports_syntax_error() {
        let validator = SchemaValidator::embedded().unwrap();
        let issues = validator.validate_bytes(b"{not json");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.starts_with("invalid JSON"));
    }
}
