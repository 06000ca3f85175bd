//! Profile export/import
//!
//! Exports are plain oh-my-opencode config files, so an exported profile can
//! be dropped straight into the tool's config directory and any existing
//! config file can be imported.

use crate::config::{Config, ParseError};
use crate::profile::Profile;
use crate::schema::{SchemaError, SchemaValidator, ValidationIssue};
use crate::util::{validate_profile_name, write_atomic, NameError};
use std::fs;
use std::io;
use std::path::Path;

/// Error type for export/import operations
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The file is not a config document
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The document breaks the schema
    #[error("Config does not match the schema ({} issue(s))", .0.len())]
    Invalid(Vec<ValidationIssue>),

    /// The derived or given name is not usable
    #[error(transparent)]
    InvalidName(#[from] NameError),

    /// Serialization or schema failure
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Write a profile's config to `path` as pretty JSON
///
/// # Errors
/// Returns an error if serialization or the write fails
pub fn export_profile(profile: &Profile, path: &Path) -> Result<(), ImportError> {
    let mut content = profile
        .config
        .to_json_pretty()
        .map_err(|e| SchemaError::Serialize(e.to_string()))?;
    content.push('\n');
    write_atomic(path, content.as_bytes())?;
    tracing::info!(profile = %profile.name, path = %path.display(), "profile exported");
    Ok(())
}

/// Read a config file as a new profile
///
/// The profile is named `name` when given, otherwise after the file stem.
/// The document must satisfy the schema.
///
/// # Errors
/// Returns an error if the file cannot be read, does not parse, breaks the
/// schema, or yields an invalid name
pub fn import_profile(
    path: &Path,
    name: Option<&str>,
    validator: &SchemaValidator,
) -> Result<Profile, ImportError> {
    let name = match name {
        Some(name) => name.to_string(),
        None => path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string(),
    };
    validate_profile_name(&name)?;

    let bytes = fs::read(path)?;
    let config = Config::from_slice(&bytes)?;

    let issues = validator.validate(&config)?;
    if !issues.is_empty() {
        return Err(ImportError::Invalid(issues));
    }

    Ok(Profile::new(name, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export_then_import_keeps_config() {
        let dir = TempDir::new().unwrap();
        let config: Config = r#"{"agents":{"oracle":{"model":"openai/gpt-5.2"}}}"#.parse().unwrap();
        let path = dir.path().join("shared.json");

        export_profile(&Profile::new("work", config.clone()), &path).unwrap();
        let validator = SchemaValidator::embedded().unwrap();
        let imported = import_profile(&path, None, &validator).unwrap();

        assert_eq!(imported.name, "shared");
        assert_eq!(imported.config, config);
    }

    #[test]
    fn test_import_uses_explicit_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("oh-my-opencode.json");
        fs::write(&path, "{}").unwrap();
        let validator = SchemaValidator::embedded().unwrap();

        let imported = import_profile(&path, Some("home"), &validator).unwrap();
        assert_eq!(imported.name, "home");
    }

    #[test]
    fn test_import_rejects_schema_violation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"agents":{"oracle":{"temperature":7}}}"#).unwrap();
        let validator = SchemaValidator::embedded().unwrap();

        match import_profile(&path, None, &validator) {
            Err(ImportError::Invalid(issues)) => {
                assert!(issues[0].path.starts_with("/agents/oracle"));
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_import_rejects_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{").unwrap();
        let validator = SchemaValidator::embedded().unwrap();
        assert!(matches!(
            import_profile(&path, None, &validator),
            Err(ImportError::Parse(_))
        ));
    }
}
