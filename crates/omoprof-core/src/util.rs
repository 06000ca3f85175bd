//! Utility functions for omoprof

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Longest accepted profile name
pub const MAX_NAME_LEN: usize = 64;

/// Errors related to profile name validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("Profile name cannot be empty")]
    Empty,

    #[error("Profile name is longer than {MAX_NAME_LEN} characters")]
    TooLong,

    #[error("Profile name cannot start with a dot: {0}")]
    LeadingDot(String),

    #[error("Profile name contains invalid character '{1}': {0}")]
    InvalidCharacter(String, char),
}

/// Validate a profile name for use as a file stem
///
/// Names may contain ASCII letters, digits, `-`, `_` and `.`, must not be
/// empty and must not start with a dot.
///
/// # Errors
/// Returns an error describing the first problem found
pub fn validate_profile_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(NameError::TooLong);
    }

    if name.starts_with('.') {
        return Err(NameError::LeadingDot(name.to_string()));
    }

    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(NameError::InvalidCharacter(name.to_string(), bad));
    }

    Ok(())
}

/// Write a file atomically
///
/// Content goes to a temporary file in the destination directory which is
/// then renamed over `path`, so readers never see a partial document.
///
/// # Errors
/// Returns an error if the directory cannot be created or the write fails
pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
