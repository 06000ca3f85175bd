//! Switching the live oh-my-opencode config to a profile

use crate::config::Config;
use crate::profile::{Profile, ProfileStore, StoreError};
use crate::recovery::backup_file;
use crate::util::write_atomic;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors while activating a profile or reading the live config
#[derive(Debug, Error)]
pub enum ActivateError {
    /// File I/O error
    #[error("I/O error for {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// The profile could not be serialized
    #[error("Failed to serialize profile: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The profile store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ActivateError {
    fn io(path: &Path, err: &io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

/// Result of writing a profile to the live config path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    /// Where the config was written
    pub target: PathBuf,
    /// Copy of the previous live config, if there was one
    pub backup: Option<PathBuf>,
}

/// Write a profile's config to `target`
///
/// An existing file at `target` is copied to `<target>.bak` before it is
/// replaced.
///
/// # Errors
/// Returns an error if the backup or the write fails
pub fn activate_profile(profile: &Profile, target: &Path) -> Result<Activation, ActivateError> {
    let backup = if target.is_file() {
        Some(backup_file(target).map_err(|e| ActivateError::io(target, &e))?)
    } else {
        None
    };

    let mut content = profile.config.to_json_pretty()?;
    content.push('\n');
    write_atomic(target, content.as_bytes()).map_err(|e| ActivateError::io(target, &e))?;

    tracing::info!(
        profile = %profile.name,
        target = %target.display(),
        "profile activated"
    );

    Ok(Activation {
        target: target.to_path_buf(),
        backup,
    })
}

/// Find the stored profile whose config matches the live config
///
/// Matching compares [`Config::content_hash`], so formatting differences in
/// the live file do not matter. Returns `None` when the target is missing,
/// unreadable as a config, or matches no profile.
///
/// # Errors
/// Returns an error if the target or the store cannot be read
pub fn detect_active(store: &ProfileStore, target: &Path) -> Result<Option<String>, ActivateError> {
    let bytes = match fs::read(target) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ActivateError::io(target, &e)),
    };

    let Ok(live) = Config::from_slice(&bytes) else {
        return Ok(None);
    };
    let live_hash = live.content_hash()?;

    for profile in store.load_all()? {
        if profile.config.content_hash()? == live_hash {
            return Ok(Some(profile.name));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_activate_without_existing_target() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("opencode").join("oh-my-opencode.json");

        let result = activate_profile(&Profile::new("work", Config::default()), &target).unwrap();
        assert!(result.backup.is_none());
        assert_eq!(fs::read_to_string(&target).unwrap(), "{}\n");
    }

    #[test]
    fn test_detect_active_missing_target() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path().join("profiles"));
        assert_eq!(detect_active(&store, &dir.path().join("none.json")).unwrap(), None);
    }
}
