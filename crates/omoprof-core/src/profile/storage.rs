//! Profile file storage
//!
//! Profiles live in a single directory as `<name>.json`. Other files in the
//! directory (including `.bak` backups) are ignored.

use crate::config::{Config, ParseError};
use crate::profile::Profile;
use crate::recovery::{backup_file, Recovered};
use crate::util::{validate_profile_name, write_atomic, NameError};
use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File extension of stored profiles
const PROFILE_EXTENSION: &str = "json";

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from the profile store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The name is not usable as a file stem
    #[error(transparent)]
    InvalidName(#[from] NameError),

    /// No profile with this name
    #[error("Profile '{0}' not found")]
    NotFound(String),

    /// The stored file is not a valid config
    #[error("Profile '{name}' is not a valid config: {source}")]
    Parse {
        name: String,
        #[source]
        source: ParseError,
    },

    /// File I/O error
    #[error("I/O error for {path}: {message}")]
    Io { path: PathBuf, message: String },
}

impl StoreError {
    /// Get the error code for CLI output
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidName(_) => "INVALID_NAME",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::Io { .. } => "IO_ERROR",
        }
    }

    fn io(path: &Path, err: &io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

/// File metadata for a stored profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileInfo {
    pub name: String,
    pub path: PathBuf,
    /// Size of the file in bytes
    pub size: u64,
    pub modified: DateTime<Utc>,
}

/// Directory-backed collection of profiles
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    /// Open a store rooted at `dir`
    ///
    /// The directory is created lazily on the first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory holding the profiles
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file for `name`
    ///
    /// # Errors
    /// Returns an error if the name is invalid
    pub fn path_for(&self, name: &str) -> StoreResult<PathBuf> {
        validate_profile_name(name)?;
        Ok(self.dir.join(format!("{name}.{PROFILE_EXTENSION}")))
    }

    /// Names of all stored profiles, sorted
    ///
    /// A missing directory is an empty store.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be read
    pub fn list(&self) -> StoreResult<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.dir, &e)),
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.extension()
                    .is_some_and(|ext| ext == PROFILE_EXTENSION)
            })
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(ToString::to_string)
            })
            .filter(|name| validate_profile_name(name).is_ok())
            .collect();

        names.sort();
        Ok(names)
    }

    /// Whether a profile with this name is stored
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_ok_and(|path| path.is_file())
    }

    /// File metadata for a stored profile
    ///
    /// # Errors
    /// Returns an error if the profile is missing or its metadata is unreadable
    pub fn info(&self, name: &str) -> StoreResult<ProfileInfo> {
        let path = self.path_for(name)?;
        let metadata = fs::metadata(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound(name.to_string())
            } else {
                StoreError::io(&path, &e)
            }
        })?;
        let modified = metadata.modified().map_err(|e| StoreError::io(&path, &e))?;
        Ok(ProfileInfo {
            name: name.to_string(),
            size: metadata.len(),
            modified: DateTime::<Utc>::from(modified),
            path,
        })
    }

    /// Load a profile
    ///
    /// # Errors
    /// Returns an error if the profile is missing or does not parse
    pub fn load(&self, name: &str) -> StoreResult<Profile> {
        let path = self.path_for(name)?;
        let bytes = read_profile_bytes(&path, name)?;
        let config = Config::from_slice(&bytes).map_err(|source| StoreError::Parse {
            name: name.to_string(),
            source,
        })?;
        Ok(Profile::new(name, config))
    }

    /// Load a profile, resetting it to an empty config if the file is corrupt
    ///
    /// The unreadable file is copied to `<name>.json.bak` first.
    ///
    /// # Errors
    /// Returns an error if the profile is missing or the backup fails
    pub fn load_or_recover(&self, name: &str) -> StoreResult<Recovered<Profile>> {
        let path = self.path_for(name)?;
        let bytes = read_profile_bytes(&path, name)?;

        match Config::from_slice(&bytes) {
            Ok(config) => Ok(Recovered {
                value: Profile::new(name, config),
                backup: None,
            }),
            Err(err) => {
                let backup = backup_file(&path).map_err(|e| StoreError::io(&path, &e))?;
                tracing::warn!(
                    profile = name,
                    backup = %backup.display(),
                    error = %err,
                    "corrupt profile backed up and reset"
                );
                Ok(Recovered {
                    value: Profile::new(name, Config::default()),
                    backup: Some(backup),
                })
            }
        }
    }

    /// Save a profile, replacing any existing file atomically
    ///
    /// # Errors
    /// Returns an error if the name is invalid or the write fails
    pub fn save(&self, profile: &Profile) -> StoreResult<PathBuf> {
        let path = self.path_for(&profile.name)?;
        let mut content = profile
            .config
            .to_json_pretty()
            .map_err(|e| StoreError::Io {
                path: path.clone(),
                message: e.to_string(),
            })?;
        content.push('\n');

        write_atomic(&path, content.as_bytes()).map_err(|e| StoreError::io(&path, &e))?;
        tracing::info!(profile = %profile.name, path = %path.display(), "profile saved");
        Ok(path)
    }

    /// Delete a profile
    ///
    /// # Errors
    /// Returns an error if the profile is missing or cannot be removed
    pub fn delete(&self, name: &str) -> StoreResult<()> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(profile = name, "profile deleted");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(name.to_string()))
            }
            Err(e) => Err(StoreError::io(&path, &e)),
        }
    }

    /// Load every stored profile that parses, skipping the rest
    ///
    /// # Errors
    /// Returns an error if the directory cannot be listed
    pub fn load_all(&self) -> StoreResult<Vec<Profile>> {
        let mut profiles = Vec::new();
        for name in self.list()? {
            match self.load(&name) {
                Ok(profile) => profiles.push(profile),
                Err(err) => tracing::debug!(profile = %name, error = %err, "skipping profile"),
            }
        }
        Ok(profiles)
    }
}

fn read_profile_bytes(path: &Path, name: &str) -> StoreResult<Vec<u8>> {
    fs::read(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            StoreError::NotFound(name.to_string())
        } else {
            StoreError::io(path, &e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, ProfileStore) {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path().join("profiles"));
        (dir, store)
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let (_dir, store) = store();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_ignores_other_files() {
        let (_dir, store) = store();
        store.save(&Profile::new("beta", Config::default())).unwrap();
        store.save(&Profile::new("alpha", Config::default())).unwrap();
        fs::write(store.dir().join("alpha.json.bak"), "{}").unwrap();
        fs::write(store.dir().join("notes.txt"), "hi").unwrap();

        assert_eq!(store.list().unwrap(), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_save_writes_trailing_newline() {
        let (_dir, store) = store();
        let path = store.save(&Profile::new("work", Config::default())).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "{}\n");
    }

    #[test]
    fn test_info_reports_size() {
        let (_dir, store) = store();
        store.save(&Profile::new("work", Config::default())).unwrap();
        let info = store.info("work").unwrap();
        assert_eq!(info.size, 3);
        assert!(info.path.ends_with("work.json"));
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let (_dir, store) = store();
        let err = store.load("ghost").unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn test_load_rejects_bad_name() {
        let (_dir, store) = store();
        let err = store.load("../escape").unwrap_err();
        assert_eq!(err.code(), "INVALID_NAME");
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let (_dir, store) = store();
        assert!(matches!(
            store.delete("ghost"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_parse_error_keeps_name() {
        let (_dir, store) = store();
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.dir().join("broken.json"), "{ nope").unwrap();
        match store.load("broken") {
            Err(StoreError::Parse { name, .. }) => assert_eq!(name, "broken"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
