//! Corrupted-file recovery
//!
//! A persisted JSON document that no longer parses is copied next to itself
//! with a `.bak` suffix and replaced in memory by a default value. The caller
//! learns where the backup went so it can tell the user.

use serde::de::DeserializeOwned;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A value that may have been reset after a parse failure
#[derive(Debug, Clone, PartialEq)]
pub struct Recovered<T> {
    /// The parsed value, or the default when recovery kicked in
    pub value: T,
    /// Where the unreadable original was copied, if recovery happened
    pub backup: Option<PathBuf>,
}

impl<T> Recovered<T> {
    fn clean(value: T) -> Self {
        Self {
            value,
            backup: None,
        }
    }

    /// Whether the value was reset
    #[must_use]
    pub fn was_recovered(&self) -> bool {
        self.backup.is_some()
    }
}

/// Path of the backup for `path`: the same path with `.bak` appended
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}

/// Copy a file to its `.bak` sibling, replacing an older backup
///
/// # Errors
/// Returns an error if the copy fails
pub fn backup_file(path: &Path) -> io::Result<PathBuf> {
    let backup = backup_path(path);
    fs::copy(path, &backup)?;
    Ok(backup)
}

/// Read a JSON document, falling back to `T::default()` when it is missing
/// or corrupt
///
/// A missing file yields the default without a backup. A file that fails to
/// parse is backed up first.
///
/// # Errors
/// Returns an error only for I/O failures (reading, or writing the backup)
pub fn read_json_or_default<T>(path: &Path) -> io::Result<Recovered<T>>
where
    T: DeserializeOwned + Default,
{
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok(Recovered::clean(T::default()))
        }
        Err(e) => return Err(e),
    };

    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(Recovered::clean(value)),
        Err(err) => {
            let backup = backup_file(path)?;
            tracing::warn!(
                path = %path.display(),
                backup = %backup.display(),
                error = %err,
                "unreadable document backed up and reset to defaults"
            );
            Ok(Recovered {
                value: T::default(),
                backup: Some(backup),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    struct Doc {
        #[serde(default)]
        count: u32,
    }

    #[test]
    fn test_backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("/tmp/work.json")),
            PathBuf::from("/tmp/work.json.bak")
        );
    }

    #[test]
    fn test_missing_file_is_default_without_backup() {
        let dir = tempfile::tempdir().unwrap();
        let loaded: Recovered<Doc> = read_json_or_default(&dir.path().join("none.json")).unwrap();
        assert_eq!(loaded.value, Doc::default());
        assert!(!loaded.was_recovered());
    }

    #[test]
    fn test_corrupt_file_is_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, "{\"count\": ").unwrap();

        let loaded: Recovered<Doc> = read_json_or_default(&path).unwrap();
        assert_eq!(loaded.value, Doc::default());
        let backup = loaded.backup.unwrap();
        assert_eq!(backup, dir.path().join("doc.json.bak"));
        assert_eq!(fs::read_to_string(backup).unwrap(), "{\"count\": ");
    }

    #[test]
    fn test_valid_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, r#"{"count": 3}"#).unwrap();
        let loaded: Recovered<Doc> = read_json_or_default(&path).unwrap();
        assert_eq!(loaded.value.count, 3);
    }
}
