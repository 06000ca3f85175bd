//! Save and rename flow for edited profiles

use crate::profile::{Profile, ProfileStore, StoreError};
use crate::util::{validate_profile_name, NameError};
use thiserror::Error;

/// Errors that prevent a profile from being committed
#[derive(Debug, Error)]
pub enum CommitError {
    /// Another profile already uses the target name
    #[error("A profile named '{0}' already exists")]
    NameConflict(String),

    /// The name is not usable
    #[error(transparent)]
    InvalidName(#[from] NameError),

    /// Writing the new file failed
    #[error("Failed to save profile: {0}")]
    Persistence(#[from] StoreError),
}

/// What happened besides the write itself
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitOutcome {
    /// The previous name when the profile was renamed
    pub renamed_from: Option<String>,
    /// Set when the old file could not be removed after a rename
    pub stale_old_name: Option<String>,
}

/// Persist an edited or new profile
///
/// `original_name` is the name the profile had when editing started, or
/// `None` for a new profile. Saving under a name that belongs to a different
/// profile is refused without writing anything. After a rename the old file
/// is removed; if that fails the new file is kept and the leftover name is
/// reported in the outcome.
///
/// # Errors
/// Returns an error for an invalid or conflicting name, or a failed write
pub fn commit_profile(
    store: &ProfileStore,
    profile: &Profile,
    original_name: Option<&str>,
) -> Result<CommitOutcome, CommitError> {
    validate_profile_name(&profile.name)?;

    let is_same_file = original_name == Some(profile.name.as_str());
    if !is_same_file && store.exists(&profile.name) {
        return Err(CommitError::NameConflict(profile.name.clone()));
    }

    store.save(profile)?;

    let mut outcome = CommitOutcome::default();
    if let Some(old) = original_name.filter(|old| *old != profile.name) {
        outcome.renamed_from = Some(old.to_string());
        if let Err(err) = store.delete(old) {
            tracing::warn!(
                old = old,
                new = %profile.name,
                error = %err,
                "renamed profile saved but old file was not removed"
            );
            outcome.stale_old_name = Some(old.to_string());
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    fn setup() -> (TempDir, ProfileStore) {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_new_profile_is_saved() {
        let (_dir, store) = setup();
        let outcome = commit_profile(&store, &Profile::new("fresh", Config::default()), None).unwrap();
        assert_eq!(outcome, CommitOutcome::default());
        assert!(store.exists("fresh"));
    }

    #[test]
    fn test_new_profile_conflict_writes_nothing() {
        let (_dir, store) = setup();
        let original: Config = r#"{"disabled_agents":["oracle"]}"#.parse().unwrap();
        store.save(&Profile::new("taken", original.clone())).unwrap();

        let err = commit_profile(&store, &Profile::new("taken", Config::default()), None).unwrap_err();
        assert!(matches!(err, CommitError::NameConflict(ref n) if n == "taken"));
        assert_eq!(store.load("taken").unwrap().config, original);
    }

    #[test]
    fn test_edit_in_place_overwrites() {
        let (_dir, store) = setup();
        store.save(&Profile::new("work", Config::default())).unwrap();
        let edited: Config = r#"{"disabled_hooks":["auto-update-checker"]}"#.parse().unwrap();

        let outcome = commit_profile(&store, &Profile::new("work", edited.clone()), Some("work")).unwrap();
        assert!(outcome.renamed_from.is_none());
        assert_eq!(store.load("work").unwrap().config, edited);
    }

    #[test]
    fn test_rename_removes_old_file() {
        let (_dir, store) = setup();
        store.save(&Profile::new("old", Config::default())).unwrap();

        let outcome = commit_profile(&store, &Profile::new("new", Config::default()), Some("old")).unwrap();
        assert_eq!(outcome.renamed_from.as_deref(), Some("old"));
        assert!(outcome.stale_old_name.is_none());
        assert_eq!(store.list().unwrap(), vec!["new"]);
    }

    #[test]
    fn test_rename_onto_other_profile_conflicts() {
        let (_dir, store) = setup();
        store.save(&Profile::new("a", Config::default())).unwrap();
        store.save(&Profile::new("b", Config::default())).unwrap();

        let err = commit_profile(&store, &Profile::new("b", Config::default()), Some("a")).unwrap_err();
        assert!(matches!(err, CommitError::NameConflict(_)));
        assert_eq!(store.list().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_rename_with_missing_old_reports_stale() {
        let (_dir, store) = setup();
        let outcome = commit_profile(&store, &Profile::new("new", Config::default()), Some("vanished")).unwrap();
        assert_eq!(outcome.stale_old_name.as_deref(), Some("vanished"));
        assert!(store.exists("new"));
    }

    #[test]
    fn test_invalid_name_rejected() {
        let (_dir, store) = setup();
        let err = commit_profile(&store, &Profile::new("", Config::default()), None).unwrap_err();
        assert!(matches!(err, CommitError::InvalidName(NameError::Empty)));
    }
}
