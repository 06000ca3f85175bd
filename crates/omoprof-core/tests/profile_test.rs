//! Profile store, commit, recovery and activation tests

use omoprof_core::config::Config;
use omoprof_core::profile::{
    activate_profile, commit_profile, detect_active, CommitError, Profile, ProfileStore,
};
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, ProfileStore) {
    let dir = TempDir::new().unwrap();
    let store = ProfileStore::new(dir.path().join("profiles"));
    (dir, store)
}

fn config(text: &str) -> Config {
    text.parse().unwrap()
}

// =============================================================================
// Store
// =============================================================================

#[test]
fn test_save_load_round_trip() {
    let (_dir, store) = setup();
    let profile = Profile::new(
        "work",
        config(r#"{"agents":{"oracle":{"permission":{"bash":{"git":"allow"}}}},"skills":[]}"#),
    );
    store.save(&profile).unwrap();

    assert!(store.exists("work"));
    assert_eq!(store.load("work").unwrap(), profile);
}

#[test]
fn test_delete_removes_profile() {
    let (_dir, store) = setup();
    store.save(&Profile::new("gone", Config::default())).unwrap();
    store.delete("gone").unwrap();
    assert!(!store.exists("gone"));
    assert!(store.list().unwrap().is_empty());
}

// =============================================================================
// Rename law
// =============================================================================

#[test]
fn test_rename_to_unused_name_moves_content() {
    let (_dir, store) = setup();
    store.save(&Profile::new("draft", Config::default())).unwrap();

    let edited = Profile::new("final", config(r#"{"disabled_agents":["librarian"]}"#));
    let outcome = commit_profile(&store, &edited, Some("draft")).unwrap();

    assert_eq!(outcome.renamed_from.as_deref(), Some("draft"));
    assert!(!store.exists("draft"));
    assert_eq!(store.load("final").unwrap(), edited);
}

#[test]
fn test_rename_to_taken_name_writes_nothing() {
    let (_dir, store) = setup();
    let first = Profile::new("first", config(r#"{"google_auth":true}"#));
    let second = Profile::new("second", config(r#"{"google_auth":false}"#));
    store.save(&first).unwrap();
    store.save(&second).unwrap();

    let renamed = Profile::new("second", first.config.clone());
    let err = commit_profile(&store, &renamed, Some("first")).unwrap_err();

    assert!(matches!(err, CommitError::NameConflict(_)));
    assert_eq!(store.load("first").unwrap(), first);
    assert_eq!(store.load("second").unwrap(), second);
}

// =============================================================================
// Recovery
// =============================================================================

#[test]
fn test_load_or_recover_backs_up_corrupt_profile() {
    let (_dir, store) = setup();
    fs::create_dir_all(store.dir()).unwrap();
    fs::write(store.dir().join("broken.json"), "{\"agents\": ").unwrap();

    let recovered = store.load_or_recover("broken").unwrap();
    assert!(recovered.was_recovered());
    assert_eq!(recovered.value.config, Config::default());
    assert_eq!(recovered.value.name, "broken");

    let backup = store.dir().join("broken.json.bak");
    assert_eq!(fs::read_to_string(backup).unwrap(), "{\"agents\": ");
    assert_eq!(store.list().unwrap(), vec!["broken"]);
}

#[test]
fn test_load_or_recover_passes_through_valid_profile() {
    let (_dir, store) = setup();
    store.save(&Profile::new("ok", Config::default())).unwrap();
    let recovered = store.load_or_recover("ok").unwrap();
    assert!(!recovered.was_recovered());
}

// =============================================================================
// Activation
// =============================================================================

#[test]
fn test_activation_backs_up_previous_target() {
    let (dir, _store) = setup();
    let target = dir.path().join("oh-my-opencode.json");
    fs::write(&target, "{\"google_auth\": true}").unwrap();

    let profile = Profile::new("quiet", config(r#"{"google_auth":false}"#));
    let activation = activate_profile(&profile, &target).unwrap();

    let backup = activation.backup.unwrap();
    assert_eq!(fs::read_to_string(backup).unwrap(), "{\"google_auth\": true}");
    let written: Config = fs::read_to_string(&target).unwrap().parse().unwrap();
    assert_eq!(written, profile.config);
}

#[test]
fn test_detect_active_matches_by_content() {
    let (dir, store) = setup();
    store.save(&Profile::new("alpha", config(r#"{"auto_update":true}"#))).unwrap();
    store.save(&Profile::new("beta", config(r#"{"auto_update":false}"#))).unwrap();

    let target = dir.path().join("live.json");
    fs::write(&target, "{\n    \"auto_update\":   false\n}").unwrap();

    assert_eq!(detect_active(&store, &target).unwrap().as_deref(), Some("beta"));
}

#[test]
fn test_detect_active_no_match() {
    let (dir, store) = setup();
    store.save(&Profile::new("alpha", Config::default())).unwrap();
    let target = dir.path().join("live.json");
    fs::write(&target, r#"{"google_auth":true}"#).unwrap();

    assert_eq!(detect_active(&store, &target).unwrap(), None);
}
