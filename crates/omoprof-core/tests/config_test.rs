//! Config model tests
//!
//! Round-trips of realistic documents through the typed model.

use omoprof_core::config::{BashPermission, Config, Permission};
use serde_json::{json, Value};

fn round_trip(config: &Config) -> Config {
    let bytes = config.to_vec().unwrap();
    Config::from_slice(&bytes).unwrap()
}

fn full_document() -> Value {
    json!({
        "$schema": "https://raw.githubusercontent.com/code-yeongyu/oh-my-opencode/master/assets/oh-my-opencode.schema.json",
        "disabled_hooks": ["comment-checker"],
        "google_auth": false,
        "agents": {
            "oracle": {
                "model": "openai/gpt-5.2",
                "temperature": 0.3,
                "permission": { "edit": "deny", "bash": "ask" }
            },
            "explore": {
                "disable": true,
                "permission": { "bash": { "git status": "allow", "rm": "deny" } }
            }
        },
        "categories": {
            "visual-engineering": {
                "model": "google/gemini-3-pro",
                "thinking": { "type": "enabled", "budgetTokens": 16000 }
            }
        },
        "claude_code": { "mcp": true, "hooks": false },
        "experimental": {
            "dynamic_context_pruning": { "enabled": true, "notification": "minimal" }
        },
        "background_task": { "defaultConcurrency": 3 },
        "skills": { "sources": ["./skills"], "enable": ["playwright"] }
    })
}

// =============================================================================
// Round-trip
// =============================================================================

#[test]
fn test_full_document_round_trips() {
    let config = Config::from_value(full_document()).unwrap();
    assert_eq!(round_trip(&config), config);
    assert_eq!(config.to_value().unwrap(), full_document());
}

#[test]
fn test_tri_state_booleans_survive() {
    let config: Config = r#"{"google_auth": false, "claude_code": {"mcp": true}}"#.parse().unwrap();
    let again = round_trip(&config);

    assert_eq!(again.google_auth, Some(false));
    assert_eq!(again.auto_update, None);
    let claude = again.claude_code.unwrap();
    assert_eq!(claude.mcp, Some(true));
    assert_eq!(claude.commands, None);
}

#[test]
fn test_bash_variant_is_preserved() {
    let config = Config::from_value(full_document()).unwrap();
    let again = round_trip(&config);
    let agents = again.agents.unwrap();

    let oracle_bash = agents["oracle"].permission.as_ref().unwrap().bash.clone();
    assert_eq!(oracle_bash, Some(BashPermission::Simple(Permission::Ask)));

    let explore_bash = agents["explore"].permission.as_ref().unwrap().bash.clone().unwrap();
    assert!(explore_bash.is_per_command());
    match explore_bash {
        BashPermission::PerCommand(rules) => {
            assert_eq!(rules["git status"], Permission::Allow);
            assert_eq!(rules["rm"], Permission::Deny);
        }
        BashPermission::Simple(_) => panic!("expected per-command rules"),
    }
}

#[test]
fn test_skills_shape_is_preserved() {
    let as_array: Config = r#"{"skills": ["playwright", "git-master"]}"#.parse().unwrap();
    let as_object: Config = r#"{"skills": {"enable": ["playwright"]}}"#.parse().unwrap();

    assert!(round_trip(&as_array).skills.unwrap().is_array());
    assert!(round_trip(&as_object).skills.unwrap().is_object());
}

#[test]
fn test_skills_key_order_is_kept() {
    let text = r#"{"skills":{"zeta":1,"alpha":2}}"#;
    let config: Config = text.parse().unwrap();
    let bytes = config.to_vec().unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), text);
}

#[test]
fn test_unknown_keys_survive() {
    let config: Config =
        r#"{"future_feature": {"level": 3}, "agents": {"oracle": {"new_knob": true}}}"#
            .parse()
            .unwrap();
    let value = round_trip(&config).to_value().unwrap();

    assert_eq!(value["future_feature"]["level"], 3);
    assert_eq!(value["agents"]["oracle"]["new_knob"], true);
}

// =============================================================================
// Empty config
// =============================================================================

#[test]
fn test_default_config_is_empty_object() {
    let config = Config::default();
    assert_eq!(config.to_vec().unwrap(), b"{}");
    assert!(config.is_empty());
}

#[test]
fn test_empty_object_parses_to_default() {
    let config: Config = "{}".parse().unwrap();
    assert_eq!(config, Config::default());
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_wrong_shape_is_parse_error() {
    let err = "{\"agents\": []}".parse::<Config>().unwrap_err();
    assert!(!err.is_eof());
    assert!(err.to_string().starts_with("Invalid config JSON"));
}

#[test]
fn test_truncated_input_is_eof() {
    let err = "{\"agents\": {".parse::<Config>().unwrap_err();
    assert!(err.is_eof());
}
