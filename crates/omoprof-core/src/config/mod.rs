//! Config Data Model
//!
//! Typed representation of the oh-my-opencode configuration document:
//! - Root [`Config`] with every field optional
//! - Per-agent overrides ([`AgentConfig`]) with the polymorphic `bash` permission
//! - Per-category overrides ([`CategoryConfig`]) with nested thinking settings
//! - The opaque [`Skills`] fragment
//!
//! Absent fields are `None` and are never written. Keys the model does not
//! know are kept in `extra` and written back unchanged.

mod agent;
mod category;
mod error;
mod hook;
mod permission;
mod sections;
mod skills;

pub use agent::{AgentConfig, AgentMode, BUILTIN_AGENTS};
pub use category::{CategoryConfig, ThinkingConfig, ThinkingType, BUILTIN_CATEGORIES};
pub use error::ParseError;
pub use hook::{is_builtin_hook, BUILTIN_HOOKS};
pub use permission::{AgentPermission, BashPermission, Permission};
pub use sections::{
    BackgroundTaskConfig, BrowserAutomationConfig, ClaudeCodeConfig, CommentCheckerConfig,
    DynamicContextPruningConfig, ExperimentalConfig, GitMasterConfig, NotificationConfig,
    PruningNotification, RalphLoopConfig, SisyphusAgentConfig, TmuxConfig, TurnProtectionConfig,
};
pub use skills::Skills;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::str::FromStr;

/// The oh-my-opencode configuration document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_mcps: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_agents: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_hooks: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_commands: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agents: Option<BTreeMap<String, AgentConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<BTreeMap<String, CategoryConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claude_code: Option<ClaudeCodeConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_auth: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sisyphus_agent: Option<SisyphusAgentConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_checker: Option<CommentCheckerConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experimental: Option<ExperimentalConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_update: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Skills>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ralph_loop: Option<RalphLoopConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_task: Option<BackgroundTaskConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_master: Option<GitMasterConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_automation_engine: Option<BrowserAutomationConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmux: Option<TmuxConfig>,
    /// Top-level keys this version does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Config {
    /// Parse a config document from raw bytes
    ///
    /// # Errors
    /// Returns a [`ParseError`] carrying the JSON syntax or shape error
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ParseError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Parse a config document from an already-decoded JSON value
    ///
    /// # Errors
    /// Returns a [`ParseError`] if the value does not have the config shape
    pub fn from_value(value: Value) -> Result<Self, ParseError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Serialize to compact JSON bytes
    ///
    /// # Errors
    /// Returns an error if serialization fails
    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Serialize to the two-space indented form used on disk and in previews
    ///
    /// # Errors
    /// Returns an error if serialization fails
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serialize to a JSON value tree
    ///
    /// # Errors
    /// Returns an error if serialization fails
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// True when no field is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// SHA256 of the compact serialization, hex encoded
    ///
    /// Two configs with the same content hash serialize identically.
    ///
    /// # Errors
    /// Returns an error if serialization fails
    pub fn content_hash(&self) -> Result<String, serde_json::Error> {
        let bytes = self.to_vec()?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }

    /// Number of agents with overrides
    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.agents.as_ref().map_or(0, BTreeMap::len)
    }

    /// Number of categories with overrides
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.categories.as_ref().map_or(0, BTreeMap::len)
    }
}

impl FromStr for Config {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slice(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_serializes_to_empty_object() {
        let config = Config::default();
        assert_eq!(config.to_vec().unwrap(), b"{}");
        assert!(config.is_empty());
    }

    #[test]
    fn test_explicit_false_is_kept() {
        let config: Config = r#"{"auto_update": false}"#.parse().unwrap();
        assert_eq!(config.auto_update, Some(false));
        assert_eq!(
            String::from_utf8(config.to_vec().unwrap()).unwrap(),
            r#"{"auto_update":false}"#
        );
    }

    #[test]
    fn test_malformed_json_reports_position() {
        let err = Config::from_slice(b"{\n  \"auto_update\": tru\n}").unwrap_err();
        assert_eq!(err.line(), 2);
        assert!(err.to_string().starts_with("Invalid config JSON"));
    }

    #[test]
    fn test_content_hash_ignores_whitespace() {
        let a: Config = r#"{"auto_update":true}"#.parse().unwrap();
        let b: Config = "{\n  \"auto_update\" : true\n}".parse().unwrap();
        assert_eq!(a.content_hash().unwrap(), b.content_hash().unwrap());
    }
}
