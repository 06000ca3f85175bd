//! Per-agent overrides

use super::permission::AgentPermission;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Agents shipped with oh-my-opencode
pub const BUILTIN_AGENTS: &[&str] = &[
    "sisyphus",
    "oracle",
    "librarian",
    "explore",
    "frontend-ui-ux-engineer",
    "document-writer",
    "multimodal-looker",
    "prometheus",
    "metis",
    "momus",
    "atlas",
];

/// Where an agent can be invoked from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentMode {
    Subagent,
    Primary,
    All,
}

impl AgentMode {
    /// Get the JSON value for this mode
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Subagent => "subagent",
            Self::Primary => "primary",
            Self::All => "all",
        }
    }

    /// All modes
    #[must_use]
    pub fn all() -> &'static [AgentMode] {
        &[Self::Subagent, Self::Primary, Self::All]
    }
}

impl FromStr for AgentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subagent" => Ok(Self::Subagent),
            "primary" => Ok(Self::Primary),
            "all" => Ok(Self::All),
            _ => Err(format!("Unknown agent mode: {s}")),
        }
    }
}

impl fmt::Display for AgentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overrides for one agent, keyed by agent name in `Config::agents`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// Category whose settings this agent inherits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_append: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<BTreeMap<String, bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<AgentMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<AgentPermission>,
    /// Keys this version does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AgentConfig {
    /// True when the agent carries no override at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
