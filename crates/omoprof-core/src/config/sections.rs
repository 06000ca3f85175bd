//! Nested feature sections of the config document

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Claude Code compatibility switches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaudeCodeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcp: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agents: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hooks: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins_override: Option<BTreeMap<String, bool>>,
}

/// Orchestrator agent behavior
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SisyphusAgentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_builder_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planner_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_plan: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentCheckerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_prompt: Option<String>,
}

/// How loudly context pruning reports itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PruningNotification {
    Off,
    Minimal,
    Detailed,
}

impl PruningNotification {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Minimal => "minimal",
            Self::Detailed => "detailed",
        }
    }

    #[must_use]
    pub fn all() -> &'static [PruningNotification] {
        &[Self::Off, Self::Minimal, Self::Detailed]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnProtectionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turns: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicContextPruningConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<PruningNotification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_protection: Option<TurnProtectionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protected_tools: Option<Vec<String>>,
}

/// Experimental features
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggressive_truncation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_resume: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncate_all_tool_outputs: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_context_pruning: Option<DynamicContextPruningConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RalphLoopConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_max_iterations: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<String>,
}

/// Background task tuning
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundTaskConfig {
    #[serde(
        rename = "defaultConcurrency",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub default_concurrency: Option<u32>,
    #[serde(
        rename = "providerConcurrency",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub provider_concurrency: Option<BTreeMap<String, u32>>,
    #[serde(
        rename = "modelConcurrency",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub model_concurrency: Option<BTreeMap<String, u32>>,
    #[serde(
        rename = "staleTimeoutMs",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub stale_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_enable: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitMasterConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_footer: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_co_authored_by: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserAutomationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmuxConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_pane_size: Option<u32>,
}
