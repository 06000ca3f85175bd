//! Per-category model overrides

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Categories oh-my-opencode defines out of the box
pub const BUILTIN_CATEGORIES: &[&str] = &[
    "visual-engineering",
    "ultrabrain",
    "artistry",
    "quick",
    "unspecified-low",
    "unspecified-high",
    "writing",
];

/// Extended thinking switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThinkingType {
    Enabled,
    Disabled,
}

impl ThinkingType {
    /// Get the JSON value
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
        }
    }
}

/// Extended thinking settings, present only when configured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThinkingConfig {
    #[serde(rename = "type")]
    pub kind: ThinkingType,
    #[serde(
        rename = "budgetTokens",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub budget_tokens: Option<u64>,
}

/// Overrides for one task category, keyed by name in `Config::categories`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<ThinkingConfig>,
    #[serde(
        rename = "reasoningEffort",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub reasoning_effort: Option<String>,
    #[serde(
        rename = "textVerbosity",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub text_verbosity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<BTreeMap<String, bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_append: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_unstable_agent: Option<bool>,
    /// Keys this version does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
