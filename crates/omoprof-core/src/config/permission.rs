//! Agent permission values

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A single permission decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Allow,
    Ask,
    Deny,
}

impl Permission {
    /// Get the JSON value for this permission
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Ask => "ask",
            Self::Deny => "deny",
        }
    }

    /// All permission values, in cycle order
    #[must_use]
    pub fn all() -> &'static [Permission] {
        &[Self::Allow, Self::Ask, Self::Deny]
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allow" => Ok(Self::Allow),
            "ask" => Ok(Self::Ask),
            "deny" => Ok(Self::Deny),
            _ => Err(format!("Unknown permission: {s}")),
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `bash` permission of an agent
///
/// Either one permission for every command, or a map from command prefix
/// to permission. Whichever shape was parsed is the shape written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BashPermission {
    /// `"bash": "ask"`
    Simple(Permission),
    /// `"bash": { "git push": "deny", "*": "allow" }`
    PerCommand(BTreeMap<String, Permission>),
}

impl BashPermission {
    /// Whether this is the per-command map shape
    #[must_use]
    pub fn is_per_command(&self) -> bool {
        matches!(self, Self::PerCommand(_))
    }

    /// Short text for list and form display
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Simple(permission) => permission.to_string(),
            Self::PerCommand(rules) => format!("per-command ({} rules)", rules.len()),
        }
    }
}

/// Permission overrides for an agent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentPermission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit: Option<Permission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bash: Option<BashPermission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webfetch: Option<Permission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doom_loop: Option<Permission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_directory: Option<Permission>,
}

impl AgentPermission {
    /// True when no permission is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edit.is_none()
            && self.bash.is_none()
            && self.webfetch.is_none()
            && self.doom_loop.is_none()
            && self.external_directory.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_simple_shape_preserved() {
        let parsed: BashPermission = serde_json::from_str(r#""ask""#).unwrap();
        assert_eq!(parsed, BashPermission::Simple(Permission::Ask));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), r#""ask""#);
    }

    #[test]
    fn test_bash_map_shape_preserved() {
        let parsed: BashPermission =
            serde_json::from_str(r#"{"git push":"deny","*":"allow"}"#).unwrap();
        assert!(parsed.is_per_command());
        let value = serde_json::to_value(&parsed).unwrap();
        assert!(value.is_object());
        assert_eq!(value["git push"], "deny");
    }

    #[test]
    fn test_bash_rejects_unknown_permission() {
        let parsed: Result<BashPermission, _> = serde_json::from_str(r#""sometimes""#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_permission_from_str() {
        assert_eq!("deny".parse::<Permission>().unwrap(), Permission::Deny);
        assert!("DENY".parse::<Permission>().is_err());
    }
}
