//! Opaque `skills` fragment

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `skills` value, kept exactly as it was read
///
/// oh-my-opencode accepts either a list of skill names or an object with
/// per-skill settings. Neither shape is interpreted here; the fragment is
/// only carried and re-emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Skills(Value);

impl Skills {
    /// Wrap a JSON fragment
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Whether the fragment is a JSON array
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.0.is_array()
    }

    /// Whether the fragment is a JSON object
    #[must_use]
    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }

    /// Borrow the raw fragment
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Take the raw fragment
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}
