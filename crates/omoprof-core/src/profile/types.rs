//! Profile type definitions

use crate::config::Config;

/// A named config document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    /// File stem in the profiles directory
    pub name: String,
    /// The config document
    pub config: Config,
}

impl Profile {
    /// Create a profile
    #[must_use]
    pub fn new(name: impl Into<String>, config: Config) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    /// Start a new profile from an existing one
    ///
    /// The config is copied and the name is left empty for the user to fill.
    #[must_use]
    pub fn from_template(source: &Profile) -> Self {
        Self {
            name: String::new(),
            config: source.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_template_clears_name() {
        let config: Config = r#"{"disabled_hooks":["todo-continuation-enforcer"]}"#.parse().unwrap();
        let source = Profile::new("work", config);
        let copy = Profile::from_template(&source);
        assert!(copy.name.is_empty());
        assert_eq!(copy.config, source.config);
    }
}
