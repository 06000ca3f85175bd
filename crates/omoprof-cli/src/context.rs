//! Resolved runtime context shared by commands and the TUI

use anyhow::{Context, Result};
use omoprof_core::profile::ProfileStore;
use omoprof_core::settings::Settings;
use std::path::PathBuf;

use crate::cli::Cli;

/// Settings with CLI overrides applied
#[derive(Debug, Clone)]
pub struct AppContext {
    pub settings: Settings,
    pub store: ProfileStore,
    /// The live oh-my-opencode config path
    pub target: PathBuf,
}

impl AppContext {
    pub fn load(home: PathBuf, cli: &Cli) -> Result<Self> {
        let loaded = Settings::load_from(&home)
            .with_context(|| format!("failed to load settings from {}", home.display()))?;
        if let Some(backup) = &loaded.backup {
            eprintln!(
                "warning: settings file was unreadable and has been reset (backup: {})",
                backup.display()
            );
        }
        let settings = loaded.value;

        let profiles_dir = cli
            .profiles_dir
            .clone()
            .unwrap_or_else(|| settings.profiles_dir(&home));
        let target = match &cli.target {
            Some(target) => target.clone(),
            None => settings.target_config()?,
        };
        tracing::debug!(
            profiles = %profiles_dir.display(),
            target = %target.display(),
            "context resolved"
        );

        Ok(Self {
            store: ProfileStore::new(profiles_dir),
            target,
            settings,
        })
    }
}
