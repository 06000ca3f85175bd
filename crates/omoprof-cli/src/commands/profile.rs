//! Profile subcommands: list, show, create, delete, import, export,
//! validate, use, current

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use omoprof_core::profile::{
    activate_profile, commit_profile, detect_active, export_profile, import_profile, Profile,
};
use omoprof_core::schema::SchemaValidator;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::context::AppContext;

pub fn list(ctx: &AppContext) -> Result<()> {
    let names = ctx.store.list()?;
    if names.is_empty() {
        println!("No profiles found.");
        return Ok(());
    }

    // A broken live config only hides the marker.
    let active = detect_active(&ctx.store, &ctx.target).ok().flatten();

    println!("Profiles:");
    for name in names {
        let marker = if active.as_deref() == Some(name.as_str()) {
            '*'
        } else {
            ' '
        };
        let modified = ctx
            .store
            .info(&name)
            .map(|info| {
                info.modified
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
            })
            .unwrap_or_default();
        println!("{marker} {name:<32} {modified}");
    }
    Ok(())
}

pub fn show(ctx: &AppContext, name: &str, json_only: bool) -> Result<()> {
    let profile = ctx.store.load(name)?;
    let json = profile.config.to_json_pretty()?;

    if json_only {
        println!("{json}");
        return Ok(());
    }

    let info = ctx.store.info(name)?;
    let active = detect_active(&ctx.store, &ctx.target).ok().flatten();

    println!("Profile: {}", profile.name);
    println!("Path: {}", info.path.display());
    println!(
        "Modified: {}",
        info.modified.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
    );
    println!("Active: {}", active.as_deref() == Some(name));
    println!("Agents: {}", profile.config.agent_count());
    println!("Categories: {}", profile.config.category_count());
    println!(
        "Disabled hooks: {}",
        profile.config.disabled_hooks.as_ref().map_or(0, Vec::len)
    );
    println!();
    println!("{json}");
    Ok(())
}

pub fn create(ctx: &AppContext, name: &str, from: Option<&str>) -> Result<()> {
    let profile = match from {
        Some(source) => {
            let source = ctx
                .store
                .load(source)
                .with_context(|| format!("cannot copy from '{source}'"))?;
            Profile {
                name: name.to_string(),
                ..Profile::from_template(&source)
            }
        }
        None => Profile::new(name, omoprof_core::Config::default()),
    };

    commit_profile(&ctx.store, &profile, None)?;
    println!("Created profile '{name}'");
    Ok(())
}

pub fn delete(ctx: &AppContext, name: &str, force: bool) -> Result<()> {
    if !ctx.store.exists(name) {
        bail!("Profile '{name}' not found");
    }

    if !force {
        print!("Delete profile '{name}'? [y/N] ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    ctx.store.delete(name)?;
    println!("Deleted profile '{name}'");
    Ok(())
}

pub fn import(ctx: &AppContext, file: &Path, name: Option<&str>) -> Result<()> {
    let validator = SchemaValidator::embedded()?;
    let profile = import_profile(file, name, &validator).map_err(|e| match e {
        omoprof_core::profile::ImportError::Invalid(issues) => {
            for issue in &issues {
                eprintln!("  {issue}");
            }
            anyhow!("{} does not match the schema", file.display())
        }
        other => anyhow!(other),
    })?;

    commit_profile(&ctx.store, &profile, None)?;
    println!("Imported '{}' from {}", profile.name, file.display());
    Ok(())
}

pub fn export(ctx: &AppContext, name: &str, output: Option<&Path>) -> Result<()> {
    let profile = ctx.store.load(name)?;
    let output = output.map_or_else(|| PathBuf::from(format!("{name}.json")), Path::to_path_buf);

    export_profile(&profile, &output)?;
    println!("Exported '{name}' to {}", output.display());
    Ok(())
}

pub fn validate(ctx: &AppContext, name: Option<&str>, file: Option<&Path>) -> Result<()> {
    let (label, bytes) = match (name, file) {
        (_, Some(file)) => (
            file.display().to_string(),
            fs::read(file).with_context(|| format!("failed to read {}", file.display()))?,
        ),
        (Some(name), None) => {
            let path = ctx.store.path_for(name)?;
            if !path.is_file() {
                bail!("Profile '{name}' not found");
            }
            (name.to_string(), fs::read(&path)?)
        }
        (None, None) => bail!("give a profile name or --file"),
    };

    let validator = SchemaValidator::embedded().context("built-in schema is unusable")?;
    let issues = validator.validate_bytes(&bytes);

    if issues.is_empty() {
        println!("✓ {label} is valid");
        return Ok(());
    }

    println!("✗ {label} has {} issue(s):", issues.len());
    for issue in &issues {
        println!("  {issue}");
    }
    Err(anyhow!("validation failed"))
}

pub fn use_profile(ctx: &AppContext, name: &str) -> Result<()> {
    let profile = ctx.store.load(name)?;
    let activation = activate_profile(&profile, &ctx.target)?;

    println!("Activated '{name}' -> {}", activation.target.display());
    if let Some(backup) = activation.backup {
        println!("Previous config saved to {}", backup.display());
    }
    Ok(())
}

pub fn current(ctx: &AppContext) -> Result<()> {
    match detect_active(&ctx.store, &ctx.target)? {
        Some(name) => println!("{name}"),
        None => println!("No stored profile matches {}", ctx.target.display()),
    }
    Ok(())
}
