//! Subcommand implementations

pub mod diff;
pub mod models;
pub mod profile;
pub mod schema;
