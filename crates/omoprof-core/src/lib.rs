//! omoprof Core - Config model, schema validation, diff engine and profile storage
//!
//! This crate provides the typed oh-my-opencode configuration document,
//! schema validation against the embedded schema, the line diff used to
//! compare profiles, and the directory-backed profile store.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod config;
pub mod diff;
pub mod profile;
pub mod recovery;
pub mod schema;
pub mod settings;
pub mod util;

pub use config::{Config, ParseError};
pub use diff::{compute_diff, compute_unified_diff, DiffResult};
pub use profile::{Profile, ProfileStore};
pub use schema::{SchemaValidator, ValidationIssue};
pub use settings::Settings;
