//! omoprof Providers - Network sources
//!
//! Fetches the models.dev model catalog used for model suggestions and the
//! published oh-my-opencode schema used for drift checks. All requests carry
//! a fixed timeout and report failures as [`NetworkError`].

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod catalog;
pub mod error;
mod http;
pub mod schema;

pub use catalog::{CatalogModel, HttpCatalog, ModelCatalog};
pub use error::NetworkError;
pub use http::build_client;
pub use schema::fetch_upstream_schema;
