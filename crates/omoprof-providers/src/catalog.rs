//! Model catalog
//!
//! models.dev publishes every provider's models as one JSON document shaped
//! `{ "<provider>": { "models": { "<model id>": { "name": ... } } } }`.
//! The catalog flattens it into `provider/id` entries for model suggestions.

use crate::error::NetworkError;
use crate::http::get_json;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One model known to the catalog
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CatalogModel {
    /// Provider id (e.g. `anthropic`)
    pub provider: String,
    /// Model id within the provider
    pub id: String,
    /// Display name, falling back to the id
    pub name: String,
}

impl CatalogModel {
    /// The `provider/id` form used in config model fields
    #[must_use]
    pub fn qualified_id(&self) -> String {
        format!("{}/{}", self.provider, self.id)
    }
}

/// Source of available models
#[async_trait]
pub trait ModelCatalog: Send + Sync {
    /// Fetch every model, sorted by provider then id
    async fn models(&self) -> Result<Vec<CatalogModel>, NetworkError>;
}

/// Catalog backed by a models.dev-compatible endpoint
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalog {
    #[must_use]
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ModelCatalog for HttpCatalog {
    async fn models(&self) -> Result<Vec<CatalogModel>, NetworkError> {
        let payload = get_json(&self.client, &self.url).await?;
        let models = parse_catalog(payload)?;
        tracing::debug!(count = models.len(), "model catalog loaded");
        Ok(models)
    }
}

#[derive(Debug, Deserialize)]
struct ProviderEntry {
    #[serde(default)]
    models: BTreeMap<String, ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    #[serde(default)]
    name: Option<String>,
}

/// Flatten a models.dev document into catalog entries
///
/// Providers whose entry does not have the expected shape are skipped.
///
/// # Errors
/// Returns [`NetworkError::Decode`] if the document is not an object
pub fn parse_catalog(payload: Value) -> Result<Vec<CatalogModel>, NetworkError> {
    let Value::Object(providers) = payload else {
        return Err(NetworkError::Decode(
            "catalog is not a JSON object".to_string(),
        ));
    };

    let mut models = Vec::new();
    for (provider, entry) in providers {
        let entry: ProviderEntry = match serde_json::from_value(entry) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(provider = %provider, error = %err, "skipping catalog provider");
                continue;
            }
        };
        for (id, model) in entry.models {
            models.push(CatalogModel {
                provider: provider.clone(),
                name: model.name.filter(|n| !n.is_empty()).unwrap_or_else(|| id.clone()),
                id,
            });
        }
    }

    models.sort();
    Ok(models)
}

/// Models whose qualified id contains `query`, case-insensitively
#[must_use]
pub fn matching<'a>(models: &'a [CatalogModel], query: &str) -> Vec<&'a CatalogModel> {
    let query = query.to_lowercase();
    models
        .iter()
        .filter(|m| m.qualified_id().to_lowercase().contains(&query))
        .collect()
}
