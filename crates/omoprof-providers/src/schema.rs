//! Upstream schema download

use crate::error::NetworkError;
use crate::http::get_json;
use serde_json::Value;

/// Download the published oh-my-opencode schema
///
/// # Errors
/// Returns an error on timeout, transport failure, non-success status, or a
/// body that is not JSON
pub async fn fetch_upstream_schema(
    client: &reqwest::Client,
    url: &str,
) -> Result<Value, NetworkError> {
    let schema = get_json(client, url).await?;
    if !schema.is_object() {
        return Err(NetworkError::Decode("schema is not a JSON object".to_string()));
    }
    Ok(schema)
}
