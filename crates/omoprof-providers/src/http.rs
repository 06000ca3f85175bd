//! Shared HTTP plumbing

use crate::error::NetworkError;
use serde_json::Value;
use std::time::Duration;

const USER_AGENT: &str = concat!("omoprof/", env!("CARGO_PKG_VERSION"));

/// Build a client with the given request timeout
///
/// # Errors
/// Returns an error if the TLS backend cannot be initialised
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, NetworkError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| NetworkError::Transport(e.to_string()))
}

/// GET `url` and parse the body as JSON
pub(crate) async fn get_json(client: &reqwest::Client, url: &str) -> Result<Value, NetworkError> {
    tracing::debug!(url, "fetching");
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        tracing::debug!(url, status = status.as_u16(), "fetch failed");
        return Err(NetworkError::Status(status.as_u16()));
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
