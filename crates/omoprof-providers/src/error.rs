//! Network error types

use thiserror::Error;

/// Errors from remote fetches
///
/// The variants separate a slow server, an unreachable one, and one that
/// answered with an error so the user can decide whether to retry.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// The request did not finish within the timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The host could not be reached
    #[error("Connection failed: {0}")]
    Connect(String),

    /// The server answered with a non-success status
    #[error("Server returned HTTP {0}")]
    Status(u16),

    /// Any other transport failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// The body was not the expected JSON
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl NetworkError {
    /// Whether trying again later could succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Connect(_) | Self::Transport(_) => true,
            Self::Status(code) => *code == 429 || *code >= 500,
            Self::Decode(_) => false,
        }
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
