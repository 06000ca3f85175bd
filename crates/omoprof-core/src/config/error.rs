//! Error types for config parsing

use thiserror::Error;

/// Malformed JSON while deserializing a [`Config`](super::Config)
#[derive(Debug, Error)]
#[error("Invalid config JSON: {source}")]
pub struct ParseError {
    #[from]
    source: serde_json::Error,
}

impl ParseError {
    /// Line of the syntax error (1-based, 0 when unknown)
    #[must_use]
    pub fn line(&self) -> usize {
        self.source.line()
    }

    /// Column of the syntax error (1-based, 0 when unknown)
    #[must_use]
    pub fn column(&self) -> usize {
        self.source.column()
    }

    /// Whether the input ended before the document was complete
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.source.is_eof()
    }
}
