//! Error types for the explorer

use thiserror::Error;

/// Every failure the resolver can surface. The core never recovers from or
/// logs these; the HTTP boundary translates them into responses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExplorerError {
    /// The daemon could not be reached, timed out, or dropped the body.
    #[error("Transport error: {0}")]
    Transport(String),
    /// The daemon answered with a non-200 status, or two endpoints disagree.
    #[error("Upstream error: {0}")]
    Upstream(String),
    /// The payload carries no recognizable `ResponseType` discriminator.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    /// The discriminator matched but the payload does not fit the variant's shape.
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Output not found: {0}")]
    OutputNotFound(String),
    #[error("Not found: {0}")]
    NotFound(String),
    /// Caller-supplied hash or height could not be parsed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExplorerError {
    /// True for the kinds a caller can cause (4xx-equivalent).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ExplorerError::OutputNotFound(_)
                | ExplorerError::NotFound(_)
                | ExplorerError::InvalidInput(_)
        )
    }
}

impl From<serde_json::Error> for ExplorerError {
    fn from(err: serde_json::Error) -> Self {
        ExplorerError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for ExplorerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExplorerError::Transport(format!("request timed out: {}", err))
        } else {
            ExplorerError::Transport(err.to_string())
        }
    }
}

impl From<toml::de::Error> for ExplorerError {
    fn from(err: toml::de::Error) -> Self {
        ExplorerError::Config(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ExplorerError>;
