//! Error types

mod fetch;

pub use fetch::*;

/// Errors raised while configuring or building table components.
///
/// Fetch failures never surface through this type at runtime; they are
/// captured by the controller as [`FetchError`] state.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid base URL or endpoint.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid table configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The operation is not supported by the list source.
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    /// Failed to build the HTTP client.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}
