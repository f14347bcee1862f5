//! Fetch error types

/// Category of a failed list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    /// The transport was unreachable or the request did not complete.
    NetworkError,
    /// The endpoint answered with a non-2xx status.
    ServerError,
    /// The response body did not have the expected shape.
    DecodeError,
}

impl std::fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NetworkError => "network error",
            Self::ServerError => "server error",
            Self::DecodeError => "decode error",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while fetching a page of records.
///
/// Cloneable so the controller can retain the last failure until a later
/// fetch succeeds.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// Transport failure.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response.
    #[error("HTTP {status}: {body}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Malformed response.
    #[error("Response decode error: {message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },
}

impl FetchError {
    /// Creates a network error.
    pub fn network(detail: impl Into<String>) -> Self {
        Self::Network(detail.into())
    }

    /// Creates a server error from a status code and response body.
    pub fn server(status: u16, body: impl Into<String>) -> Self {
        Self::Server {
            status,
            body: body.into(),
        }
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            body: None,
        }
    }

    /// Creates a decode error with the raw response body.
    pub fn decode_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns the error category.
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Network(_) => FetchErrorKind::NetworkError,
            Self::Server { .. } => FetchErrorKind::ServerError,
            Self::Decode { .. } => FetchErrorKind::DecodeError,
        }
    }

    /// Returns the human-readable detail without the category prefix.
    pub fn detail(&self) -> &str {
        match self {
            Self::Network(detail) => detail,
            Self::Server { body, .. } => body,
            Self::Decode { message, .. } => message,
        }
    }

    /// Returns the HTTP status code if this is a server error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Attaches the raw body to a decode error that has none yet.
    pub(crate) fn with_body(self, raw: &str) -> Self {
        match self {
            Self::Decode {
                message,
                body: None,
            } => Self::Decode {
                message,
                body: Some(raw.to_string()),
            },
            other => other,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::decode(err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}
