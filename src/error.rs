use std::fmt;
use thiserror::Error;

/// Errors that can occur when using the chat-gateway library.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Transport error ({kind}): {message}")]
    Transport {
        kind: TransportErrorKind,
        message: String,
    },

    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// What went wrong at the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The connection could not be established.
    Connect,
    /// The overall request timeout elapsed.
    Timeout,
    /// The response body failed mid-read (includes aborted streams).
    Body,
    /// Anything else reported by the HTTP client.
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Body => "body",
            TransportErrorKind::Other => "other",
        };
        f.write_str(name)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else if err.is_body() || err.is_decode() {
            TransportErrorKind::Body
        } else {
            TransportErrorKind::Other
        };
        Error::Transport {
            kind,
            message: err.to_string(),
        }
    }
}

impl Error {
    pub fn unsupported(message: impl Into<String>) -> Self {
        Error::UnsupportedProvider(message.into())
    }

    pub fn missing_credentials(message: impl Into<String>) -> Self {
        Error::MissingCredentials(message.into())
    }

    pub fn transport(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Error::Transport {
            kind,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedResponse(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// The HTTP status code, if this is a status error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether a caller-side retry could plausibly succeed.
    ///
    /// The gateway never retries on its own; this only classifies the failure.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport { .. } => true,
            Error::HttpStatus { code, .. } => matches!(code, 408 | 429 | 500..=599),
            _ => false,
        }
    }
}
