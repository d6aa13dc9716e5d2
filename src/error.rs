//! Error types for the AMS SDK.

use thiserror::Error;

/// SDK error type covering transport, remote, and local failures.
#[derive(Debug, Error)]
pub enum AmsError {
    /// Network-level failure from reqwest (connect, timeout, protocol).
    /// Retried by [`RetryPolicy`](crate::retry::RetryPolicy); surfaced once
    /// the attempt budget is exhausted.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-2xx status. Never retried; carries the
    /// status and response body for remote-side diagnostics.
    #[error("request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// The [`RemoteMap`](crate::proxy::RemoteMap) was not configured with the
    /// capability backing this operation.
    #[error("{operation} is not supported by this mapping")]
    NotSupported { operation: &'static str },

    /// A setter precondition or parameter check rejected a value. The target
    /// field is left unmodified and no network call is issued.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A read produced no entry for the requested key.
    #[error("no entry found for key {0}")]
    NotFound(String),

    /// Login did not yield a usable session.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Document encode/decode failure.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl AmsError {
    /// Whether this error came from the transport layer (the only class of
    /// error the retry policy re-attempts).
    pub fn is_transport(&self) -> bool {
        matches!(self, AmsError::Transport(_))
    }

    /// A response-shape decode failure.
    pub(crate) fn decode(message: impl std::fmt::Display) -> AmsError {
        AmsError::Serde(<serde_json::Error as serde::de::Error>::custom(message))
    }
}

/// Result type alias for SDK operations.
pub type AmsResult<T> = Result<T, AmsError>;
