//! Errors returned by the remote commerce API client.

use thiserror::Error;

/// Errors that can occur when talking to the remote commerce API.
///
/// Transport failures and failures the server reports are kept apart so
/// they can be logged differently; both reach the user the same way.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, TLS, reset).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a failure status or `success: false`.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The server answered successfully with a body we could not read.
    #[error("Unexpected response from {context}: {source}")]
    Decode {
        context: &'static str,
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Whether the failure happened before the server could answer.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// HTTP status reported by the server, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Network(_) | Self::Decode { .. } => None,
        }
    }
}
