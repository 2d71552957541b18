//! Client error types
//!
//! Every failure a backend call can produce, grouped into the categories the
//! user is told about.

use thiserror::Error;

use crate::forms::ValidationError;
use crate::model::DecodeError;

/// Errors that can occur when talking to the election backend
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Election backend unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Duplicate registration (HTTP 409)
    #[error("{0}")]
    Conflict(String),

    /// Login answered with anything but `true`
    #[error("Invalid credentials provided.")]
    AuthRejected,

    /// Caught client-side, before any request was sent
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Broad failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Validation,
    Conflict,
    Auth,
    Decode,
}

impl ClientError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ClientError::Unavailable
            | ClientError::Timeout
            | ClientError::Request(_)
            | ClientError::Status { .. } => FailureKind::Network,
            ClientError::Conflict(_) => FailureKind::Conflict,
            ClientError::AuthRejected => FailureKind::Auth,
            ClientError::Validation(_) => FailureKind::Validation,
            ClientError::Decode(_) => FailureKind::Decode,
        }
    }

    pub(crate) fn from_send(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_connect() {
            ClientError::Unavailable
        } else {
            ClientError::Request(e)
        }
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
