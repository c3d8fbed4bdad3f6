//! Answer service error types

use thiserror::Error;

/// Failure of one answer request, classified for logging.
///
/// Every kind ends up as the same fallback bubble in the conversation.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AnswerError {
    pub kind: AnswerErrorKind,
    pub message: String,
}

impl AnswerError {
    pub fn new(kind: AnswerErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(AnswerErrorKind::Network, message)
    }

    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::new(AnswerErrorKind::Status(code), message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(AnswerErrorKind::Decode, message)
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerErrorKind {
    /// Connection, timeout, or body read failure
    Network,
    /// Non-2xx response
    Status(u16),
    /// Body was not `{"answer": "..."}`
    Decode,
}

/// Failed to construct the HTTP client
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("Invalid base URL {url:?}: must start with http:// or https://")]
    InvalidBaseUrl { url: String },
    #[error("Failed to create HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
