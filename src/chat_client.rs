//! Chat answering service abstraction
//!
//! The widget's only collaborator: one request carrying the user's question,
//! one response carrying the answer.

mod error;
mod http;

pub use error::{AnswerError, AnswerErrorKind, ClientBuildError};
pub use http::HttpAnswerService;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for answer providers
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Ask one question, returning the answer text verbatim
    async fn ask(&self, question: &str) -> Result<String, AnswerError>;
}

#[async_trait]
impl<T: AnswerService + ?Sized> AnswerService for Arc<T> {
    async fn ask(&self, question: &str) -> Result<String, AnswerError> {
        (**self).ask(question).await
    }
}

/// Logging wrapper for answer services
pub struct LoggingService<S> {
    inner: S,
}

impl<S: AnswerService> LoggingService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: AnswerService> AnswerService for LoggingService<S> {
    async fn ask(&self, question: &str) -> Result<String, AnswerError> {
        let start = std::time::Instant::now();
        let result = self.inner.ask(question).await;
        let duration = start.elapsed();

        match &result {
            Ok(answer) => {
                tracing::info!(
                    duration_ms = %duration.as_millis(),
                    question_len = question.len(),
                    answer_len = answer.len(),
                    "Answer request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    duration_ms = %duration.as_millis(),
                    kind = ?e.kind,
                    error = %e.message,
                    "Answer request failed"
                );
            }
        }

        result
    }
}
