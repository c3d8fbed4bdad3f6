//! Mock implementations for testing
//!
//! These mocks enable controller testing without real I/O.

use crate::chat_client::{AnswerError, AnswerService};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;

// ============================================================================
// Mock Answer Service
// ============================================================================

/// Answer service that returns queued results in order
pub struct MockAnswerService {
    responses: Mutex<VecDeque<Result<String, AnswerError>>>,
    /// Record of every question asked
    pub questions: Mutex<Vec<String>>,
}

impl MockAnswerService {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            questions: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful answer
    pub fn queue_answer(&self, answer: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(answer.into()));
    }

    /// Queue a failure
    pub fn queue_error(&self, error: AnswerError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

impl Default for MockAnswerService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnswerService for MockAnswerService {
    async fn ask(&self, question: &str) -> Result<String, AnswerError> {
        self.questions.lock().unwrap().push(question.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AnswerError::network("No mock response queued")))
    }
}

// ============================================================================
// Gated Answer Service (for observing the in-flight window)
// ============================================================================

/// Answer service that holds every request until [`release`](Self::release)
pub struct GatedAnswerService {
    answer: String,
    arrived: Notify,
    gate: Notify,
    requests: AtomicUsize,
}

impl GatedAnswerService {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            arrived: Notify::new(),
            gate: Notify::new(),
            requests: AtomicUsize::new(0),
        }
    }

    /// Wait until a request has reached the service
    pub async fn wait_for_request(&self) {
        self.arrived.notified().await;
    }

    /// Let the held request complete
    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnswerService for GatedAnswerService {
    async fn ask(&self, _question: &str) -> Result<String, AnswerError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.arrived.notify_one();
        self.gate.notified().await;
        Ok(self.answer.clone())
    }
}
