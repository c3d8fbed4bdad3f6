//! Effects produced by state transitions

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the chat answering service; `question` is the untrimmed text
    RequestAnswer { request_id: u64, question: String },

    /// Drop an object URL nothing references any more
    ReleaseObjectUrl { url: String },

    /// Release every object URL minted this session
    ReleaseAllObjectUrls,

    /// Abandon the in-flight answer request
    CancelRequest { request_id: u64 },
}

impl Effect {
    pub fn request_answer(request_id: u64, question: impl Into<String>) -> Self {
        Effect::RequestAnswer {
            request_id,
            question: question.into(),
        }
    }

    pub fn release_url(url: impl Into<String>) -> Self {
        Effect::ReleaseObjectUrl { url: url.into() }
    }
}
