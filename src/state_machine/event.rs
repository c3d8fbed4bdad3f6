//! Events that can occur in a widget session

use super::state::PendingAttachment;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User intents
    /// Send `explicit_text` if given, otherwise the pending input buffer
    Submit {
        explicit_text: Option<String>,
    },
    SelectAttachment {
        attachment: PendingAttachment,
    },
    UpdatePendingText {
        text: String,
    },
    Collapse,
    Expand,
    ToggleFullscreen,

    // Answer service events
    AnswerReceived {
        request_id: u64,
        answer: String,
    },
    AnswerFailed {
        request_id: u64,
    },

    /// The widget is going away
    Teardown,
}
