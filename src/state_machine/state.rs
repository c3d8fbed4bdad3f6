//! Conversation state types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seeded first bubble of every session
pub const GREETING: &str = "Hello! How can I help you today?";

/// Bot reply shown whenever the answer request fails
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong. Please try again.";

/// Suggested first messages, offered only before the first turn
pub const QUICK_REPLIES: [&str; 3] = [
    "About Everything Ug",
    "Create an Iternary",
    "Tailor Your Holiday",
];

// ============================================================================
// Messages
// ============================================================================

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Bot,
}

/// Display data for a file sent along with a user message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentDescriptor {
    /// Session-scoped object URL, valid until released
    pub url: String,
    pub name: String,
    pub mime_type: String,
    pub is_image: bool,
}

impl AttachmentDescriptor {
    pub fn new(url: impl Into<String>, name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        let mime_type = mime_type.into();
        Self {
            url: url.into(),
            name: name.into(),
            is_image: is_image_mime(&mime_type),
            mime_type,
        }
    }
}

/// True iff the MIME type names an image
pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

/// One bubble in the conversation. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<AttachmentDescriptor>,
}

impl Message {
    pub fn bot(id: impl Into<String>, text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            role: Role::Bot,
            text: Some(text.into()),
            created_at,
            attachment: None,
        }
    }

    pub fn user(
        id: impl Into<String>,
        text: Option<String>,
        attachment: Option<AttachmentDescriptor>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            role: Role::User,
            text,
            created_at,
            attachment,
        }
    }
}

// ============================================================================
// Pending attachment
// ============================================================================

/// A selected file waiting for the next send.
///
/// The object URL is minted at selection time so the preview and the sent
/// message share one handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAttachment {
    pub url: String,
    pub name: String,
    pub mime_type: String,
}

impl PendingAttachment {
    pub fn is_image(&self) -> bool {
        is_image_mime(&self.mime_type)
    }

    pub fn to_descriptor(&self) -> AttachmentDescriptor {
        AttachmentDescriptor::new(&self.url, &self.name, &self.mime_type)
    }
}

// ============================================================================
// Widget State
// ============================================================================

/// Complete state of one widget session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetState {
    /// Append-only, display order
    pub messages: Vec<Message>,
    /// Text input buffer, stored verbatim
    pub pending_text: String,
    pub pending_attachment: Option<PendingAttachment>,
    pub awaiting_response: bool,
    /// Cleared by the first send and never set again
    pub show_quick_replies: bool,
    pub collapsed: bool,
    pub fullscreen: bool,
    /// Set once the widget is torn down; every later event is ignored
    pub torn_down: bool,
    /// Request id of the answer currently awaited
    pub in_flight: Option<u64>,
    next_message_id: u64,
    next_request_id: u64,
}

impl WidgetState {
    /// Fresh session seeded with the bot greeting
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            messages: vec![Message::bot("1", GREETING, now)],
            pending_text: String::new(),
            pending_attachment: None,
            awaiting_response: false,
            show_quick_replies: true,
            collapsed: false,
            fullscreen: false,
            torn_down: false,
            in_flight: None,
            next_message_id: 2,
            next_request_id: 1,
        }
    }

    /// Allocate the next message id
    pub(crate) fn take_message_id(&mut self) -> String {
        let id = self.next_message_id;
        self.next_message_id += 1;
        id.to_string()
    }

    /// Allocate the next request id
    pub(crate) fn take_request_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Quick replies are offered before the first turn, and not while waiting
    pub fn quick_replies_visible(&self) -> bool {
        self.show_quick_replies && !self.awaiting_response
    }

    /// Whether the send affordance is enabled for the current input
    pub fn can_send(&self) -> bool {
        !self.awaiting_response
            && !self.torn_down
            && (!self.pending_text.trim().is_empty() || self.pending_attachment.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_seeded_with_greeting() {
        let state = WidgetState::new(Utc::now());
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].id, "1");
        assert_eq!(state.messages[0].role, Role::Bot);
        assert_eq!(state.messages[0].text.as_deref(), Some(GREETING));
        assert!(state.show_quick_replies);
        assert!(!state.awaiting_response);
        assert!(state.quick_replies_visible());
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut state = WidgetState::new(Utc::now());
        assert_eq!(state.take_message_id(), "2");
        assert_eq!(state.take_message_id(), "3");
        assert_eq!(state.take_request_id(), 1);
        assert_eq!(state.take_request_id(), 2);
    }

    #[test]
    fn test_is_image_mime() {
        assert!(is_image_mime("image/png"));
        assert!(is_image_mime("image/svg+xml"));
        assert!(!is_image_mime("application/pdf"));
        assert!(!is_image_mime("text/image"));
    }

    #[test]
    fn test_can_send() {
        let mut state = WidgetState::new(Utc::now());
        assert!(!state.can_send());
        state.pending_text = "   ".to_string();
        assert!(!state.can_send());
        state.pending_attachment = Some(PendingAttachment {
            url: "blob:x".to_string(),
            name: "a.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
        });
        assert!(state.can_send());
        state.awaiting_response = true;
        assert!(!state.can_send());
    }

    #[test]
    fn test_message_serialization_omits_empty_fields() {
        let msg = Message::user("2", None, None, Utc::now());
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert!(json.get("text").is_none());
        assert!(json.get("attachment").is_none());
    }
}
