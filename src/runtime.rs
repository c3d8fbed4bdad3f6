//! Runtime for a widget session
//!
//! Executes the effects the state machine produces: spawning the answer
//! request, cancelling it, and releasing object URLs.

mod controller;

#[cfg(test)]
pub mod testing;

pub use controller::ConversationController;

use crate::chat_client::{HttpAnswerService, LoggingService};

/// Controller wired to the real HTTP service
pub type ProductionController = ConversationController<LoggingService<HttpAnswerService>>;
