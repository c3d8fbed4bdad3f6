//! Core widget state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{
    AttachmentDescriptor, Message, PendingAttachment, Role, WidgetState, FALLBACK_REPLY,
    GREETING, QUICK_REPLIES,
};
pub use transition::{transition, TransitionContext, TransitionError, TransitionResult};
