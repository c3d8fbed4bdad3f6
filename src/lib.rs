//! Chat widget: a single conversation with a remote answering service
//!
//! The conversation core is a pure state machine driven by a controller that
//! owns the one in-flight request. The terminal surface renders it.

pub mod attachment;
pub mod chat_client;
pub mod config;
pub mod runtime;
pub mod state_machine;
pub mod ui;
