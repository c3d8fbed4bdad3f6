//! Pure state transition function
//!
//! Every intent of the widget and every answer resolution passes through
//! [`transition`]. It performs no I/O: the clock comes in through
//! [`TransitionContext`] and all outbound work leaves as [`Effect`]s.

use super::state::{Message, WidgetState, FALLBACK_REPLY};
use super::{Effect, Event};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Inputs a transition needs from the outside world
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext {
    pub now: DateTime<Utc>,
}

impl TransitionContext {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn now() -> Self {
        Self::at(Utc::now())
    }
}

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: WidgetState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: WidgetState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Events the current state refuses
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Still waiting for the previous answer")]
    AwaitingResponse,
    #[error("Answer for request {0} is not the one being awaited")]
    StaleAnswer(u64),
    #[error("Widget has been torn down")]
    TornDown,
}

/// Pure transition function
pub fn transition(
    state: &WidgetState,
    context: &TransitionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    if state.torn_down {
        return Err(TransitionError::TornDown);
    }

    match event {
        Event::Submit { explicit_text } => submit(state, context, explicit_text),

        Event::SelectAttachment { attachment } => {
            let mut next = state.clone();
            let previous = next.pending_attachment.replace(attachment);
            let mut result = TransitionResult::new(next);
            if let Some(old) = previous {
                let still_used = result
                    .new_state
                    .pending_attachment
                    .as_ref()
                    .is_some_and(|a| a.url == old.url);
                if !still_used {
                    result = result.with_effect(Effect::release_url(old.url));
                }
            }
            Ok(result)
        }

        Event::UpdatePendingText { text } => {
            let mut next = state.clone();
            next.pending_text = text;
            Ok(TransitionResult::new(next))
        }

        Event::Collapse => {
            let mut next = state.clone();
            next.collapsed = true;
            Ok(TransitionResult::new(next))
        }

        Event::Expand => {
            let mut next = state.clone();
            next.collapsed = false;
            Ok(TransitionResult::new(next))
        }

        Event::ToggleFullscreen => {
            let mut next = state.clone();
            next.fullscreen = !next.fullscreen;
            Ok(TransitionResult::new(next))
        }

        Event::AnswerReceived { request_id, answer } => {
            resolve(state, context, request_id, answer)
        }

        Event::AnswerFailed { request_id } => {
            resolve(state, context, request_id, FALLBACK_REPLY.to_string())
        }

        Event::Teardown => {
            let mut next = state.clone();
            next.torn_down = true;
            next.awaiting_response = false;
            next.pending_attachment = None;
            let in_flight = next.in_flight.take();

            let mut result = TransitionResult::new(next);
            if let Some(request_id) = in_flight {
                result = result.with_effect(Effect::CancelRequest { request_id });
            }
            Ok(result.with_effect(Effect::ReleaseAllObjectUrls))
        }
    }
}

fn submit(
    state: &WidgetState,
    context: &TransitionContext,
    explicit_text: Option<String>,
) -> Result<TransitionResult, TransitionError> {
    if state.awaiting_response {
        return Err(TransitionError::AwaitingResponse);
    }

    let outgoing = explicit_text.unwrap_or_else(|| state.pending_text.clone());
    let has_text = !outgoing.trim().is_empty();

    if !has_text && state.pending_attachment.is_none() {
        return Ok(TransitionResult::new(state.clone()));
    }

    let mut next = state.clone();
    let attachment = next
        .pending_attachment
        .take()
        .map(|pending| pending.to_descriptor());
    let id = next.take_message_id();
    let text = has_text.then(|| outgoing.clone());
    next.messages
        .push(Message::user(id, text, attachment, context.now));

    next.pending_text.clear();
    next.show_quick_replies = false;
    next.awaiting_response = true;
    let request_id = next.take_request_id();
    next.in_flight = Some(request_id);

    Ok(TransitionResult::new(next).with_effect(Effect::request_answer(request_id, outgoing)))
}

fn resolve(
    state: &WidgetState,
    context: &TransitionContext,
    request_id: u64,
    reply: String,
) -> Result<TransitionResult, TransitionError> {
    if state.in_flight != Some(request_id) {
        return Err(TransitionError::StaleAnswer(request_id));
    }

    let mut next = state.clone();
    let id = next.take_message_id();
    next.messages.push(Message::bot(id, reply, context.now));
    next.awaiting_response = false;
    next.in_flight = None;
    Ok(TransitionResult::new(next))
}
