//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across arbitrary intent sequences.

use super::state::*;
use super::transition::*;
use super::*;
use chrono::Utc;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> TransitionContext {
    TransitionContext::now()
}

/// Steps a user (or the answer service) can take
#[derive(Debug, Clone)]
enum Step {
    Type(String),
    Submit,
    QuickReply(usize),
    Attach(String, String),
    Succeed(String),
    Fail,
    Collapse,
    Expand,
    Fullscreen,
}

/// Apply a step, feeding answer events only when a request is in flight
fn apply_step(state: &WidgetState, step: &Step) -> Option<TransitionResult> {
    let event = match step {
        Step::Type(text) => Event::UpdatePendingText { text: text.clone() },
        Step::Submit => Event::Submit {
            explicit_text: None,
        },
        Step::QuickReply(i) => Event::Submit {
            explicit_text: Some(QUICK_REPLIES[*i].to_string()),
        },
        Step::Attach(url, mime) => Event::SelectAttachment {
            attachment: PendingAttachment {
                url: url.clone(),
                name: "file".to_string(),
                mime_type: mime.clone(),
            },
        },
        Step::Succeed(answer) => Event::AnswerReceived {
            request_id: state.in_flight?,
            answer: answer.clone(),
        },
        Step::Fail => Event::AnswerFailed {
            request_id: state.in_flight?,
        },
        Step::Collapse => Event::Collapse,
        Step::Expand => Event::Expand,
        Step::Fullscreen => Event::ToggleFullscreen,
    };
    transition(state, &test_context(), event).ok()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z ]{1,20}",
        Just(String::new()),
        Just("   ".to_string()),
        Just("\n\t".to_string()),
    ]
}

fn arb_mime() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("image/png".to_string()),
        Just("image/jpeg".to_string()),
        Just("application/pdf".to_string()),
        Just("application/msword".to_string()),
    ]
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        arb_text().prop_map(Step::Type),
        Just(Step::Submit),
        (0usize..3).prop_map(Step::QuickReply),
        ("blob:[a-z]{4}", arb_mime()).prop_map(|(url, mime)| Step::Attach(url, mime)),
        "[a-zA-Z ]{0,20}".prop_map(Step::Succeed),
        Just(Step::Fail),
        Just(Step::Collapse),
        Just(Step::Expand),
        Just(Step::Fullscreen),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Messages are only ever appended; existing entries never change
    #[test]
    fn prop_messages_append_only(steps in proptest::collection::vec(arb_step(), 0..40)) {
        let mut state = WidgetState::new(Utc::now());
        for step in &steps {
            if let Some(result) = apply_step(&state, step) {
                let before = &state.messages;
                let after = &result.new_state.messages;
                prop_assert!(after.len() >= before.len());
                prop_assert_eq!(&after[..before.len()], &before[..]);
                state = result.new_state;
            }
        }
    }

    /// Each round trip adds exactly one user and one bot message
    #[test]
    fn prop_round_trip_adds_two(
        texts in proptest::collection::vec("[a-zA-Z]{1,10}", 1..8),
        outcomes in proptest::collection::vec(any::<bool>(), 8),
    ) {
        let ctx = test_context();
        let mut state = WidgetState::new(Utc::now());
        for (i, text) in texts.iter().enumerate() {
            let len = state.messages.len();
            state = transition(&state, &ctx, Event::Submit { explicit_text: Some(text.clone()) })
                .unwrap()
                .new_state;
            let request_id = state.in_flight.unwrap();
            let resolution = if outcomes[i] {
                Event::AnswerReceived { request_id, answer: "ok".to_string() }
            } else {
                Event::AnswerFailed { request_id }
            };
            state = transition(&state, &ctx, resolution).unwrap().new_state;
            prop_assert_eq!(state.messages.len(), len + 2);
            prop_assert_eq!(state.messages[len].role, Role::User);
            prop_assert_eq!(state.messages[len + 1].role, Role::Bot);
        }
    }

    /// Blank input with nothing attached changes nothing at all
    #[test]
    fn prop_blank_submit_is_noop(
        prefix in proptest::collection::vec(arb_step(), 0..20),
        blank in "[ \t\n]{0,6}",
    ) {
        let mut state = WidgetState::new(Utc::now());
        for step in &prefix {
            if let Some(result) = apply_step(&state, step) {
                state = result.new_state;
            }
        }
        prop_assume!(state.pending_attachment.is_none() && !state.awaiting_response);

        let result = transition(&state, &test_context(), Event::Submit { explicit_text: Some(blank) })
            .unwrap();
        prop_assert_eq!(&result.new_state, &state);
        prop_assert!(result.effects.is_empty());
    }

    /// Once a message is sent, quick replies never come back
    #[test]
    fn prop_quick_replies_hidden_after_first_send(steps in proptest::collection::vec(arb_step(), 0..40)) {
        let mut state = WidgetState::new(Utc::now());
        let mut sent = false;
        for step in &steps {
            if let Some(result) = apply_step(&state, step) {
                if result.new_state.messages.iter().any(|m| m.role == Role::User) {
                    sent = true;
                }
                state = result.new_state;
            }
            if sent {
                prop_assert!(!state.show_quick_replies);
                prop_assert!(!state.quick_replies_visible());
            } else {
                prop_assert!(state.quick_replies_visible());
            }
        }
    }

    /// Awaiting-response is true exactly while a request id is outstanding
    #[test]
    fn prop_awaiting_matches_in_flight(steps in proptest::collection::vec(arb_step(), 0..40)) {
        let mut state = WidgetState::new(Utc::now());
        for step in &steps {
            if let Some(result) = apply_step(&state, step) {
                let dispatched = result
                    .effects
                    .iter()
                    .any(|e| matches!(e, Effect::RequestAnswer { .. }));
                if dispatched {
                    prop_assert!(!state.awaiting_response);
                    prop_assert!(result.new_state.awaiting_response);
                }
                state = result.new_state;
            }
            prop_assert_eq!(state.awaiting_response, state.in_flight.is_some());
        }
    }

    /// At most one attachment is pending and it is always the last selected
    #[test]
    fn prop_last_selection_wins(urls in proptest::collection::vec("blob:[a-z]{6}", 1..6)) {
        let ctx = test_context();
        let mut state = WidgetState::new(Utc::now());
        for url in &urls {
            state = transition(&state, &ctx, Event::SelectAttachment {
                attachment: PendingAttachment {
                    url: url.clone(),
                    name: "f.pdf".to_string(),
                    mime_type: "application/pdf".to_string(),
                },
            })
            .unwrap()
            .new_state;
        }
        let result = transition(&state, &ctx, Event::Submit { explicit_text: None }).unwrap();
        let sent = result.new_state.messages.last().unwrap();
        prop_assert_eq!(&sent.attachment.as_ref().unwrap().url, urls.last().unwrap());
    }
}
