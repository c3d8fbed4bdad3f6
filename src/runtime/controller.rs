//! Conversation controller: owns the widget state and executes effects

use crate::attachment::{AttachmentError, ObjectUrlRegistry, SelectedFile};
use crate::chat_client::AnswerService;
use crate::state_machine::{
    transition, Effect, Event, Message, PendingAttachment, TransitionContext, TransitionError,
    WidgetState,
};
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// The one answer request allowed to be outstanding
struct InFlight {
    request_id: u64,
    cancel: CancellationToken,
    /// Resolves to `None` when cancelled
    task: JoinHandle<Option<Event>>,
}

/// Single writer of a widget session's state.
///
/// Intents apply synchronously. The answer request runs as a spawned task;
/// [`next_resolution`](Self::next_resolution) folds its outcome back in.
/// Dropping the controller tears it down.
pub struct ConversationController<S>
where
    S: AnswerService + 'static,
{
    state: WidgetState,
    service: Arc<S>,
    urls: ObjectUrlRegistry,
    max_attachment_bytes: Option<u64>,
    in_flight: Option<InFlight>,
}

impl<S> ConversationController<S>
where
    S: AnswerService + 'static,
{
    pub fn new(service: S, max_attachment_bytes: Option<u64>) -> Self {
        Self::with_shared(Arc::new(service), max_attachment_bytes)
    }

    pub fn with_shared(service: Arc<S>, max_attachment_bytes: Option<u64>) -> Self {
        Self {
            state: WidgetState::new(chrono::Utc::now()),
            service,
            urls: ObjectUrlRegistry::new(),
            max_attachment_bytes,
            in_flight: None,
        }
    }

    // ------------------------------------------------------------------
    // Intents
    // ------------------------------------------------------------------

    /// Send `explicit_text`, or the pending input when `None`.
    ///
    /// Must be called from within a tokio runtime: the request is spawned.
    pub fn submit_message(&mut self, explicit_text: Option<&str>) {
        self.apply_intent(Event::Submit {
            explicit_text: explicit_text.map(str::to_string),
        });
    }

    /// Make `file` the pending attachment, replacing any previous one
    pub fn select_attachment(&mut self, file: &SelectedFile) {
        if self.state.torn_down {
            tracing::debug!(name = %file.name, "Ignoring attachment after teardown");
            return;
        }
        let url = self.urls.mint(file);
        self.apply_intent(Event::SelectAttachment {
            attachment: PendingAttachment {
                url,
                name: file.name.clone(),
                mime_type: file.mime_type.clone(),
            },
        });
    }

    /// Validate a file on disk and select it
    pub fn attach_path(&mut self, path: impl AsRef<Path>) -> Result<(), AttachmentError> {
        let file = SelectedFile::from_path(path, self.max_attachment_bytes)?;
        self.select_attachment(&file);
        Ok(())
    }

    /// Replace the input buffer verbatim
    pub fn update_pending_text(&mut self, text: impl Into<String>) {
        self.apply_intent(Event::UpdatePendingText { text: text.into() });
    }

    pub fn collapse(&mut self) {
        self.apply_intent(Event::Collapse);
    }

    pub fn expand(&mut self) {
        self.apply_intent(Event::Expand);
    }

    pub fn toggle_fullscreen(&mut self) {
        self.apply_intent(Event::ToggleFullscreen);
    }

    /// Cancel the in-flight request and release every object URL
    pub fn teardown(&mut self) {
        if self.state.torn_down {
            return;
        }
        tracing::info!(messages = self.state.messages.len(), "Tearing down widget");
        self.apply_intent(Event::Teardown);
    }

    // ------------------------------------------------------------------
    // Answer resolution
    // ------------------------------------------------------------------

    /// Wait for the in-flight request and apply its outcome.
    ///
    /// Returns false immediately when nothing is in flight. Cancel-safe: if
    /// the returned future is dropped the request stays in flight.
    pub async fn next_resolution(&mut self) -> bool {
        let Some(in_flight) = self.in_flight.as_mut() else {
            return false;
        };
        let joined = (&mut in_flight.task).await;
        let request_id = in_flight.request_id;
        self.in_flight = None;

        let event = match joined {
            Ok(Some(event)) => event,
            Ok(None) => return false,
            Err(e) => {
                tracing::error!(request_id, error = %e, "Answer task did not complete");
                Event::AnswerFailed { request_id }
            }
        };

        match self.dispatch(event) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(request_id, error = %e, "Dropping answer");
                false
            }
        }
    }

    /// Wait until no request is in flight
    pub async fn settle(&mut self) {
        while self.in_flight.is_some() {
            self.next_resolution().await;
        }
    }

    /// Submit `text` and wait for the reply bubble
    pub async fn send(&mut self, text: &str) {
        self.submit_message(Some(text));
        self.settle().await;
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn messages(&self) -> &[Message] {
        &self.state.messages
    }

    pub fn pending_text(&self) -> &str {
        &self.state.pending_text
    }

    pub fn pending_attachment(&self) -> Option<&PendingAttachment> {
        self.state.pending_attachment.as_ref()
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.state.awaiting_response
    }

    pub fn quick_replies_visible(&self) -> bool {
        self.state.quick_replies_visible()
    }

    pub fn can_send(&self) -> bool {
        self.state.can_send()
    }

    pub fn is_collapsed(&self) -> bool {
        self.state.collapsed
    }

    pub fn is_fullscreen(&self) -> bool {
        self.state.fullscreen
    }

    pub fn is_torn_down(&self) -> bool {
        self.state.torn_down
    }

    pub fn live_object_urls(&self) -> usize {
        self.urls.live_count()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Intents the current state refuses are ignored, not surfaced
    fn apply_intent(&mut self, event: Event) {
        if let Err(e) = self.dispatch(event) {
            tracing::debug!(error = %e, "Ignoring intent");
        }
    }

    fn dispatch(&mut self, event: Event) -> Result<(), TransitionError> {
        let rejected_url = match &event {
            Event::SelectAttachment { attachment } => Some(attachment.url.clone()),
            _ => None,
        };

        let result = match transition(&self.state, &TransitionContext::now(), event) {
            Ok(result) => result,
            Err(e) => {
                if let Some(url) = rejected_url {
                    self.urls.release(&url);
                }
                return Err(e);
            }
        };

        self.state = result.new_state;
        for effect in result.effects {
            self.execute_effect(effect);
        }
        Ok(())
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::RequestAnswer {
                request_id,
                question,
            } => self.spawn_request(request_id, question),
            Effect::ReleaseObjectUrl { url } => {
                self.urls.release(&url);
            }
            Effect::ReleaseAllObjectUrls => {
                self.urls.release_all();
            }
            Effect::CancelRequest { request_id } => match self.in_flight.take() {
                Some(in_flight) if in_flight.request_id == request_id => {
                    tracing::info!(request_id, "Cancelling in-flight answer request");
                    in_flight.cancel.cancel();
                    in_flight.task.abort();
                }
                Some(in_flight) => {
                    tracing::warn!(
                        request_id,
                        in_flight = in_flight.request_id,
                        "Cancel does not match the in-flight request, leaving it running"
                    );
                    self.in_flight = Some(in_flight);
                }
                None => {}
            },
        }
    }

    fn spawn_request(&mut self, request_id: u64, question: String) {
        let service = self.service.clone();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        tracing::debug!(request_id, question_len = question.len(), "Requesting answer");

        let task = tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => None,
                result = service.ask(&question) => Some(match result {
                    Ok(answer) => Event::AnswerReceived { request_id, answer },
                    Err(e) => {
                        tracing::warn!(request_id, kind = ?e.kind, error = %e, "Answer request failed, showing fallback");
                        Event::AnswerFailed { request_id }
                    }
                }),
            }
        });

        self.in_flight = Some(InFlight {
            request_id,
            cancel,
            task,
        });
    }
}

impl<S> Drop for ConversationController<S>
where
    S: AnswerService + 'static,
{
    fn drop(&mut self) {
        self.teardown();
    }
}
