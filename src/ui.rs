//! Terminal display surface for the chat widget

mod input;
mod render;

pub use input::{map_key, UiAction};
pub use render::{render, View};

use crate::chat_client::AnswerService;
use crate::runtime::ConversationController;
use crate::state_machine::QUICK_REPLIES;
use crossterm::event::{Event as TermEvent, EventStream};
use futures::StreamExt;
use ratatui::DefaultTerminal;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Chat,
    /// Typing the path of a file to attach
    AttachPrompt(String),
}

/// Widget plus the bits of UI state that are not conversation state
pub struct App<S>
where
    S: AnswerService + 'static,
{
    controller: ConversationController<S>,
    title: String,
    mode: Mode,
    notice: Option<String>,
    should_quit: bool,
}

impl<S> App<S>
where
    S: AnswerService + 'static,
{
    pub fn new(controller: ConversationController<S>, title: impl Into<String>) -> Self {
        Self {
            controller,
            title: title.into(),
            mode: Mode::Chat,
            notice: None,
            should_quit: false,
        }
    }

    pub fn controller(&self) -> &ConversationController<S> {
        &self.controller
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn view(&self) -> View<'_> {
        View {
            title: &self.title,
            state: self.controller.state(),
            attach_prompt: match &self.mode {
                Mode::AttachPrompt(path) => Some(path.as_str()),
                Mode::Chat => None,
            },
            notice: self.notice.as_deref(),
        }
    }

    pub fn handle_action(&mut self, action: UiAction) {
        if action == UiAction::Quit {
            self.should_quit = true;
            return;
        }
        match &mut self.mode {
            Mode::AttachPrompt(path) => match action {
                UiAction::Insert(c) => path.push(c),
                UiAction::Backspace => {
                    path.pop();
                }
                UiAction::Submit => {
                    let path = std::mem::take(path);
                    self.mode = Mode::Chat;
                    self.attach(path.trim());
                }
                UiAction::Collapse => self.mode = Mode::Chat,
                _ => {}
            },
            Mode::Chat => self.handle_chat_action(action),
        }
    }

    fn handle_chat_action(&mut self, action: UiAction) {
        match action {
            UiAction::Insert(c) => self.edit(|text| text.push(c)),
            UiAction::Newline => self.edit(|text| text.push('\n')),
            UiAction::Backspace => self.edit(|text| {
                text.pop();
            }),
            UiAction::Submit => {
                if self.controller.can_send() {
                    self.notice = None;
                    self.controller.submit_message(None);
                }
            }
            UiAction::QuickReply(index) => {
                if self.controller.quick_replies_visible() {
                    if let Some(label) = QUICK_REPLIES.get(index) {
                        self.controller.submit_message(Some(label));
                    }
                }
            }
            UiAction::OpenAttachPrompt => {
                self.notice = None;
                self.mode = Mode::AttachPrompt(String::new());
            }
            UiAction::ToggleFullscreen => self.controller.toggle_fullscreen(),
            UiAction::Collapse => self.controller.collapse(),
            UiAction::Expand => self.controller.expand(),
            UiAction::Quit => self.should_quit = true,
        }
    }

    /// The input is read-only while an answer is pending
    fn edit(&mut self, change: impl FnOnce(&mut String)) {
        if self.controller.is_awaiting_response() {
            return;
        }
        let mut text = self.controller.pending_text().to_string();
        change(&mut text);
        self.controller.update_pending_text(text);
    }

    fn attach(&mut self, path: &str) {
        if path.is_empty() {
            return;
        }
        match self.controller.attach_path(path) {
            Ok(()) => self.notice = None,
            Err(e) => {
                tracing::warn!(path, error = %e, "Attachment rejected");
                self.notice = Some(e.to_string());
            }
        }
    }
}

/// Drive the widget until the user quits, then tear it down
pub async fn run<S>(app: &mut App<S>, terminal: &mut DefaultTerminal) -> std::io::Result<()>
where
    S: AnswerService + 'static,
{
    let mut events = EventStream::new();

    while !app.should_quit {
        terminal.draw(|frame| render(frame, &app.view()))?;

        let awaiting = app.controller.is_awaiting_response();
        let next_event = tokio::select! {
            event = events.next() => Some(event),
            _ = app.controller.next_resolution(), if awaiting => None,
        };

        match next_event {
            Some(Some(Ok(TermEvent::Key(key)))) => {
                if let Some(action) = map_key(key, app.controller.is_collapsed()) {
                    app.handle_action(action);
                }
            }
            Some(Some(Ok(_))) | None => {}
            Some(Some(Err(e))) => {
                app.controller.teardown();
                return Err(e);
            }
            Some(None) => break,
        }
    }

    app.controller.teardown();
    Ok(())
}
