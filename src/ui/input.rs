//! Key bindings

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the widget to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Insert(char),
    Newline,
    Backspace,
    /// Enter: send the input, or confirm the attach prompt
    Submit,
    QuickReply(usize),
    OpenAttachPrompt,
    ToggleFullscreen,
    /// Esc: collapse the widget, or cancel the attach prompt
    Collapse,
    Expand,
    Quit,
}

/// Map a terminal key event. `collapsed` selects the icon-only bindings.
pub fn map_key(key: KeyEvent, collapsed: bool) -> Option<UiAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(UiAction::Quit);
    }

    if collapsed {
        return match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => Some(UiAction::Expand),
            KeyCode::Char('q') => Some(UiAction::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Enter
            if key
                .modifiers
                .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
        {
            Some(UiAction::Newline)
        }
        KeyCode::Enter => Some(UiAction::Submit),
        KeyCode::Esc => Some(UiAction::Collapse),
        KeyCode::F(11) => Some(UiAction::ToggleFullscreen),
        KeyCode::F(n @ 1..=3) => Some(UiAction::QuickReply(usize::from(n - 1))),
        KeyCode::Char('f') if ctrl => Some(UiAction::ToggleFullscreen),
        KeyCode::Char('o') if ctrl => Some(UiAction::OpenAttachPrompt),
        KeyCode::Backspace => Some(UiAction::Backspace),
        KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
            Some(UiAction::Insert(c))
        }
        _ => None,
    }
}
