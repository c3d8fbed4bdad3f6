//! Drawing the widget

use crate::state_machine::{Message, Role, WidgetState, QUICK_REPLIES};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

const PANEL_WIDTH: u16 = 52;
const PANEL_HEIGHT: u16 = 24;

/// Everything a frame needs
pub struct View<'a> {
    pub title: &'a str,
    pub state: &'a WidgetState,
    /// Path typed so far, while the attach prompt is open
    pub attach_prompt: Option<&'a str>,
    /// One-line notice, e.g. a rejected attachment
    pub notice: Option<&'a str>,
}

pub fn render(frame: &mut Frame, view: &View) {
    let area = frame.area();
    if view.state.collapsed {
        render_collapsed(frame, area, view.title);
        return;
    }

    let panel = if view.state.fullscreen {
        area
    } else {
        anchor_bottom_right(area, PANEL_WIDTH, PANEL_HEIGHT)
    };
    frame.render_widget(Clear, panel);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(format!(" {} ", view.title)).bold())
        .title_top(Line::from(" F11 ⤢  Esc ▾ ").right_aligned().dark_gray());
    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    let state = view.state;
    let quick_height = if state.quick_replies_visible() { 2 } else { 0 };
    let typing_height = u16::from(state.awaiting_response);
    let preview_height = u16::from(state.pending_attachment.is_some());

    let [messages_area, quick_area, typing_area, preview_area, input_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(quick_height),
        Constraint::Length(typing_height),
        Constraint::Length(preview_height),
        Constraint::Length(3),
    ])
    .areas(inner);

    render_messages(frame, messages_area, view.title, &state.messages);

    if state.quick_replies_visible() {
        frame.render_widget(
            Paragraph::new(quick_reply_line()).wrap(Wrap { trim: true }),
            quick_area,
        );
    }

    if state.awaiting_response {
        frame.render_widget(
            Paragraph::new(Line::from(format!("{} is typing ● ● ●", view.title)).italic().dark_gray()),
            typing_area,
        );
    }

    if let Some(pending) = &state.pending_attachment {
        let kind = if pending.is_image() { "[image]" } else { "[file]" };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw("Attached: ").dark_gray(),
                Span::raw(format!("{kind} {}", pending.name)).yellow(),
            ])),
            preview_area,
        );
    }

    render_input(frame, input_area, view);
}

fn render_collapsed(frame: &mut Frame, area: Rect, title: &str) {
    let label = format!(" 💬 {title} ");
    let width = u16::try_from(Line::from(label.as_str()).width())
        .unwrap_or(u16::MAX)
        .saturating_add(2);
    let icon = anchor_bottom_right(area, width, 3);
    frame.render_widget(Clear, icon);
    frame.render_widget(
        Paragraph::new(label).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        ),
        icon,
    );
}

fn render_messages(frame: &mut Frame, area: Rect, title: &str, messages: &[Message]) {
    let mut lines: Vec<Line> = Vec::new();
    for message in messages {
        lines.extend(message_lines(title, message));
        lines.push(Line::default());
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    let scroll = bottom_scroll(paragraph.line_count(area.width), area.height);
    frame.render_widget(paragraph.scroll((scroll, 0)), area);
}

fn message_lines<'a>(title: &'a str, message: &'a Message) -> Vec<Line<'a>> {
    let (speaker, style) = match message.role {
        Role::Bot => (title, Style::default().fg(Color::Cyan)),
        Role::User => ("You", Style::default().fg(Color::Green)),
    };

    let mut lines = vec![Line::from(Span::styled(
        speaker,
        style.add_modifier(Modifier::BOLD),
    ))];
    if let Some(text) = &message.text {
        lines.extend(text.split('\n').map(Line::raw));
    }
    if let Some(attachment) = &message.attachment {
        let kind = if attachment.is_image { "[image]" } else { "[file]" };
        lines.push(Line::from(format!("{kind} {}", attachment.name)).yellow());
    }

    if message.role == Role::User {
        lines.into_iter().map(Line::right_aligned).collect()
    } else {
        lines
    }
}

fn quick_reply_line() -> Line<'static> {
    let mut spans = Vec::new();
    for (i, label) in QUICK_REPLIES.iter().enumerate() {
        spans.push(Span::raw(format!("[F{}] ", i + 1)).dark_gray());
        spans.push(Span::raw(*label).magenta());
        spans.push(Span::raw("  "));
    }
    Line::from(spans)
}

fn render_input(frame: &mut Frame, area: Rect, view: &View) {
    let (title, content) = match view.attach_prompt {
        Some(path) => (" Attach file path (Esc cancels) ", path),
        None => (" Message (Ctrl+O attach) ", view.state.pending_text.as_str()),
    };

    let send_hint = if view.attach_prompt.is_some() || view.state.can_send() {
        Line::from(" Enter ↵ ").right_aligned().green()
    } else {
        Line::from(" Enter ↵ ").right_aligned().dark_gray()
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_top(send_hint);
    if let Some(notice) = view.notice {
        block = block.title_bottom(Line::from(format!(" {notice} ")).red());
    }

    let input_style = if view.state.awaiting_response && view.attach_prompt.is_none() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    // Only the last line fits; scroll it so the cursor end stays in view
    let last_line = Line::from(content.rsplit('\n').next().unwrap_or_default()).style(input_style);
    let offset = tail_offset(last_line.width(), area.width.saturating_sub(2));
    frame.render_widget(
        Paragraph::new(last_line).block(block).scroll((0, offset)),
        area,
    );
}

/// Scroll offset that keeps the newest wrapped row at the bottom
fn bottom_scroll(rows: usize, height: u16) -> u16 {
    u16::try_from(rows.saturating_sub(usize::from(height))).unwrap_or(u16::MAX)
}

/// Horizontal offset that keeps the end of a `width`-column line visible
fn tail_offset(width: usize, visible: u16) -> u16 {
    u16::try_from(width.saturating_sub(usize::from(visible))).unwrap_or(u16::MAX)
}

fn anchor_bottom_right(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + area.width - width,
        y: area.y + area.height - height,
        width,
        height,
    }
}
