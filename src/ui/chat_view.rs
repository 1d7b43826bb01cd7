//! Transcript and input box.
//!
//! Lines are wrapped here rather than by ratatui's `Paragraph` so the
//! renderer knows the wrapped line count. That count drives the scroll
//! clamp and the "follow new output" behaviour.

use std::time::{SystemTime, UNIX_EPOCH};

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::app::App;
use crate::core::message::Message;
use crate::ui::theme::Theme;

pub const USER_PREFIX: &str = "You: ";
pub const PENDING_LABEL: &str = "Thinking...";
pub const LISTENING_LABEL: &str = "● Listening";

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPINNER_FRAME_MS: u128 = 80;

/// Word-wraps `text` to `width` display columns. Explicit `\n` breaks are
/// kept (including empty lines) and words wider than a line are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw_line in text.split('\n') {
        wrap_line(raw_line, width, &mut lines);
    }
    lines
}

fn wrap_line(line: &str, width: usize, out: &mut Vec<String>) {
    if width == 0 {
        out.push(line.to_string());
        return;
    }

    let mut current = String::new();
    let mut current_width = 0usize;

    for word in line.split_whitespace() {
        let word_width = UnicodeWidthStr::width(word);

        if current_width > 0 && current_width + 1 + word_width > width {
            out.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if current_width > 0 {
            current.push(' ');
            current_width += 1;
        }

        if word_width <= width {
            current.push_str(word);
            current_width += word_width;
            continue;
        }

        for ch in word.chars() {
            let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
            if current_width > 0 && current_width + ch_width > width {
                out.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += ch_width;
        }
    }

    out.push(current);
}

fn spinner_frame() -> &'static str {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    SPINNER_FRAMES[(millis / SPINNER_FRAME_MS) as usize % SPINNER_FRAMES.len()]
}

/// Display lines for the transcript, already wrapped to `width`.
pub fn build_chat_lines(
    history: &[Message],
    pending: bool,
    theme: &Theme,
    width: u16,
) -> Vec<Line<'static>> {
    let width = width as usize;
    let mut lines = Vec::new();

    for message in history {
        if message.is_user() {
            let wrapped = wrap_text(&format!("{USER_PREFIX}{}", message.text), width);
            for (idx, text) in wrapped.into_iter().enumerate() {
                let prefix = USER_PREFIX.trim_end();
                match text.strip_prefix(prefix).filter(|_| idx == 0) {
                    Some(rest) => lines.push(Line::from(vec![
                        Span::styled(prefix.to_string(), theme.user_prefix_style),
                        Span::styled(rest.to_string(), theme.user_text_style),
                    ])),
                    None => lines.push(Line::from(Span::styled(text, theme.user_text_style))),
                }
            }
        } else {
            for text in wrap_text(&message.text, width) {
                lines.push(Line::from(Span::styled(text, theme.assistant_text_style)));
            }
        }
        lines.push(Line::from(""));
    }

    if pending {
        lines.push(Line::from(Span::styled(
            format!("{} {PENDING_LABEL}", spinner_frame()),
            theme.pending_indicator_style,
        )));
    }

    lines
}

/// First visible line for a transcript of `total` lines in a viewport of
/// `height`, `scroll_from_bottom` lines above the end. Also returns the
/// clamped scroll value.
pub fn visible_window(total: usize, height: usize, scroll_from_bottom: u16) -> (usize, u16) {
    let max_scroll = total.saturating_sub(height);
    let clamped = (scroll_from_bottom as usize).min(max_scroll);
    (max_scroll - clamped, clamped as u16)
}

pub fn render_transcript(f: &mut Frame, area: Rect, app: &mut App, theme: &Theme) {
    let title = format!(
        "Chatline v{} - {}",
        env!("CARGO_PKG_VERSION"),
        app.settings.model
    );
    let block = Block::default()
        .title(Span::styled(title, theme.title_style));
    let inner = block.inner(area);

    let lines = build_chat_lines(
        app.session.active_history(),
        app.session.pending_request(),
        theme,
        inner.width,
    );
    let (top, clamped) = visible_window(lines.len(), inner.height as usize, app.ui.scroll_from_bottom);
    app.ui.scroll_from_bottom = clamped;

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((top.min(u16::MAX as usize) as u16, 0));
    f.render_widget(paragraph, area);
}

fn input_title(app: &App) -> String {
    let hints = "Enter send • Ctrl+N new chat • Ctrl+B history • Ctrl+T theme • Ctrl+R speak • Esc quit";
    if app.session.listening() {
        format!("{LISTENING_LABEL}... • {hints}")
    } else {
        hints.to_string()
    }
}

/// Trailing part of `draft` that fits in `width` columns, leaving one
/// column for the cursor.
fn visible_draft(draft: &str, width: usize) -> &str {
    let budget = width.saturating_sub(1);
    let mut used = 0usize;
    let mut start = draft.len();
    for (idx, ch) in draft.char_indices().rev() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + ch_width > budget {
            break;
        }
        used += ch_width;
        start = idx;
    }
    &draft[start..]
}

pub fn render_input(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let title_style = if app.session.listening() {
        theme.listening_indicator_style
    } else {
        theme.input_title_style
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.input_border_style)
        .title(Span::styled(input_title(app), title_style));
    let inner = block.inner(area);

    let shown = visible_draft(&app.session.draft_input, inner.width as usize);
    let paragraph = Paragraph::new(Span::styled(shown.to_string(), theme.input_text_style))
        .block(block);
    f.render_widget(paragraph, area);

    if inner.width > 0 && inner.height > 0 {
        let cursor_x = inner.x + UnicodeWidthStr::width(shown) as u16;
        f.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
    }
}
