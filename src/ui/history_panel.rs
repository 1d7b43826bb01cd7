use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::core::message::Conversation;
use crate::ui::theme::Theme;

pub const SIDEBAR_WIDTH: u16 = 30;
pub const NEW_CHAT_HINT: &str = "+ New Chat (Ctrl+N)";
pub const HISTORY_HEADING: &str = "History";
pub const EMPTY_HISTORY: &str = "No previous chats";

/// Sidebar lines: the new-chat hint, the heading, then one line per saved
/// conversation in store order (newest first).
pub fn build_history_lines(conversations: &[Conversation], theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(NEW_CHAT_HINT, theme.sidebar_hint_style)),
        Line::from(""),
        Line::from(Span::styled(HISTORY_HEADING, theme.sidebar_heading_style)),
    ];

    if conversations.is_empty() {
        lines.push(Line::from(Span::styled(EMPTY_HISTORY, theme.system_text_style)));
        return lines;
    }

    lines.extend(conversations.iter().map(|conversation| {
        Line::from(vec![
            Span::styled(format!("{}...", conversation.title), theme.sidebar_item_style),
            Span::styled(
                format!(" {}", conversation.saved_at.format("%H:%M")),
                theme.system_text_style,
            ),
        ])
    }));
    lines
}

pub fn render_history_panel(
    f: &mut Frame,
    area: Rect,
    conversations: &[Conversation],
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(theme.sidebar_border_style);
    let paragraph = Paragraph::new(build_history_lines(conversations, theme)).block(block);
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Message;

    fn first_span(line: &Line<'_>) -> String {
        line.spans[0].content.to_string()
    }

    #[test]
    fn empty_store_shows_placeholder() {
        let lines = build_history_lines(&[], &Theme::dark_default());
        assert_eq!(lines.len(), 4);
        assert_eq!(first_span(&lines[2]), HISTORY_HEADING);
        assert_eq!(first_span(&lines[3]), EMPTY_HISTORY);
    }

    #[test]
    fn titles_are_listed_in_order_with_ellipsis() {
        let conversations = vec![
            Conversation::from_history(vec![Message::user("Second chat")]),
            Conversation::from_history(vec![Message::user("First chat")]),
        ];
        let lines = build_history_lines(&conversations, &Theme::dark_default());
        assert_eq!(first_span(&lines[3]), "Second chat...");
        assert_eq!(first_span(&lines[4]), "First chat...");
    }
}
