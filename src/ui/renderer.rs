use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::core::app::{App, Notice};
use crate::ui::chat_view::{render_input, render_transcript};
use crate::ui::history_panel::{render_history_panel, SIDEBAR_WIDTH};
use crate::ui::theme::Theme;

const INPUT_HEIGHT: u16 = 3;
const NOTICE_MAX_WIDTH: u16 = 48;

pub fn ui(f: &mut Frame, app: &mut App) {
    let theme = Theme::for_mode(app.theme_mode());
    let area = f.area();

    f.render_widget(
        Block::default().style(Style::default().bg(theme.background_color)),
        area,
    );

    let main_area = if app.session.sidebar_visible {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);
        render_history_panel(f, columns[0], app.session.saved_conversations(), &theme);
        columns[1]
    } else {
        area
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(INPUT_HEIGHT)])
        .split(main_area);

    render_transcript(f, rows[0], app, &theme);
    render_input(f, rows[1], app, &theme);

    if let Some(notice) = &app.ui.notice {
        render_notice(f, area, notice, &theme);
    }
}

/// Top-right box sized to the notice text, wrapped when it is too long.
fn notice_area(area: Rect, text: &str) -> Rect {
    let max_width = NOTICE_MAX_WIDTH.min(area.width);
    let inner_max = max_width.saturating_sub(2).max(1);
    let text_width = UnicodeWidthStr::width(text).max(1) as u16;
    let inner_width = text_width.min(inner_max);
    let inner_height = text_width.div_ceil(inner_width);

    let width = (inner_width + 2).min(area.width);
    let height = (inner_height + 2).min(area.height);
    Rect {
        x: area.x + area.width.saturating_sub(width),
        y: area.y,
        width,
        height,
    }
}

fn render_notice(f: &mut Frame, area: Rect, notice: &Notice, theme: &Theme) {
    let rect = notice_area(area, &notice.text);
    let style = theme.notice_style(notice.kind);
    let paragraph = Paragraph::new(Span::styled(notice.text.clone(), style))
        .style(style)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(style));
    f.render_widget(Clear, rect);
    f.render_widget(paragraph, rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::{apply_action, AppAction, AppActionContext, AppCommand};
    use crate::core::session::RequestId;
    use crate::core::message::GREETING;
    use crate::ui::chat_view::{LISTENING_LABEL, PENDING_LABEL};
    use crate::ui::history_panel::{EMPTY_HISTORY, HISTORY_HEADING};
    use crate::utils::test_utils::create_test_app;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
        terminal.draw(|f| ui(f, app)).expect("draw");
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn apply(app: &mut App, action: AppAction) {
        apply_action(app, action, AppActionContext::default());
    }

    fn type_and_send(app: &mut App, text: &str) -> Option<RequestId> {
        apply(
            app,
            AppAction::InsertText {
                text: text.to_string(),
            },
        );
        match apply_action(app, AppAction::SubmitDraft, AppActionContext::default()) {
            Some(AppCommand::SendPrompt { request_id, .. }) => Some(request_id),
            _ => None,
        }
    }

    #[test]
    fn fresh_session_shows_greeting_and_empty_history() {
        let (mut app, _dir) = create_test_app();
        let screen = draw(&mut app, 100, 20);
        assert!(screen.contains(GREETING));
        assert!(screen.contains(HISTORY_HEADING));
        assert!(screen.contains(EMPTY_HISTORY));
    }

    #[test]
    fn hidden_sidebar_is_not_drawn() {
        let (mut app, _dir) = create_test_app();
        apply(&mut app, AppAction::ToggleSidebar);
        let screen = draw(&mut app, 100, 20);
        assert!(!screen.contains(HISTORY_HEADING));
        assert!(screen.contains(GREETING));
    }

    #[test]
    fn pending_request_shows_user_line_and_indicator() {
        let (mut app, _dir) = create_test_app();
        type_and_send(&mut app, "Tell me a joke");
        let screen = draw(&mut app, 100, 20);
        assert!(screen.contains("You: Tell me a joke"));
        assert!(screen.contains(PENDING_LABEL));
    }

    #[test]
    fn saved_conversation_title_appears_in_sidebar() {
        let (mut app, _dir) = create_test_app();
        let request_id = type_and_send(&mut app, "Plan a trip to Lisbon").expect("request sent");
        apply(
            &mut app,
            AppAction::ResponseReceived {
                request_id,
                reply: "Sure.".into(),
            },
        );
        apply(&mut app, AppAction::StartNewConversation);

        let screen = draw(&mut app, 100, 20);
        assert!(screen.contains("Hello! How can I ass..."));
        assert!(!screen.contains(EMPTY_HISTORY));
    }

    #[test]
    fn notices_and_listening_indicator_render() {
        let (mut app, _dir) = create_test_app();
        apply(&mut app, AppAction::StartNewConversation);
        apply(&mut app, AppAction::StartListening);
        let screen = draw(&mut app, 120, 20);
        assert!(screen.contains("You need to send"));
        assert!(screen.contains(LISTENING_LABEL));
    }

    #[test]
    fn scrolled_view_is_clamped_to_history() {
        let (mut app, _dir) = create_test_app();
        app.ui.scroll_up(500);
        draw(&mut app, 100, 20);
        assert_eq!(app.ui.scroll_from_bottom, 0);
    }

    #[test]
    fn notice_box_hugs_the_top_right_corner() {
        let area = Rect::new(0, 0, 100, 30);
        let rect = notice_area(area, "short");
        assert_eq!(rect, Rect::new(93, 0, 7, 3));

        let long = "x".repeat(100);
        let rect = notice_area(area, &long);
        assert_eq!(rect.width, NOTICE_MAX_WIDTH);
        assert_eq!(rect.x + rect.width, 100);
        assert_eq!(rect.height, 5);
    }
}
