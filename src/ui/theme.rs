use ratatui::style::{Color, Modifier, Style};

use crate::core::app::NoticeKind;
use crate::core::config::ThemeMode;

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,
    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_text_style: Style,
    pub system_text_style: Style,

    // Chrome
    pub title_style: Style,
    pub pending_indicator_style: Style,
    pub input_border_style: Style,
    pub input_title_style: Style,
    pub listening_indicator_style: Style,

    // Input area
    pub input_text_style: Style,
    pub input_cursor_style: Style,

    // History sidebar
    pub sidebar_border_style: Style,
    pub sidebar_heading_style: Style,
    pub sidebar_item_style: Style,
    pub sidebar_hint_style: Style,

    // Notices
    pub notice_warning_style: Style,
    pub notice_error_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            background_color: Color::Black,
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_text_style: Style::default().fg(Color::White),
            system_text_style: Style::default().fg(Color::DarkGray),

            title_style: Style::default().fg(Color::Gray),
            pending_indicator_style: Style::default().fg(Color::White),
            input_border_style: Style::default().fg(Color::Gray),
            input_title_style: Style::default().fg(Color::Gray),
            listening_indicator_style: Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),

            input_text_style: Style::default().fg(Color::White),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),

            sidebar_border_style: Style::default().fg(Color::DarkGray),
            sidebar_heading_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
            sidebar_item_style: Style::default().fg(Color::White),
            sidebar_hint_style: Style::default().fg(Color::Cyan),

            notice_warning_style: Style::default().fg(Color::Black).bg(Color::Yellow),
            notice_error_style: Style::default().fg(Color::White).bg(Color::Red),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: Color::White,
            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            assistant_text_style: Style::default().fg(Color::Black),
            system_text_style: Style::default().fg(Color::Gray),

            title_style: Style::default().fg(Color::DarkGray),
            pending_indicator_style: Style::default().fg(Color::Black),
            input_border_style: Style::default().fg(Color::Black),
            input_title_style: Style::default().fg(Color::DarkGray),
            listening_indicator_style: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),

            input_text_style: Style::default().fg(Color::Black),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),

            sidebar_border_style: Style::default().fg(Color::Gray),
            sidebar_heading_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
            sidebar_item_style: Style::default().fg(Color::Black),
            sidebar_hint_style: Style::default().fg(Color::Blue),

            notice_warning_style: Style::default().fg(Color::Black).bg(Color::LightYellow),
            notice_error_style: Style::default().fg(Color::White).bg(Color::Red),
        }
    }

    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark_default(),
            ThemeMode::Light => Self::light(),
        }
    }

    pub fn notice_style(&self, kind: NoticeKind) -> Style {
        match kind {
            NoticeKind::Warning => self.notice_warning_style,
            NoticeKind::Error => self.notice_error_style,
        }
    }
}
