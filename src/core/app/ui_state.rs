use std::time::{Duration, Instant};

/// How long a notice stays on screen.
pub const NOTICE_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Warning,
    Error,
}

/// Transient message shown over the chat until it expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub shown_at: Instant,
}

impl Notice {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= NOTICE_DURATION
    }
}

/// View-only state that never leaves the terminal.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Lines scrolled up from the bottom of the transcript; 0 follows new output.
    pub scroll_from_bottom: u16,
    pub notice: Option<Notice>,
    pub exit_requested: bool,
}

impl UiState {
    pub fn notify(&mut self, kind: NoticeKind, text: impl Into<String>) {
        self.notice = Some(Notice {
            kind,
            text: text.into(),
            shown_at: Instant::now(),
        });
    }

    pub fn notify_warning(&mut self, text: impl Into<String>) {
        self.notify(NoticeKind::Warning, text);
    }

    pub fn notify_error(&mut self, text: impl Into<String>) {
        self.notify(NoticeKind::Error, text);
    }

    /// Drops the notice once it has been visible long enough. Returns `true`
    /// when something was removed and the screen needs a redraw.
    pub fn expire_notice(&mut self, now: Instant) -> bool {
        if self.notice.as_ref().is_some_and(|notice| notice.is_expired(now)) {
            self.notice = None;
            return true;
        }
        false
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
    }

    pub fn follow_output(&mut self) {
        self.scroll_from_bottom = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_expire_after_duration() {
        let mut ui = UiState::default();
        ui.notify_warning("careful");
        let shown_at = ui.notice.as_ref().unwrap().shown_at;

        assert!(!ui.expire_notice(shown_at + Duration::from_millis(2999)));
        assert!(ui.notice.is_some());
        assert!(ui.expire_notice(shown_at + NOTICE_DURATION));
        assert!(ui.notice.is_none());
        assert!(!ui.expire_notice(shown_at + NOTICE_DURATION));
    }

    #[test]
    fn scrolling_saturates_at_bottom() {
        let mut ui = UiState::default();
        ui.scroll_down(5);
        assert_eq!(ui.scroll_from_bottom, 0);
        ui.scroll_up(3);
        ui.scroll_down(1);
        assert_eq!(ui.scroll_from_bottom, 2);
        ui.follow_output();
        assert_eq!(ui.scroll_from_bottom, 0);
    }
}
