use std::time::Instant;

use super::{AppAction, AppActionContext, AppCommand};
use crate::core::app::App;

/// Rows taken by the input box and title around the transcript.
const CHROME_ROWS: u16 = 4;

pub(super) fn handle_input_action(
    app: &mut App,
    action: AppAction,
    ctx: AppActionContext,
) -> Option<AppCommand> {
    match action {
        AppAction::InsertChar { ch } => {
            if !ch.is_control() {
                app.session.draft_input.push(ch);
            }
        }
        AppAction::InsertText { text } => {
            // single-line input box; pasted newlines become spaces
            let cleaned = text.replace("\r\n", " ").replace(['\r', '\n'], " ");
            app.session.draft_input.push_str(&cleaned);
        }
        AppAction::Backspace => {
            app.session.draft_input.pop();
        }
        AppAction::ClearInput => app.session.draft_input.clear(),
        AppAction::ScrollUp { lines } => app.ui.scroll_up(lines),
        AppAction::ScrollDown { lines } => app.ui.scroll_down(lines),
        AppAction::PageUp => app.ui.scroll_up(page_size(ctx)),
        AppAction::PageDown => app.ui.scroll_down(page_size(ctx)),
        AppAction::ExpireNotice => {
            app.ui.expire_notice(Instant::now());
        }
        AppAction::Quit => app.ui.exit_requested = true,
        _ => unreachable!("non-input action routed to input handler"),
    }
    None
}

fn page_size(ctx: AppActionContext) -> u16 {
    ctx.term_height.saturating_sub(CHROME_ROWS).max(1)
}
