use tracing::{debug, warn};

use super::{AppAction, AppCommand};
use crate::core::app::App;
use crate::core::session::{NewConversationOutcome, SubmitOutcome};

pub const NEEDS_USER_MESSAGE_WARNING: &str =
    "You need to send at least one message to start a new chat!";
pub const BUSY_SUBMIT_WARNING: &str = "Please wait for the current reply before sending again.";
pub const BUSY_NEW_CHAT_WARNING: &str = "Please wait for the current reply before starting a new chat.";

pub(super) fn handle_conversation_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SubmitDraft => submit_draft(app),
        AppAction::ResponseReceived { request_id, reply } => {
            if !app.session.complete_submit(request_id, reply.as_str()) {
                debug!(request_id = request_id.get(), "Dropping reply for a request that is no longer pending");
                return None;
            }
            app.ui.follow_output();
            app.settings
                .speak_replies
                .then_some(AppCommand::Speak { text: reply })
        }
        AppAction::StartNewConversation => {
            match app.session.start_new_conversation() {
                NewConversationOutcome::Started => app.ui.follow_output(),
                NewConversationOutcome::NeedsUserMessage => {
                    app.ui.notify_warning(NEEDS_USER_MESSAGE_WARNING)
                }
                NewConversationOutcome::Busy => app.ui.notify_warning(BUSY_NEW_CHAT_WARNING),
            }
            None
        }
        AppAction::ToggleSidebar => {
            app.session.toggle_sidebar();
            None
        }
        AppAction::ToggleTheme => {
            app.session.toggle_theme();
            let mode = app.theme_mode();
            if let Err(err) = app.theme_store().save(mode) {
                warn!(error = %err, "Failed to persist theme preference");
                app.ui
                    .notify_error(format!("Theme changed to {mode} but could not be saved: {err}"));
            }
            None
        }
        _ => unreachable!("non-conversation action routed to conversation handler"),
    }
}

fn submit_draft(app: &mut App) -> Option<AppCommand> {
    match app.session.submit_draft() {
        SubmitOutcome::Ignored => None,
        SubmitOutcome::Busy => {
            app.ui.notify_warning(BUSY_SUBMIT_WARNING);
            None
        }
        SubmitOutcome::Started { request_id, prompt } => {
            app.ui.follow_output();
            Some(AppCommand::SendPrompt { request_id, prompt })
        }
    }
}
