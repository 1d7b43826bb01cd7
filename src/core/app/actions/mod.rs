mod conversation;
mod input;
mod voice;

pub use conversation::{BUSY_NEW_CHAT_WARNING, BUSY_SUBMIT_WARNING, NEEDS_USER_MESSAGE_WARNING};
pub use voice::SPEECH_UNAVAILABLE_ERROR;

use std::time::Duration;

use tokio::sync::mpsc;

use super::App;
use crate::core::session::RequestId;
use crate::core::speech::ListenOutcome;

pub enum AppAction {
    InsertChar {
        ch: char,
    },
    InsertText {
        text: String,
    },
    Backspace,
    ClearInput,
    ScrollUp {
        lines: u16,
    },
    ScrollDown {
        lines: u16,
    },
    PageUp,
    PageDown,
    ExpireNotice,
    Quit,
    SubmitDraft,
    ResponseReceived {
        request_id: RequestId,
        reply: String,
    },
    StartNewConversation,
    ToggleSidebar,
    ToggleTheme,
    StartListening,
    ListenFinished {
        outcome: ListenOutcome,
    },
    SpeakLastReply,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AppActionContext {
    pub term_width: u16,
    pub term_height: u16,
}

pub struct AppActionEnvelope {
    pub action: AppAction,
    pub context: AppActionContext,
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppActionEnvelope>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppActionEnvelope>) -> Self {
        Self { tx }
    }

    pub fn dispatch(&self, action: AppAction) {
        self.dispatch_many([action], AppActionContext::default());
    }

    pub fn dispatch_many<I>(&self, actions: I, ctx: AppActionContext)
    where
        I: IntoIterator<Item = AppAction>,
    {
        for action in actions {
            let _ = self.tx.send(AppActionEnvelope {
                action,
                context: ctx,
            });
        }
    }
}

/// Work the event loop must perform outside the app state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    SendPrompt {
        request_id: RequestId,
        prompt: String,
    },
    Listen {
        timeout: Duration,
    },
    ScheduleVoiceSubmit {
        delay: Duration,
    },
    Speak {
        text: String,
    },
}

pub fn apply_actions(
    app: &mut App,
    envelopes: impl IntoIterator<Item = AppActionEnvelope>,
) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for envelope in envelopes {
        if let Some(cmd) = apply_action(app, envelope.action, envelope.context) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction, ctx: AppActionContext) -> Option<AppCommand> {
    match action {
        AppAction::InsertChar { .. }
        | AppAction::InsertText { .. }
        | AppAction::Backspace
        | AppAction::ClearInput
        | AppAction::ScrollUp { .. }
        | AppAction::ScrollDown { .. }
        | AppAction::PageUp
        | AppAction::PageDown
        | AppAction::ExpireNotice
        | AppAction::Quit => input::handle_input_action(app, action, ctx),

        AppAction::SubmitDraft
        | AppAction::ResponseReceived { .. }
        | AppAction::StartNewConversation
        | AppAction::ToggleSidebar
        | AppAction::ToggleTheme => conversation::handle_conversation_action(app, action),

        AppAction::StartListening
        | AppAction::ListenFinished { .. }
        | AppAction::SpeakLastReply => voice::handle_voice_action(app, action),
    }
}
