use tracing::{info, warn};

use super::{AppAction, AppCommand};
use crate::core::app::App;
use crate::core::session::ListenRequest;
use crate::core::speech::ListenOutcome;

pub const SPEECH_UNAVAILABLE_ERROR: &str =
    "Speech recognition is not available. Set speech.listen_command in the config.";

pub(super) fn handle_voice_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::StartListening => start_listening(app),
        AppAction::ListenFinished { outcome } => finish_listening(app, outcome),
        AppAction::SpeakLastReply => app
            .session
            .last_assistant_text()
            .map(|text| AppCommand::Speak {
                text: text.to_string(),
            }),
        _ => unreachable!("non-voice action routed to voice handler"),
    }
}

fn start_listening(app: &mut App) -> Option<AppCommand> {
    if !app.settings.speech_available {
        app.ui.notify_error(SPEECH_UNAVAILABLE_ERROR);
        return None;
    }

    match app.session.begin_listening() {
        ListenRequest::Start => Some(AppCommand::Listen {
            timeout: app.settings.listen_timeout,
        }),
        ListenRequest::AlreadyListening => None,
    }
}

fn finish_listening(app: &mut App, outcome: ListenOutcome) -> Option<AppCommand> {
    match &outcome {
        ListenOutcome::Failed(reason) => warn!(%reason, "Speech recognition failed"),
        ListenOutcome::TimedOut => info!("Speech recognition timed out"),
        ListenOutcome::Completed(_) => {}
    }

    let transcript = app.session.finish_listening(outcome)?;
    app.session
        .submit_from_voice(&transcript)
        .then_some(AppCommand::ScheduleVoiceSubmit {
            delay: app.settings.voice_submit_delay,
        })
}
