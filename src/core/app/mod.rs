//! Application state shared by the event loop and the renderer.
//!
//! [`App`] pairs the conversation store ([`SessionState`]) with view-only
//! state and the settings that shape background work. All mutation goes
//! through [`apply_actions`]; anything that has to leave the loop (network,
//! microphone, timers, speakers) comes back out as an [`AppCommand`].

use std::time::Duration;

use tracing::warn;

use crate::core::config::{Config, ThemeMode, ThemeStore};
use crate::core::session::SessionState;

pub mod actions;
pub mod ui_state;

pub use actions::{
    apply_action, apply_actions, AppAction, AppActionContext, AppActionDispatcher,
    AppActionEnvelope, AppCommand,
};
pub use ui_state::{Notice, NoticeKind, UiState};


/// Knobs read from config once at startup.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub model: String,
    pub voice_submit_delay: Duration,
    pub listen_timeout: Duration,
    pub speak_replies: bool,
    /// Whether a speech recognizer is configured at all.
    pub speech_available: bool,
}

impl AppSettings {
    pub fn from_config(config: &Config, model_override: Option<&str>) -> Self {
        Self {
            model: model_override
                .filter(|model| !model.trim().is_empty())
                .unwrap_or_else(|| config.model())
                .to_string(),
            voice_submit_delay: config.voice_submit_delay(),
            listen_timeout: config.speech.listen_timeout(),
            speak_replies: config.speak_replies(),
            speech_available: config
                .speech
                .listen_command
                .as_ref()
                .is_some_and(|argv| argv.first().is_some_and(|program| !program.trim().is_empty())),
        }
    }
}

pub struct App {
    pub session: SessionState,
    pub ui: UiState,
    pub settings: AppSettings,
    theme_store: ThemeStore,
}

impl App {
    /// Builds the app with the theme read from `theme_store`. The resolved
    /// theme is written back so a terminal-derived default becomes the
    /// persisted preference that later toggles return to.
    pub fn new(settings: AppSettings, theme_store: ThemeStore) -> Self {
        let theme = theme_store.load();
        if let Err(err) = theme_store.save(theme) {
            warn!(error = %err, "Failed to persist theme preference");
        }
        Self {
            session: SessionState::new(theme.is_dark()),
            ui: UiState::default(),
            settings,
            theme_store,
        }
    }

    pub fn theme_mode(&self) -> ThemeMode {
        ThemeMode::from_dark(self.session.dark_theme)
    }

    pub fn theme_store(&self) -> &ThemeStore {
        &self.theme_store
    }
}
