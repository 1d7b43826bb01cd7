use std::error::Error;
use std::sync::Arc;

use tracing::info;

use super::executors::Services;
use crate::auth::AuthManager;
use crate::core::app::{App, AppSettings};
use crate::core::config::{Config, SpeechConfig, ThemeStore};
use crate::core::response_client::ResponseClient;
use crate::core::speech::{
    CommandRecognizer, CommandSynthesizer, SilentSynthesizer, SpeechCommand, SpeechRecognizer,
    SpeechSynthesizer,
};

/// Build the application state and the background services for the chat loop.
///
/// Exits the process with a readable message when no API key is available,
/// before the terminal is switched into raw mode.
pub fn bootstrap_app(
    model_override: Option<&str>,
    auth_manager: &AuthManager,
) -> Result<(App, Services), Box<dyn Error>> {
    let config = Config::load()?;

    let (api_key, key_source) = match auth_manager.resolve_api_key() {
        Ok(resolved) => resolved,
        Err(err) => {
            eprintln!("❌ {err}");
            std::process::exit(1);
        }
    };

    let settings = AppSettings::from_config(&config, model_override);
    info!(
        model = %settings.model,
        base_url = %config.base_url(),
        key_source = key_source.describe(),
        speech = settings.speech_available,
        "Starting chat session"
    );

    let services = build_services(&config, &settings, api_key);
    let app = App::new(settings, ThemeStore::default_location()?);
    Ok((app, services))
}

pub fn build_services(config: &Config, settings: &AppSettings, api_key: String) -> Services {
    let responses = ResponseClient::new(
        reqwest::Client::new(),
        config.base_url(),
        settings.model.clone(),
        api_key,
    );
    Services {
        responses: Arc::new(responses),
        recognizer: recognizer_from_config(&config.speech),
        synthesizer: synthesizer_from_config(&config.speech),
    }
}

fn recognizer_from_config(speech: &SpeechConfig) -> Option<Arc<dyn SpeechRecognizer>> {
    let argv = speech.listen_command.as_deref()?;
    let command = SpeechCommand::from_argv(argv, speech.language())?;
    Some(Arc::new(CommandRecognizer::new(command)))
}

fn synthesizer_from_config(speech: &SpeechConfig) -> Arc<dyn SpeechSynthesizer> {
    match speech
        .speak_command
        .as_deref()
        .and_then(|argv| SpeechCommand::from_argv(argv, speech.language()))
    {
        Some(command) => Arc::new(CommandSynthesizer::new(command)),
        None => Arc::new(SilentSynthesizer),
    }
}
