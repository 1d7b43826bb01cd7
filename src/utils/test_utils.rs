use std::time::Duration;

use tempfile::TempDir;

use crate::core::app::{App, AppSettings};
use crate::core::config::ThemeStore;

pub fn test_settings() -> AppSettings {
    AppSettings {
        model: "gemini-test".to_string(),
        voice_submit_delay: Duration::from_millis(500),
        listen_timeout: Duration::from_secs(10),
        speak_replies: false,
        speech_available: true,
    }
}

/// App whose theme preference lives in a throwaway directory. Keep the
/// returned `TempDir` alive for as long as the app is used.
pub fn create_test_app() -> (App, TempDir) {
    create_test_app_with(test_settings())
}

pub fn create_test_app_with(settings: AppSettings) -> (App, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let store = ThemeStore::new(dir.path().join("config.toml"));
    store
        .save(crate::core::config::ThemeMode::Dark)
        .expect("Failed to seed theme preference");
    (App::new(settings, store), dir)
}
