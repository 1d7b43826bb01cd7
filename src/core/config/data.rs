use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::core::response_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::core::speech::{DEFAULT_LISTEN_TIMEOUT, DEFAULT_SPEECH_LANGUAGE};

/// Delay between a voice transcript landing in the input and its submission.
pub const DEFAULT_VOICE_SUBMIT_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }

    pub fn from_dark(dark: bool) -> Self {
        if dark {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(ThemeMode::Dark),
            "light" => Ok(ThemeMode::Light),
            other => Err(format!("unknown theme '{other}' (expected 'dark' or 'light')")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct SpeechConfig {
    /// Command that records one utterance and prints its transcript
    pub listen_command: Option<Vec<String>>,
    /// Command that speaks the text passed as its final argument
    pub speak_command: Option<Vec<String>>,
    pub listen_timeout_secs: Option<u64>,
    /// Recognition/synthesis language (e.g., "en-US")
    pub language: Option<String>,
}

impl SpeechConfig {
    pub fn is_empty(&self) -> bool {
        self == &SpeechConfig::default()
    }

    pub fn listen_timeout(&self) -> Duration {
        self.listen_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_LISTEN_TIMEOUT)
    }

    pub fn language(&self) -> &str {
        self.language
            .as_deref()
            .filter(|lang| !lang.trim().is_empty())
            .unwrap_or(DEFAULT_SPEECH_LANGUAGE)
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// "dark" or "light"; unset means follow the terminal
    pub theme: Option<String>,
    /// Gemini model name (e.g., "gemini-2.0-flash")
    pub model: Option<String>,
    /// Base URL of the Generative Language API
    pub base_url: Option<String>,
    pub voice_submit_delay_ms: Option<u64>,
    /// Speak every assistant reply as it arrives
    pub speak_replies: Option<bool>,
    #[serde(default, skip_serializing_if = "SpeechConfig::is_empty")]
    pub speech: SpeechConfig,
}

impl Config {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .filter(|model| !model.trim().is_empty())
            .unwrap_or(DEFAULT_MODEL)
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn voice_submit_delay(&self) -> Duration {
        self.voice_submit_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_VOICE_SUBMIT_DELAY)
    }

    pub fn speak_replies(&self) -> bool {
        self.speak_replies.unwrap_or(false)
    }

    /// Persisted theme, ignoring values that are neither "dark" nor "light".
    pub fn theme_mode(&self) -> Option<ThemeMode> {
        self.theme.as_deref().and_then(|theme| theme.parse().ok())
    }

    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.theme {
            Some(theme) => println!("  theme: {theme}"),
            None => println!("  theme: (unset, follows terminal)"),
        }
        println!("  model: {}", self.model());
        println!("  base-url: {}", self.base_url());
        println!(
            "  voice-submit-delay: {}ms",
            self.voice_submit_delay().as_millis()
        );
        println!(
            "  speak-replies: {}",
            if self.speak_replies() { "on" } else { "off" }
        );
        match &self.speech.listen_command {
            Some(argv) => println!("  speech.listen-command: {}", argv.join(" ")),
            None => println!("  speech.listen-command: (unset)"),
        }
        match &self.speech.speak_command {
            Some(argv) => println!("  speech.speak-command: {}", argv.join(" ")),
            None => println!("  speech.speak-command: (unset)"),
        }
    }
}

pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            if let Ok(relative) = path.strip_prefix(PathBuf::from(home)) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
