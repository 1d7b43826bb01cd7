//! Persisted dark/light preference.
//!
//! The preference lives in the `theme` key of the config file. It is read and
//! written back once at startup, then rewritten on every toggle. When it has
//! never been written the terminal's advertised background decides.

use std::path::{Path, PathBuf};

use tracing::warn;

use super::data::{Config, ThemeMode};
use super::io::ConfigError;

/// Terminal convention: `fg;bg` (or `fg;default;bg`) palette indices.
const COLORFGBG_ENV: &str = "COLORFGBG";

#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by the default config file location.
    pub fn default_location() -> Result<Self, ConfigError> {
        Config::config_path().map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> ThemeMode {
        self.load_with_fallback(|| theme_from_colorfgbg(std::env::var(COLORFGBG_ENV).ok().as_deref()))
    }

    fn load_with_fallback(&self, terminal_preference: impl FnOnce() -> Option<ThemeMode>) -> ThemeMode {
        let persisted = match Config::load_from_path(&self.path) {
            Ok(config) => config.theme_mode(),
            Err(err) => {
                warn!(error = %err, "Could not read theme preference");
                None
            }
        };

        persisted
            .or_else(terminal_preference)
            .unwrap_or(ThemeMode::Dark)
    }

    /// Persists `mode`, leaving every other config key untouched.
    pub fn save(&self, mode: ThemeMode) -> Result<(), ConfigError> {
        let mut config = Config::load_from_path(&self.path)?;
        config.theme = Some(mode.as_str().to_string());
        config.save_to_path(&self.path)
    }
}

/// Interprets a `COLORFGBG` value; palette entries 7 and 9-15 are light
/// backgrounds, everything else is dark.
pub fn theme_from_colorfgbg(value: Option<&str>) -> Option<ThemeMode> {
    let background = value?.rsplit(';').next()?.trim().parse::<u8>().ok()?;
    Some(match background {
        7 | 9..=15 => ThemeMode::Light,
        _ => ThemeMode::Dark,
    })
}
