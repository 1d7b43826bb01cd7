//! `chatline set` / `chatline unset` handling.
//!
//! Each key is described by a [`Setting`] entry; the CLI loads the config,
//! applies the change in memory, and saves it back atomically.

use thiserror::Error;

use crate::core::config::{Config, ThemeMode};

#[derive(Debug, Error)]
pub enum SettingError {
    #[error("Unknown config key: {0}. Known keys: {keys}", keys = known_keys().join(", "))]
    UnknownKey(String),
    #[error("Missing value for {key}. Example: {example}")]
    MissingValue {
        key: &'static str,
        example: &'static str,
    },
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

struct Setting {
    key: &'static str,
    example: &'static str,
    set: fn(&mut Config, &str) -> Result<String, String>,
    unset: fn(&mut Config),
}

const SETTINGS: &[Setting] = &[
    Setting {
        key: "theme",
        example: "chatline set theme light",
        set: |config, value| {
            let mode: ThemeMode = value.parse()?;
            config.theme = Some(mode.as_str().to_string());
            Ok(mode.to_string())
        },
        unset: |config| config.theme = None,
    },
    Setting {
        key: "model",
        example: "chatline set model gemini-2.0-flash",
        set: |config, value| {
            config.model = Some(value.to_string());
            Ok(value.to_string())
        },
        unset: |config| config.model = None,
    },
    Setting {
        key: "base-url",
        example: "chatline set base-url https://generativelanguage.googleapis.com/v1beta",
        set: |config, value| {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err("expected an http:// or https:// URL".to_string());
            }
            config.base_url = Some(value.to_string());
            Ok(value.to_string())
        },
        unset: |config| config.base_url = None,
    },
    Setting {
        key: "speak-replies",
        example: "chatline set speak-replies on",
        set: |config, value| {
            let enabled = parse_bool(value)
                .ok_or_else(|| "use on or off (also accepts true/false, yes/no)".to_string())?;
            config.speak_replies = Some(enabled);
            Ok(if enabled { "on" } else { "off" }.to_string())
        },
        unset: |config| config.speak_replies = None,
    },
    Setting {
        key: "voice-submit-delay",
        example: "chatline set voice-submit-delay 750",
        set: |config, value| {
            let millis: u64 = value
                .trim_end_matches("ms")
                .parse()
                .map_err(|_| "expected a number of milliseconds".to_string())?;
            config.voice_submit_delay_ms = Some(millis);
            Ok(format!("{millis}ms"))
        },
        unset: |config| config.voice_submit_delay_ms = None,
    },
];

pub fn known_keys() -> Vec<&'static str> {
    SETTINGS.iter().map(|setting| setting.key).collect()
}

fn find(key: &str) -> Result<&'static Setting, SettingError> {
    SETTINGS
        .iter()
        .find(|setting| setting.key == key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))
}

fn parse_bool(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Applies `key = value` to `config` and returns the confirmation line.
pub fn set_value(config: &mut Config, key: &str, value: &[String]) -> Result<String, SettingError> {
    let setting = find(key)?;
    let joined = value.join(" ");
    let joined = joined.trim();
    if joined.is_empty() {
        return Err(SettingError::MissingValue {
            key: setting.key,
            example: setting.example,
        });
    }
    let shown = (setting.set)(config, joined).map_err(|reason| SettingError::InvalidValue {
        key: setting.key,
        reason,
    })?;
    Ok(format!("✅ Set {} to: {shown}", setting.key))
}

pub fn unset_value(config: &mut Config, key: &str) -> Result<String, SettingError> {
    let setting = find(key)?;
    (setting.unset)(config);
    Ok(format!("✅ Unset {}", setting.key))
}
