//! API key storage.
//!
//! The Gemini key is taken from `GEMINI_API_KEY` when set, otherwise from the
//! system keyring entry written by `chatline auth`.

use std::io::{self, BufRead, Write};

use keyring::Entry;
use thiserror::Error;
use tracing::debug;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
const KEYRING_SERVICE: &str = "chatline";
const KEYRING_USER: &str = "gemini";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),
    #[error("failed to read API key: {0}")]
    Io(#[from] io::Error),
    #[error("API key cannot be empty")]
    EmptyKey,
    #[error(
        "No Gemini API key found.\n\n\
         Run `chatline auth` to store one in your system keyring, or set it for this shell:\n\
         export GEMINI_API_KEY=\"your-api-key-here\""
    )]
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Environment,
    Keyring,
}

impl KeySource {
    pub fn describe(self) -> &'static str {
        match self {
            KeySource::Environment => API_KEY_ENV,
            KeySource::Keyring => "system keyring",
        }
    }
}

pub struct AuthManager {
    use_keyring: bool,
}

impl Default for AuthManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthManager {
    pub fn new() -> Self {
        Self { use_keyring: true }
    }

    /// Resolver that never touches the keyring; only the environment counts.
    pub fn env_only() -> Self {
        Self { use_keyring: false }
    }

    fn entry(&self) -> Result<Entry, AuthError> {
        Ok(Entry::new(KEYRING_SERVICE, KEYRING_USER)?)
    }

    pub fn store_key(&self, key: &str) -> Result<(), AuthError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(AuthError::EmptyKey);
        }
        self.entry()?.set_password(key)?;
        Ok(())
    }

    pub fn stored_key(&self) -> Result<Option<String>, AuthError> {
        if !self.use_keyring {
            return Ok(None);
        }
        match self.entry()?.get_password() {
            Ok(key) => Ok(Some(key)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Removes the stored key. Returns `false` when there was nothing to remove.
    pub fn remove_key(&self) -> Result<bool, AuthError> {
        match self.entry()?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    pub fn resolve_api_key(&self) -> Result<(String, KeySource), AuthError> {
        let from_env = std::env::var(API_KEY_ENV).ok();
        self.resolve_with_env(from_env.as_deref())
    }

    fn resolve_with_env(&self, env_value: Option<&str>) -> Result<(String, KeySource), AuthError> {
        if let Some(key) = env_value.map(str::trim).filter(|key| !key.is_empty()) {
            debug!(source = "env", "Resolved API key");
            return Ok((key.to_string(), KeySource::Environment));
        }
        match self.stored_key()? {
            Some(key) if !key.trim().is_empty() => {
                debug!(source = "keyring", "Resolved API key");
                Ok((key.trim().to_string(), KeySource::Keyring))
            }
            _ => Err(AuthError::Missing),
        }
    }

    pub fn interactive_auth(&self) -> Result<(), AuthError> {
        println!("🔐 Chatline Authentication Setup");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!();
        if self.stored_key()?.is_some() {
            println!("A Gemini API key is already stored; entering a new one replaces it.");
        }
        print!("Enter your Gemini API key: ");
        io::stdout().flush()?;

        let key = read_key(io::stdin().lock())?;
        self.store_key(&key)?;

        println!("✅ API key stored securely in your system keyring.");
        Ok(())
    }

    pub fn interactive_deauth(&self) -> Result<(), AuthError> {
        if self.remove_key()? {
            println!("✅ Removed the stored Gemini API key.");
        } else {
            println!("No stored Gemini API key to remove.");
        }
        Ok(())
    }
}

fn read_key(mut reader: impl BufRead) -> Result<String, AuthError> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let key = line.trim();
    if key.is_empty() {
        return Err(AuthError::EmptyKey);
    }
    Ok(key.to_string())
}
