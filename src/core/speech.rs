//! Speech-to-text and text-to-speech behind small traits.
//!
//! The terminal has no speech engine of its own, so both directions shell out
//! to user-configured commands. A recognizer command records one utterance and
//! prints the transcript on stdout; a synthesizer command receives the text to
//! speak as its final argument.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

/// Environment variable carrying the recognition/synthesis language.
pub const SPEECH_LANG_ENV: &str = "CHATLINE_SPEECH_LANG";
pub const DEFAULT_SPEECH_LANGUAGE: &str = "en-US";
pub const DEFAULT_LISTEN_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` exited with {status}")]
    Exited {
        program: String,
        status: std::process::ExitStatus,
    },
    #[error("no speech detected")]
    NoSpeech,
}

/// Lifecycle of a single listen attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListenState {
    #[default]
    Idle,
    Listening,
    Completed,
    Failed,
    TimedOut,
}

impl ListenState {
    pub fn is_listening(self) -> bool {
        self == ListenState::Listening
    }
}

/// Terminal result of a listen attempt; exactly one is delivered per attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenOutcome {
    Completed(String),
    Failed(String),
    TimedOut,
}

impl ListenOutcome {
    pub fn state(&self) -> ListenState {
        match self {
            ListenOutcome::Completed(_) => ListenState::Completed,
            ListenOutcome::Failed(_) => ListenState::Failed,
            ListenOutcome::TimedOut => ListenState::TimedOut,
        }
    }
}

#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Records one utterance and returns its raw transcript.
    async fn recognize(&self) -> Result<String, SpeechError>;
}

pub trait SpeechSynthesizer: Send + Sync {
    /// Requests playback of `text` without waiting for it to finish.
    fn speak(&self, text: &str);
}

/// Runs one recognition attempt bounded by `timeout`.
pub async fn listen(recognizer: &dyn SpeechRecognizer, timeout: Duration) -> ListenOutcome {
    match tokio::time::timeout(timeout, recognizer.recognize()).await {
        Ok(Ok(transcript)) => ListenOutcome::Completed(transcript),
        Ok(Err(err)) => ListenOutcome::Failed(err.to_string()),
        Err(_) => ListenOutcome::TimedOut,
    }
}

/// Argv of an external speech command, plus the language handed to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechCommand {
    program: String,
    args: Vec<String>,
    language: String,
}

impl SpeechCommand {
    /// Returns `None` for an empty argv.
    pub fn from_argv(argv: &[String], language: impl Into<String>) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        if program.trim().is_empty() {
            return None;
        }
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
            language: language.into(),
        })
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .env(SPEECH_LANG_ENV, &self.language)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        command
    }
}

pub struct CommandRecognizer {
    command: SpeechCommand,
}

impl CommandRecognizer {
    pub fn new(command: SpeechCommand) -> Self {
        Self { command }
    }
}

#[async_trait]
impl SpeechRecognizer for CommandRecognizer {
    async fn recognize(&self) -> Result<String, SpeechError> {
        let program = self.command.program.clone();
        let output = self
            .command
            .command()
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|source| SpeechError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SpeechError::Exited {
                program,
                status: output.status,
            });
        }

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_owned)
            .ok_or(SpeechError::NoSpeech)
    }
}

pub struct CommandSynthesizer {
    command: SpeechCommand,
}

impl CommandSynthesizer {
    pub fn new(command: SpeechCommand) -> Self {
        Self { command }
    }
}

impl SpeechSynthesizer for CommandSynthesizer {
    fn speak(&self, text: &str) {
        let mut command = self.command.command();
        command
            .arg(text)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(false);

        let program = self.command.program.clone();
        match command.spawn() {
            Ok(mut child) => {
                tokio::spawn(async move {
                    match child.wait().await {
                        Ok(status) if !status.success() => {
                            warn!(%program, %status, "Speech synthesis command failed");
                        }
                        Ok(_) => {}
                        Err(err) => warn!(%program, error = %err, "Speech synthesis wait failed"),
                    }
                });
            }
            Err(err) => warn!(%program, error = %err, "Failed to start speech synthesis"),
        }
    }
}

/// Synthesizer used when no speak command is configured.
pub struct SilentSynthesizer;

impl SpeechSynthesizer for SilentSynthesizer {
    fn speak(&self, text: &str) {
        debug!(chars = text.chars().count(), "No speak command configured; skipping speech");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRecognizer(Result<&'static str, ()>);

    #[async_trait]
    impl SpeechRecognizer for FixedRecognizer {
        async fn recognize(&self) -> Result<String, SpeechError> {
            self.0.map(str::to_owned).map_err(|_| SpeechError::NoSpeech)
        }
    }

    struct StalledRecognizer;

    #[async_trait]
    impl SpeechRecognizer for StalledRecognizer {
        async fn recognize(&self) -> Result<String, SpeechError> {
            std::future::pending().await
        }
    }

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|part| part.to_string()).collect()
    }

    #[test]
    fn empty_argv_is_not_a_command() {
        assert!(SpeechCommand::from_argv(&[], "en-US").is_none());
        assert!(SpeechCommand::from_argv(&argv(&[" "]), "en-US").is_none());
        assert!(SpeechCommand::from_argv(&argv(&["whisper-once"]), "en-US").is_some());
    }

    #[test]
    fn outcomes_map_to_terminal_states() {
        assert_eq!(ListenOutcome::Completed("hi".into()).state(), ListenState::Completed);
        assert_eq!(ListenOutcome::Failed("x".into()).state(), ListenState::Failed);
        assert_eq!(ListenOutcome::TimedOut.state(), ListenState::TimedOut);
        assert!(!ListenOutcome::TimedOut.state().is_listening());
        assert!(ListenState::Listening.is_listening());
    }

    #[tokio::test]
    async fn listen_reports_each_terminal_outcome() {
        let timeout = Duration::from_millis(50);
        assert_eq!(
            listen(&FixedRecognizer(Ok("hello there")), timeout).await,
            ListenOutcome::Completed("hello there".into())
        );
        assert_eq!(
            listen(&FixedRecognizer(Err(())), timeout).await,
            ListenOutcome::Failed("no speech detected".into())
        );
        assert_eq!(listen(&StalledRecognizer, timeout).await, ListenOutcome::TimedOut);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn command_recognizer_returns_first_stdout_line() {
        let command = SpeechCommand::from_argv(
            &argv(&["sh", "-c", "printf \"\\n  $CHATLINE_SPEECH_LANG says hi  \\nsecond\\n\""]),
            "en-US",
        )
        .expect("command");
        let transcript = CommandRecognizer::new(command).recognize().await.expect("transcript");
        assert_eq!(transcript, "en-US says hi");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn command_recognizer_maps_failures() {
        let silent = SpeechCommand::from_argv(&argv(&["sh", "-c", "true"]), "en-US").unwrap();
        assert!(matches!(
            CommandRecognizer::new(silent).recognize().await,
            Err(SpeechError::NoSpeech)
        ));

        let failing = SpeechCommand::from_argv(&argv(&["sh", "-c", "exit 3"]), "en-US").unwrap();
        assert!(matches!(
            CommandRecognizer::new(failing).recognize().await,
            Err(SpeechError::Exited { .. })
        ));

        let missing =
            SpeechCommand::from_argv(&argv(&["/nonexistent/chatline-stt"]), "en-US").unwrap();
        assert!(matches!(
            CommandRecognizer::new(missing).recognize().await,
            Err(SpeechError::Spawn { .. })
        ));
    }
}
