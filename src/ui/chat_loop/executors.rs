//! Background work requested by [`AppCommand`]s.
//!
//! Every task reports back only by dispatching an [`AppAction`]; none of them
//! touch the app state. All tasks stop at the next await point once the
//! session's cancellation token fires.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::app::{AppAction, AppActionDispatcher, AppCommand};
use crate::core::response_client::ResponseSource;
use crate::core::session::RequestId;
use crate::core::speech::{listen, ListenOutcome, SpeechRecognizer, SpeechSynthesizer};

#[derive(Clone)]
pub struct Services {
    pub responses: Arc<dyn ResponseSource>,
    pub recognizer: Option<Arc<dyn SpeechRecognizer>>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
}

pub struct CommandExecutor {
    services: Services,
    dispatcher: AppActionDispatcher,
    cancel_token: CancellationToken,
}

impl CommandExecutor {
    pub fn new(
        services: Services,
        dispatcher: AppActionDispatcher,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            services,
            dispatcher,
            cancel_token,
        }
    }

    pub fn execute(&self, command: AppCommand) {
        match command {
            AppCommand::SendPrompt { request_id, prompt } => self.spawn_prompt(request_id, prompt),
            AppCommand::Listen { timeout } => self.spawn_listen(timeout),
            AppCommand::ScheduleVoiceSubmit { delay } => self.schedule_voice_submit(delay),
            AppCommand::Speak { text } => self.services.synthesizer.speak(&text),
        }
    }

    fn spawn_prompt(&self, request_id: RequestId, prompt: String) {
        let source = self.services.responses.clone();
        let dispatcher = self.dispatcher.clone();
        let cancel_token = self.cancel_token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    debug!(request_id = request_id.get(), "Prompt cancelled");
                }
                reply = source.fetch_response(&prompt) => {
                    dispatcher.dispatch(AppAction::ResponseReceived { request_id, reply });
                }
            }
        });
    }

    fn spawn_listen(&self, timeout: Duration) {
        let Some(recognizer) = self.services.recognizer.clone() else {
            self.dispatcher.dispatch(AppAction::ListenFinished {
                outcome: ListenOutcome::Failed("no speech recognizer configured".to_string()),
            });
            return;
        };
        let dispatcher = self.dispatcher.clone();
        let cancel_token = self.cancel_token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel_token.cancelled() => {}
                outcome = listen(recognizer.as_ref(), timeout) => {
                    dispatcher.dispatch(AppAction::ListenFinished { outcome });
                }
            }
        });
    }

    fn schedule_voice_submit(&self, delay: Duration) {
        let dispatcher = self.dispatcher.clone();
        let cancel_token = self.cancel_token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel_token.cancelled() => {}
                _ = tokio::time::sleep(delay) => dispatcher.dispatch(AppAction::SubmitDraft),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::AppActionEnvelope;
    use crate::core::speech::{SilentSynthesizer, SpeechError};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    struct EchoSource;

    #[async_trait]
    impl ResponseSource for EchoSource {
        async fn fetch_response(&self, prompt: &str) -> String {
            format!("echo: {prompt}")
        }
    }

    struct NeverSource;

    #[async_trait]
    impl ResponseSource for NeverSource {
        async fn fetch_response(&self, _prompt: &str) -> String {
            std::future::pending::<String>().await
        }
    }

    struct FixedRecognizer;

    #[async_trait]
    impl SpeechRecognizer for FixedRecognizer {
        async fn recognize(&self) -> Result<String, SpeechError> {
            Ok("hello there".to_string())
        }
    }

    #[derive(Default)]
    struct RecordingSynthesizer {
        spoken: Mutex<Vec<String>>,
    }

    impl SpeechSynthesizer for RecordingSynthesizer {
        fn speak(&self, text: &str) {
            self.spoken.lock().unwrap().push(text.to_string());
        }
    }

    fn executor(
        responses: Arc<dyn ResponseSource>,
        recognizer: Option<Arc<dyn SpeechRecognizer>>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> (
        CommandExecutor,
        mpsc::UnboundedReceiver<AppActionEnvelope>,
        CancellationToken,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();
        let services = Services {
            responses,
            recognizer,
            synthesizer,
        };
        (
            CommandExecutor::new(services, AppActionDispatcher::new(tx), token.clone()),
            rx,
            token,
        )
    }

    async fn next_action(rx: &mut mpsc::UnboundedReceiver<AppActionEnvelope>) -> AppAction {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("action within timeout")
            .expect("channel open")
            .action
    }

    #[tokio::test]
    async fn prompt_reply_comes_back_with_its_request_id() {
        let (executor, mut rx, _token) =
            executor(Arc::new(EchoSource), None, Arc::new(SilentSynthesizer));
        let mut session = crate::core::session::SessionState::default();
        let crate::core::session::SubmitOutcome::Started { request_id, prompt } =
            session.submit("ping")
        else {
            panic!("submit should start");
        };

        executor.execute(AppCommand::SendPrompt { request_id, prompt });

        match next_action(&mut rx).await {
            AppAction::ResponseReceived {
                request_id: got,
                reply,
            } => {
                assert_eq!(got, request_id);
                assert_eq!(reply, "echo: ping");
            }
            _ => panic!("expected ResponseReceived"),
        }
    }

    #[tokio::test]
    async fn listen_without_recognizer_fails_immediately() {
        let (executor, mut rx, _token) =
            executor(Arc::new(EchoSource), None, Arc::new(SilentSynthesizer));

        executor.execute(AppCommand::Listen {
            timeout: Duration::from_secs(1),
        });

        assert!(matches!(
            next_action(&mut rx).await,
            AppAction::ListenFinished {
                outcome: ListenOutcome::Failed(_)
            }
        ));
    }

    #[tokio::test]
    async fn listen_reports_transcript() {
        let (executor, mut rx, _token) = executor(
            Arc::new(EchoSource),
            Some(Arc::new(FixedRecognizer)),
            Arc::new(SilentSynthesizer),
        );

        executor.execute(AppCommand::Listen {
            timeout: Duration::from_secs(1),
        });

        match next_action(&mut rx).await {
            AppAction::ListenFinished {
                outcome: ListenOutcome::Completed(text),
            } => assert_eq!(text, "hello there"),
            _ => panic!("expected completed listen"),
        }
    }

    #[tokio::test]
    async fn voice_submit_fires_after_delay() {
        let (executor, mut rx, _token) =
            executor(Arc::new(EchoSource), None, Arc::new(SilentSynthesizer));

        executor.execute(AppCommand::ScheduleVoiceSubmit {
            delay: Duration::from_millis(20),
        });

        assert!(matches!(next_action(&mut rx).await, AppAction::SubmitDraft));
    }

    #[tokio::test]
    async fn cancelled_tasks_dispatch_nothing() {
        let (executor, mut rx, token) =
            executor(Arc::new(NeverSource), None, Arc::new(SilentSynthesizer));
        let mut session = crate::core::session::SessionState::default();
        let crate::core::session::SubmitOutcome::Started { request_id, prompt } =
            session.submit("ping")
        else {
            panic!("submit should start");
        };

        executor.execute(AppCommand::SendPrompt { request_id, prompt });
        executor.execute(AppCommand::ScheduleVoiceSubmit {
            delay: Duration::from_millis(20),
        });
        token.cancel();

        let waited = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
        assert!(waited.is_err(), "no action expected after cancellation");
    }

    #[tokio::test]
    async fn speak_goes_straight_to_the_synthesizer() {
        let synthesizer = Arc::new(RecordingSynthesizer::default());
        let (executor, _rx, _token) = executor(Arc::new(EchoSource), None, synthesizer.clone());

        executor.execute(AppCommand::Speak {
            text: "Hello!".to_string(),
        });

        assert_eq!(*synthesizer.spoken.lock().unwrap(), vec!["Hello!".to_string()]);
    }
}
