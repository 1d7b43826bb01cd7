//! The conversation store: every piece of mutable chat state and the
//! operations allowed to change it.
//!
//! A turn moves `Idle → Sending → Idle`. Failed replies are ordinary assistant
//! messages, so there is no error state. At most one request is in flight; a
//! second submit while one is pending is rejected here rather than left to the
//! view to prevent.

use crate::core::message::{Conversation, Message};
use crate::core::speech::{ListenOutcome, ListenState};
use crate::core::transcript::format_transcript;

/// Identifies one outstanding request so late replies can be matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; nothing changed.
    Ignored,
    /// A request is already pending; nothing changed.
    Busy,
    /// The user message was appended and `prompt` must be sent.
    Started { request_id: RequestId, prompt: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewConversationOutcome {
    Started,
    NeedsUserMessage,
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenRequest {
    Start,
    AlreadyListening,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    active_history: Vec<Message>,
    saved_conversations: Vec<Conversation>,
    pending_request: Option<RequestId>,
    next_request_id: u64,
    pub draft_input: String,
    pub sidebar_visible: bool,
    pub dark_theme: bool,
    listen_state: ListenState,
}

impl SessionState {
    pub fn new(dark_theme: bool) -> Self {
        Self {
            active_history: vec![Message::greeting()],
            saved_conversations: Vec::new(),
            pending_request: None,
            next_request_id: 0,
            draft_input: String::new(),
            sidebar_visible: true,
            dark_theme,
            listen_state: ListenState::Idle,
        }
    }

    pub fn active_history(&self) -> &[Message] {
        &self.active_history
    }

    pub fn saved_conversations(&self) -> &[Conversation] {
        &self.saved_conversations
    }

    pub fn pending_request(&self) -> bool {
        self.pending_request.is_some()
    }

    pub fn listen_state(&self) -> ListenState {
        self.listen_state
    }

    pub fn listening(&self) -> bool {
        self.listen_state.is_listening()
    }

    pub fn has_user_message(&self) -> bool {
        self.active_history.iter().any(Message::is_user)
    }

    pub fn last_assistant_text(&self) -> Option<&str> {
        self.active_history
            .iter()
            .rev()
            .find(|message| message.is_assistant())
            .map(|message| message.text.as_str())
    }

    /// Appends the user message and opens a request for the trimmed prompt.
    pub fn submit(&mut self, text: &str) -> SubmitOutcome {
        let prompt = text.trim();
        if prompt.is_empty() {
            return SubmitOutcome::Ignored;
        }
        if self.pending_request.is_some() {
            return SubmitOutcome::Busy;
        }

        self.next_request_id += 1;
        let request_id = RequestId(self.next_request_id);
        self.active_history.push(Message::user(text));
        self.pending_request = Some(request_id);

        SubmitOutcome::Started {
            request_id,
            prompt: prompt.to_string(),
        }
    }

    /// Submits the current draft as if it had been typed.
    pub fn submit_draft(&mut self) -> SubmitOutcome {
        let draft = self.draft_input.clone();
        self.submit(&draft)
    }

    /// Appends the reply for `request_id`. Replies for anything other than
    /// the pending request are dropped and `false` is returned.
    pub fn complete_submit(&mut self, request_id: RequestId, reply: impl Into<String>) -> bool {
        if self.pending_request != Some(request_id) {
            return false;
        }

        self.active_history.push(Message::assistant(reply));
        self.pending_request = None;
        self.draft_input.clear();
        true
    }

    /// Archives the active history and resets it to the greeting.
    pub fn start_new_conversation(&mut self) -> NewConversationOutcome {
        if !self.has_user_message() {
            return NewConversationOutcome::NeedsUserMessage;
        }
        if self.pending_request.is_some() {
            return NewConversationOutcome::Busy;
        }

        let history = std::mem::replace(&mut self.active_history, vec![Message::greeting()]);
        self.saved_conversations
            .insert(0, Conversation::from_history(history));
        NewConversationOutcome::Started
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_visible = !self.sidebar_visible;
        self.sidebar_visible
    }

    pub fn toggle_theme(&mut self) -> bool {
        self.dark_theme = !self.dark_theme;
        self.dark_theme
    }

    pub fn begin_listening(&mut self) -> ListenRequest {
        if self.listening() {
            return ListenRequest::AlreadyListening;
        }
        self.listen_state = ListenState::Listening;
        ListenRequest::Start
    }

    /// Records the end of a listen attempt. Returns the transcript only for a
    /// completed attempt that was actually in progress.
    pub fn finish_listening(&mut self, outcome: ListenOutcome) -> Option<String> {
        let was_listening = self.listening();
        self.listen_state = outcome.state();
        match outcome {
            ListenOutcome::Completed(transcript) if was_listening => Some(transcript),
            _ => None,
        }
    }

    /// Puts the formatted transcript in the draft. Returns `false` when the
    /// transcript formats to nothing and no submit should follow.
    pub fn submit_from_voice(&mut self, transcript: &str) -> bool {
        let formatted = format_transcript(transcript);
        if formatted.is_empty() {
            return false;
        }
        self.draft_input = formatted;
        true
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::{Role, GREETING};

    fn started(outcome: SubmitOutcome) -> (RequestId, String) {
        match outcome {
            SubmitOutcome::Started { request_id, prompt } => (request_id, prompt),
            other => panic!("expected a started submit, got {other:?}"),
        }
    }

    #[test]
    fn fresh_session_holds_only_the_greeting() {
        let session = SessionState::default();
        assert_eq!(session.active_history(), &[Message::assistant(GREETING)]);
        assert!(session.saved_conversations().is_empty());
        assert!(!session.pending_request());
        assert!(session.sidebar_visible);
        assert!(!session.listening());
    }

    #[test]
    fn submit_and_complete_adds_two_messages() {
        let mut session = SessionState::default();
        session.draft_input = "  What is Rust?  ".into();

        let (request_id, prompt) = started(session.submit_draft());
        assert_eq!(prompt, "What is Rust?");
        assert!(session.pending_request());
        assert_eq!(session.active_history().len(), 2);
        assert_eq!(session.active_history()[1], Message::user("  What is Rust?  "));

        assert!(session.complete_submit(request_id, "A language."));
        assert_eq!(session.active_history().len(), 3);
        assert_eq!(session.active_history()[2], Message::assistant("A language."));
        assert!(!session.pending_request());
        assert!(session.draft_input.is_empty());
    }

    #[test]
    fn blank_submit_is_a_noop() {
        let mut session = SessionState::default();
        for text in ["", "   ", "\n\t"] {
            assert_eq!(session.submit(text), SubmitOutcome::Ignored);
        }
        assert_eq!(session.active_history().len(), 1);
        assert!(!session.pending_request());
    }

    #[test]
    fn second_submit_while_pending_is_rejected() {
        let mut session = SessionState::default();
        let (first, _) = started(session.submit("one"));

        assert_eq!(session.submit("two"), SubmitOutcome::Busy);
        assert_eq!(session.active_history().len(), 2);

        assert!(session.complete_submit(first, "reply"));
        let (second, _) = started(session.submit("two"));
        assert_ne!(first, second);
    }

    #[test]
    fn stale_reply_is_dropped() {
        let mut session = SessionState::default();
        let (first, _) = started(session.submit("one"));
        assert!(session.complete_submit(first, "reply"));

        assert!(!session.complete_submit(first, "late duplicate"));
        assert_eq!(session.active_history().len(), 3);
    }

    #[test]
    fn new_conversation_requires_a_user_message() {
        let mut session = SessionState::default();
        assert_eq!(
            session.start_new_conversation(),
            NewConversationOutcome::NeedsUserMessage
        );
        assert!(session.saved_conversations().is_empty());
        assert_eq!(session.active_history(), &[Message::greeting()]);
    }

    #[test]
    fn new_conversation_archives_history_at_the_front() {
        let mut session = SessionState::default();
        let (id, _) = started(session.submit("first chat"));
        session.complete_submit(id, "answer one");
        let first_history = session.active_history().to_vec();
        assert_eq!(session.start_new_conversation(), NewConversationOutcome::Started);
        assert_eq!(session.active_history(), &[Message::greeting()]);

        let (id, _) = started(session.submit("second chat"));
        session.complete_submit(id, "answer two");
        let second_history = session.active_history().to_vec();
        assert_eq!(session.start_new_conversation(), NewConversationOutcome::Started);

        let saved = session.saved_conversations();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].history, second_history);
        assert_eq!(saved[0].title, "Hello! How can I ass");
        assert_eq!(saved[1].history, first_history);
    }

    #[test]
    fn new_conversation_waits_for_pending_reply() {
        let mut session = SessionState::default();
        let (id, _) = started(session.submit("hello"));

        assert_eq!(session.start_new_conversation(), NewConversationOutcome::Busy);
        assert_eq!(session.active_history().len(), 2);

        session.complete_submit(id, "hi");
        assert_eq!(session.start_new_conversation(), NewConversationOutcome::Started);
    }

    #[test]
    fn toggles_flip_flags() {
        let mut session = SessionState::new(false);
        assert!(session.toggle_theme());
        assert!(!session.toggle_theme());
        assert!(!session.toggle_sidebar());
        assert!(session.toggle_sidebar());
    }

    #[test]
    fn listen_lifecycle_delivers_transcript_once() {
        let mut session = SessionState::default();
        assert_eq!(session.begin_listening(), ListenRequest::Start);
        assert!(session.listening());
        assert_eq!(session.begin_listening(), ListenRequest::AlreadyListening);

        let transcript = session.finish_listening(ListenOutcome::Completed("hi".into()));
        assert_eq!(transcript.as_deref(), Some("hi"));
        assert_eq!(session.listen_state(), ListenState::Completed);
        assert!(!session.listening());

        // a second terminal outcome for the same attempt carries nothing
        assert_eq!(session.finish_listening(ListenOutcome::Completed("again".into())), None);
    }

    #[test]
    fn failed_and_timed_out_listens_clear_the_flag() {
        let mut session = SessionState::default();
        session.begin_listening();
        assert_eq!(session.finish_listening(ListenOutcome::Failed("mic".into())), None);
        assert_eq!(session.listen_state(), ListenState::Failed);

        session.begin_listening();
        assert_eq!(session.finish_listening(ListenOutcome::TimedOut), None);
        assert_eq!(session.listen_state(), ListenState::TimedOut);
        assert!(!session.listening());
    }

    #[test]
    fn voice_transcript_is_formatted_into_the_draft() {
        let mut session = SessionState::default();
        assert!(session.submit_from_voice(" what time is it "));
        assert_eq!(session.draft_input, "What time is it.");

        assert!(!session.submit_from_voice("   "));
        assert_eq!(session.draft_input, "What time is it.");
    }

    #[test]
    fn last_assistant_text_skips_user_messages() {
        let mut session = SessionState::default();
        session.submit("question");
        assert_eq!(session.last_assistant_text(), Some(GREETING));
        assert!(session.active_history().iter().any(|m| m.role == Role::User));
    }
}
