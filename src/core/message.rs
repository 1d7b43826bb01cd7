use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Assistant message every fresh conversation opens with.
pub const GREETING: &str = "Hello! How can I assist you today?";

/// Title used when a conversation has no text to derive one from.
pub const UNTITLED_CONVERSATION: &str = "New Chat";

/// Number of characters kept when deriving a conversation title.
pub const TITLE_CHAR_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    pub fn is_user(self) -> bool {
        self == Role::User
    }

    pub fn is_assistant(self) -> bool {
        self == Role::Assistant
    }
}

impl TryFrom<&str> for Role {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            _ => Err(format!("invalid message role: {value}")),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    pub fn greeting() -> Self {
        Self::assistant(GREETING)
    }

    pub fn is_user(&self) -> bool {
        self.role.is_user()
    }

    pub fn is_assistant(&self) -> bool {
        self.role.is_assistant()
    }
}

/// A saved snapshot of a finished conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub title: String,
    pub history: Vec<Message>,
    pub saved_at: DateTime<Local>,
}

impl Conversation {
    pub fn from_history(history: Vec<Message>) -> Self {
        Self {
            title: derive_title(&history),
            history,
            saved_at: Local::now(),
        }
    }
}

/// Title is the first [`TITLE_CHAR_LIMIT`] characters of the first message,
/// as written. Empty text becomes [`UNTITLED_CONVERSATION`].
pub fn derive_title(history: &[Message]) -> String {
    let title: String = history
        .first()
        .map(|message| message.text.chars().take(TITLE_CHAR_LIMIT).collect())
        .unwrap_or_default();

    if title.is_empty() {
        return UNTITLED_CONVERSATION.to_string();
    }
    title
}
