use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    /// Label used when replaying history to the assistant.
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

/// One role-tagged half of a chat turn. Never edited after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Full stored conversation state for one user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            messages: Vec::new(),
            created_at: now,
            last_activity_at: now,
        }
    }

    /// Append `message` and drop the oldest entries beyond `max_messages`.
    ///
    /// Returns how many messages were evicted.
    pub fn push_bounded(&mut self, message: Message, max_messages: usize) -> usize {
        self.last_activity_at = message.timestamp;
        self.messages.push(message);
        self.truncate_to(max_messages)
    }

    /// Drop the oldest messages until at most `max_messages` remain.
    ///
    /// Returns how many messages were evicted.
    pub fn truncate_to(&mut self, max_messages: usize) -> usize {
        let overflow = self.messages.len().saturating_sub(max_messages);
        if overflow > 0 {
            self.messages.drain(..overflow);
        }
        overflow
    }

    /// The most recent `last_n` messages, oldest first.
    pub fn recent(&self, last_n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(last_n);
        &self.messages[start..]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_sessions: usize,
    pub total_messages: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionBackend {
    #[default]
    Json,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub backend: SessionBackend,
    /// Directory holding one JSON record per user (json backend).
    #[serde(default)]
    pub sessions_dir: Option<PathBuf>,
    /// SQLite database file (sqlite backend).
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    #[serde(default = "default_max_messages_per_session")]
    pub max_messages_per_session: usize,
    /// Number of recent messages replayed as context.
    #[serde(default = "default_context_turns")]
    pub context_turns: usize,
}

fn default_max_messages_per_session() -> usize {
    50
}

fn default_context_turns() -> usize {
    10
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SessionBackend::default(),
            sessions_dir: None,
            database_path: None,
            max_messages_per_session: default_max_messages_per_session(),
            context_turns: default_context_turns(),
        }
    }
}
