use super::store::SessionStore;
use super::types::{Message, MessageRole, Session, SessionConfig, SessionStats};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

const CONTEXT_HEADER: &str = "Previous conversation:";
const CONTEXT_TRAILER: &str = "\n\nCurrent query:";

/// Owns the live per-user sessions and keeps the durable copy in step.
///
/// Storage failures are logged and swallowed; the in-memory map stays the
/// source of truth for the rest of the process lifetime.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    config: SessionConfig,
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionManager {
    /// Build a manager seeded with every record the store can read.
    ///
    /// Loaded sessions are cut down to the current `max_messages_per_session`.
    pub async fn load(store: Arc<dyn SessionStore>, config: SessionConfig) -> Self {
        let mut sessions = match store.load_all().await {
            Ok(sessions) => {
                tracing::info!(
                    backend = store.name(),
                    sessions = sessions.len(),
                    "session.load"
                );
                sessions
            }
            Err(error) => {
                tracing::warn!(backend = store.name(), "failed to load sessions: {error}");
                HashMap::new()
            }
        };

        for (user_id, session) in &mut sessions {
            let evicted = session.truncate_to(config.max_messages_per_session);
            if evicted > 0 {
                tracing::debug!(user_id, evicted, "session.truncate");
            }
        }

        Self {
            store,
            config,
            sessions: Mutex::new(sessions),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Get the live session for `user_id`, creating and persisting an empty one if needed.
    pub async fn get_or_create(&self, user_id: &str) -> Session {
        let mut sessions = self.sessions.lock().await;
        if let Some(existing) = sessions.get(user_id) {
            return existing.clone();
        }

        let session = Session::new(user_id);
        sessions.insert(user_id.to_string(), session.clone());
        self.persist(&session).await;
        session
    }

    /// Append one message, enforce the history bound, and persist.
    pub async fn append_message(&self, user_id: &str, role: MessageRole, content: &str) {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .entry(user_id.to_string())
            .or_insert_with(|| Session::new(user_id));

        let evicted = session.push_bounded(
            Message::new(role, content),
            self.config.max_messages_per_session,
        );
        if evicted > 0 {
            tracing::debug!(user_id, evicted, "session.truncate");
        }

        let snapshot = session.clone();
        self.persist(&snapshot).await;
    }

    /// All messages, or only the most recent `last_n`, oldest first.
    pub async fn get_history(&self, user_id: &str, last_n: Option<usize>) -> Vec<Message> {
        let sessions = self.sessions.lock().await;
        let Some(session) = sessions.get(user_id) else {
            return Vec::new();
        };
        match last_n {
            Some(n) => session.recent(n).to_vec(),
            None => session.messages.clone(),
        }
    }

    /// Render recent history as a preamble for the next query.
    ///
    /// Returns an empty string when there is nothing to replay.
    pub async fn build_context(&self, user_id: &str, last_n: usize) -> String {
        let history = self.get_history(user_id, Some(last_n)).await;
        render_context(&history)
    }

    /// Drop the live session and its durable record.
    pub async fn clear(&self, user_id: &str) {
        let mut sessions = self.sessions.lock().await;
        let removed = sessions.remove(user_id);
        if let Err(error) = self.store.delete(user_id).await {
            tracing::warn!(user_id, "failed to delete session record: {error}");
        }
        tracing::info!(
            user_id,
            messages = removed.map_or(0, |session| session.messages.len()),
            "session.clear"
        );
    }

    pub async fn stats(&self) -> SessionStats {
        let sessions = self.sessions.lock().await;
        SessionStats {
            total_sessions: sessions.len(),
            total_messages: sessions.values().map(|session| session.messages.len()).sum(),
        }
    }

    async fn persist(&self, session: &Session) {
        if let Err(error) = self.store.save(session).await {
            tracing::warn!(
                user_id = %session.user_id,
                backend = self.store.name(),
                "failed to persist session: {error}"
            );
        }
    }
}

pub fn render_context(history: &[Message]) -> String {
    if history.is_empty() {
        return String::new();
    }

    let turns = history
        .iter()
        .map(|message| format!("{}: {}", message.role.label(), message.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{CONTEXT_HEADER}\n{turns}{CONTEXT_TRAILER}")
}
