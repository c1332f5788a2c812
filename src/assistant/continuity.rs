//! Conversation continuity strategies.
//!
//! Exactly one strategy is active per executor. History replay rebuilds context
//! from stored messages on every turn; external handles let the assistant keep
//! its own conversation and only ever see the new query once resumed.

use crate::config::{AssistantConfig, ContinuityMode};
use crate::session::SessionManager;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// How the assistant should treat its own conversation state for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversation {
    /// No external conversation; all context is in the prompt.
    Stateless,
    /// Begin a new external conversation tagged with this handle.
    Start(String),
    /// Continue the external conversation with this handle.
    Resume(String),
}

impl Conversation {
    pub fn handle(&self) -> Option<&str> {
        match self {
            Self::Stateless => None,
            Self::Start(handle) | Self::Resume(handle) => Some(handle),
        }
    }
}

/// Everything the executor needs to invoke the assistant for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTurn {
    pub prompt: String,
    pub conversation: Conversation,
}

pub trait ContinuityStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// Build the prompt and conversation directive for `query`.
    fn prepare<'a>(
        &'a self,
        user_id: &'a str,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = PreparedTurn> + Send + 'a>>;

    /// Record that `turn` succeeded.
    fn commit(&self, user_id: &str, turn: &PreparedTurn);

    /// Drop any continuity state held for `user_id`.
    fn forget(&self, user_id: &str);

    /// Handle currently held for `user_id`, if this strategy keeps one.
    fn current_handle(&self, _user_id: &str) -> Option<String> {
        None
    }
}

pub fn create_strategy(
    config: &AssistantConfig,
    sessions: Arc<SessionManager>,
) -> Box<dyn ContinuityStrategy> {
    let context_turns = sessions.config().context_turns;
    match config.continuity {
        ContinuityMode::History => Box::new(HistoryReplay::new(sessions, context_turns)),
        ContinuityMode::Handle => {
            let replay = config.replay_on_fresh_handle.then_some(sessions);
            Box::new(ExternalHandle::new(replay, context_turns))
        }
    }
}

fn with_context(context: &str, query: &str) -> String {
    if context.is_empty() {
        query.to_string()
    } else {
        format!("{context}\n{query}")
    }
}

/// Prepends recent stored history to every query.
pub struct HistoryReplay {
    sessions: Arc<SessionManager>,
    context_turns: usize,
}

impl HistoryReplay {
    pub fn new(sessions: Arc<SessionManager>, context_turns: usize) -> Self {
        Self {
            sessions,
            context_turns,
        }
    }
}

impl ContinuityStrategy for HistoryReplay {
    fn name(&self) -> &str {
        "history"
    }

    fn prepare<'a>(
        &'a self,
        user_id: &'a str,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = PreparedTurn> + Send + 'a>> {
        Box::pin(async move {
            let context = self
                .sessions
                .build_context(user_id, self.context_turns)
                .await;
            PreparedTurn {
                prompt: with_context(&context, query),
                conversation: Conversation::Stateless,
            }
        })
    }

    fn commit(&self, _user_id: &str, _turn: &PreparedTurn) {}

    fn forget(&self, _user_id: &str) {}
}

/// Tracks one opaque assistant-side conversation handle per user.
///
/// Handles live only in memory. After a restart every user is fresh again,
/// and stored history can be replayed into the first turn of the new
/// conversation so nothing is lost.
pub struct ExternalHandle {
    handles: Mutex<HashMap<String, String>>,
    replay: Option<Arc<SessionManager>>,
    context_turns: usize,
}

impl ExternalHandle {
    pub fn new(replay: Option<Arc<SessionManager>>, context_turns: usize) -> Self {
        Self {
            handles: Mutex::new(HashMap::new()),
            replay,
            context_turns,
        }
    }

    fn lock_handles(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.handles
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ContinuityStrategy for ExternalHandle {
    fn name(&self) -> &str {
        "handle"
    }

    fn prepare<'a>(
        &'a self,
        user_id: &'a str,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = PreparedTurn> + Send + 'a>> {
        Box::pin(async move {
            if let Some(handle) = self.current_handle(user_id) {
                tracing::info!(user_id, handle = %handle, "continuity.resume");
                return PreparedTurn {
                    prompt: query.to_string(),
                    conversation: Conversation::Resume(handle),
                };
            }

            let handle = Uuid::new_v4().to_string();
            tracing::info!(user_id, handle = %handle, "continuity.start");
            let prompt = match &self.replay {
                Some(sessions) => {
                    let context = sessions.build_context(user_id, self.context_turns).await;
                    with_context(&context, query)
                }
                None => query.to_string(),
            };
            PreparedTurn {
                prompt,
                conversation: Conversation::Start(handle),
            }
        })
    }

    fn commit(&self, user_id: &str, turn: &PreparedTurn) {
        if let Conversation::Start(handle) = &turn.conversation {
            self.lock_handles()
                .insert(user_id.to_string(), handle.clone());
        }
    }

    fn forget(&self, user_id: &str) {
        if let Some(handle) = self.lock_handles().remove(user_id) {
            tracing::info!(user_id, handle = %handle, "continuity.forget");
        }
    }

    fn current_handle(&self, user_id: &str) -> Option<String> {
        self.lock_handles().get(user_id).cloned()
    }
}
