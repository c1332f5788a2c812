use super::command::AssistantCommand;
use super::continuity::{ContinuityStrategy, create_strategy};
use super::locks::TurnLocks;
use super::response::{QueryResult, extract_payload};
use super::utilities::HostUtilities;
use crate::config::Config;
use crate::process::ProcessInvoker;
use crate::session::{MessageRole, SessionManager, SessionStats, open_store};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Runs assistant turns for chat users and keeps their sessions in step.
///
/// Turns for one user are serialized; different users run concurrently.
/// Invocation failures come back as a failed [`QueryResult`] and leave both
/// history and continuity state untouched.
pub struct AssistantExecutor {
    invoker: ProcessInvoker,
    command: AssistantCommand,
    continuity: Box<dyn ContinuityStrategy>,
    sessions: Arc<SessionManager>,
    utilities: HostUtilities,
    locks: TurnLocks,
    workspace_dir: PathBuf,
}

impl AssistantExecutor {
    pub fn new(config: &Config, sessions: Arc<SessionManager>) -> Self {
        let invoker = ProcessInvoker::new();
        let continuity = create_strategy(&config.assistant, Arc::clone(&sessions));
        tracing::info!(
            program = %config.assistant.program,
            continuity = continuity.name(),
            invocation = %config.assistant.invocation,
            "executor.init"
        );

        Self {
            invoker: invoker.clone(),
            command: AssistantCommand::new(config.assistant.clone()),
            continuity,
            sessions,
            utilities: HostUtilities::new(invoker, config.utilities.clone()),
            locks: TurnLocks::new(),
            workspace_dir: config.workspace_path(),
        }
    }

    /// Open the configured session store, seed the manager from it, and build the executor.
    pub async fn from_config(config: &Config) -> crate::Result<Self> {
        config.validate()?;
        let store = open_store(&config.session, &config.data_dir).await?;
        let sessions = SessionManager::load(store, config.session.clone()).await;
        Ok(Self::new(config, Arc::new(sessions)))
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    pub fn continuity(&self) -> &dyn ContinuityStrategy {
        self.continuity.as_ref()
    }

    pub fn workspace_dir(&self) -> &Path {
        &self.workspace_dir
    }

    pub async fn execute_query(&self, text: &str, user_id: &str) -> QueryResult {
        if text.trim().is_empty() {
            return QueryResult::failed("empty query", "");
        }

        let lock = self.locks.for_user(user_id);
        let _turn = lock.lock().await;
        let started = Instant::now();

        let turn = self.continuity.prepare(user_id, text).await;
        tracing::info!(
            user_id,
            handle = turn.conversation.handle().unwrap_or("-"),
            "turn.start"
        );

        let invocation = self
            .command
            .build(&turn.prompt, &turn.conversation, &self.workspace_dir);
        tracing::debug!(user_id, command = %invocation.display(), "turn.command");

        let output = match self.invoker.run(&invocation).await {
            Ok(output) => output,
            Err(error) => {
                tracing::warn!(
                    user_id,
                    duration_ms = elapsed_ms(started),
                    "assistant invocation failed: {error}"
                );
                return QueryResult::from_process_error(&error);
            }
        };

        let payload = match extract_payload(&output.stdout, &output.stderr) {
            Ok(payload) => payload,
            Err(message) => {
                tracing::warn!(user_id, "assistant reported an error: {message}");
                return QueryResult::failed(message, "");
            }
        };

        self.continuity.commit(user_id, &turn);
        self.sessions
            .append_message(user_id, MessageRole::User, text)
            .await;
        self.sessions
            .append_message(user_id, MessageRole::Assistant, &payload)
            .await;

        tracing::info!(
            user_id,
            duration_ms = elapsed_ms(started),
            exit_code = ?output.exit_code,
            output_len = payload.len(),
            "turn.end"
        );
        QueryResult::ok(payload)
    }

    /// Forget the user's continuity state and stored history.
    pub async fn clear_session(&self, user_id: &str) {
        let lock = self.locks.for_user(user_id);
        let turn = lock.lock().await;
        self.continuity.forget(user_id);
        self.sessions.clear(user_id).await;
        drop(turn);
        self.locks.release(user_id, &lock);
    }

    pub async fn stats(&self) -> SessionStats {
        self.sessions.stats().await
    }

    pub async fn system_stats(&self) -> QueryResult {
        self.utilities.system_stats().await
    }

    pub async fn tail_logs(&self, lines: usize) -> QueryResult {
        self.utilities.tail_logs(lines).await
    }

    pub async fn check_processes(&self, pattern: &str) -> QueryResult {
        self.utilities.check_processes(pattern).await
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
