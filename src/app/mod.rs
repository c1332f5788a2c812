pub mod dispatch;

use anyhow::{Context, Result, bail};
use relaybridge::Config;
use relaybridge::assistant::AssistantExecutor;
use relaybridge::frontend::ChatFrontend;
use relaybridge::session::SessionManager;
use std::sync::Arc;

/// Everything a subcommand needs, wired once from config.
pub struct Runtime {
    pub config: Config,
    pub sessions: Arc<SessionManager>,
    pub executor: Arc<AssistantExecutor>,
    pub frontend: ChatFrontend,
}

impl Runtime {
    pub async fn build(config: Config) -> Result<Self> {
        let executor = Arc::new(
            AssistantExecutor::from_config(&config)
                .await
                .context("Failed to start assistant executor")?,
        );
        let sessions = Arc::clone(executor.sessions());
        let frontend = ChatFrontend::new(Arc::clone(&executor), config.frontend.clone());

        Ok(Self {
            config,
            sessions,
            executor,
            frontend,
        })
    }

    /// Explicit user, else the first allowed sender.
    pub fn resolve_user(&self, user: Option<String>) -> Result<String> {
        if let Some(user) = user.filter(|user| !user.trim().is_empty()) {
            return Ok(user);
        }
        match self.config.frontend.allowed_users.first() {
            Some(first) => Ok(first.clone()),
            None => bail!(
                "No user given and frontend.allowed_users is empty; pass --user or edit {}",
                self.config.config_path.display()
            ),
        }
    }
}
