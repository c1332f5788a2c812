use super::Config;
use crate::config::ContinuityMode;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(workspace) = std::env::var("RELAYBRIDGE_WORKSPACE")
            && !workspace.is_empty()
        {
            self.workspace_dir = Some(workspace);
        }

        if let Ok(program) = std::env::var("RELAYBRIDGE_ASSISTANT")
            && !program.is_empty()
        {
            self.assistant.program = program;
        }

        if let Ok(timeout_str) = std::env::var("RELAYBRIDGE_TIMEOUT_MS")
            && let Ok(timeout_ms) = timeout_str.parse::<u64>()
            && timeout_ms > 0
        {
            self.assistant.timeout_ms = timeout_ms;
        }

        if let Ok(users) = std::env::var("RELAYBRIDGE_ALLOWED_USERS")
            && !users.trim().is_empty()
        {
            self.frontend.allowed_users = users
                .split(',')
                .map(str::trim)
                .filter(|user| !user.is_empty())
                .map(String::from)
                .collect();
        }

        if let Ok(mode) = std::env::var("RELAYBRIDGE_CONTINUITY")
            && let Ok(mode) = mode.parse::<ContinuityMode>()
        {
            self.assistant.continuity = mode;
        }

        if let Ok(level) = std::env::var("RELAYBRIDGE_LOG")
            && !level.is_empty()
        {
            self.logging.level = level;
        }
    }
}
