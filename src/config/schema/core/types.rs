use super::super::{AssistantConfig, FrontendConfig, LoggingConfig, UtilitiesConfig};
use crate::error::ConfigError;
use crate::session::SessionConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding config.toml and default state - computed from home, not serialized
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    /// Working directory for the assistant. Supports `~`.
    #[serde(default)]
    pub workspace_dir: Option<String>,

    #[serde(default)]
    pub assistant: AssistantConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub utilities: UtilitiesConfig,

    #[serde(default)]
    pub frontend: FrontendConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".relaybridge"),
            config_path: PathBuf::from(".relaybridge").join("config.toml"),
            workspace_dir: None,
            assistant: AssistantConfig::default(),
            session: SessionConfig::default(),
            utilities: UtilitiesConfig::default(),
            frontend: FrontendConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Resolved assistant working directory.
    pub fn workspace_path(&self) -> PathBuf {
        match &self.workspace_dir {
            Some(raw) if !raw.trim().is_empty() => {
                PathBuf::from(shellexpand::tilde(raw.trim()).into_owned())
            }
            _ => self.data_dir.join("workspace"),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.assistant.program.trim().is_empty() {
            return Err(ConfigError::Validation(
                "assistant.program must not be empty".into(),
            ));
        }
        if self.assistant.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "assistant.timeout_ms must be greater than 0".into(),
            ));
        }
        if self.utilities.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "utilities.timeout_ms must be greater than 0".into(),
            ));
        }
        if self.session.max_messages_per_session == 0 {
            return Err(ConfigError::Validation(
                "session.max_messages_per_session must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
