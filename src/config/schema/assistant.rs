use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumString};

/// How the assistant command line reaches the OS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InvocationMode {
    /// Argument vector, no shell involved.
    #[default]
    Direct,
    /// One escaped command line run through `sh -c`.
    Shell,
}

/// Which mechanism carries conversation state between turns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContinuityMode {
    /// Prepend recent history to every query.
    #[default]
    History,
    /// Let the assistant keep its own conversation, addressed by handle.
    Handle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_program")]
    pub program: String,
    /// Arguments placed before the prompt on every invocation.
    #[serde(default)]
    pub base_args: Vec<String>,
    #[serde(default = "default_prompt_flag")]
    pub prompt_flag: String,
    #[serde(default = "default_new_session_flag")]
    pub new_session_flag: String,
    #[serde(default = "default_resume_flag")]
    pub resume_flag: String,
    #[serde(default = "default_output_format_flag")]
    pub output_format_flag: String,
    /// e.g. `"json"`; unset means plain text output.
    #[serde(default)]
    pub output_format: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub invocation: InvocationMode,
    #[serde(default)]
    pub continuity: ContinuityMode,
    /// Replay stored history into the first turn of a new external conversation.
    #[serde(default = "default_true")]
    pub replay_on_fresh_handle: bool,
    /// Extra environment for the assistant process.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

fn default_program() -> String {
    "claude".into()
}

fn default_prompt_flag() -> String {
    "-p".into()
}

fn default_new_session_flag() -> String {
    "--session-id".into()
}

fn default_resume_flag() -> String {
    "--resume".into()
}

fn default_output_format_flag() -> String {
    "--output-format".into()
}

fn default_timeout_ms() -> u64 {
    300_000
}

fn default_true() -> bool {
    true
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            base_args: Vec::new(),
            prompt_flag: default_prompt_flag(),
            new_session_flag: default_new_session_flag(),
            resume_flag: default_resume_flag(),
            output_format_flag: default_output_format_flag(),
            output_format: None,
            timeout_ms: default_timeout_ms(),
            invocation: InvocationMode::default(),
            continuity: ContinuityMode::default(),
            replay_on_fresh_handle: true,
            env: BTreeMap::new(),
        }
    }
}
