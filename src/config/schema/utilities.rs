use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtilitiesConfig {
    #[serde(default = "default_utility_timeout_ms")]
    pub timeout_ms: u64,
    /// Commands run in order by the system stats report, each as an argument vector.
    #[serde(default = "default_stat_commands")]
    pub stat_commands: Vec<Vec<String>>,
    /// File tailed by the log utility.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default = "default_process_pattern")]
    pub default_process_pattern: String,
}

fn default_utility_timeout_ms() -> u64 {
    10_000
}

fn default_stat_commands() -> Vec<Vec<String>> {
    [
        vec!["uptime"],
        vec!["free", "-h"],
        vec!["df", "-h", "/"],
        vec![
            "nvidia-smi",
            "--query-gpu=name,utilization.gpu,memory.used,memory.total,temperature.gpu",
            "--format=csv",
        ],
    ]
    .into_iter()
    .map(|argv| argv.into_iter().map(String::from).collect())
    .collect()
}

fn default_process_pattern() -> String {
    "claude".into()
}

impl Default for UtilitiesConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_utility_timeout_ms(),
            stat_commands: default_stat_commands(),
            log_file: None,
            default_process_pattern: default_process_pattern(),
        }
    }
}
