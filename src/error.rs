use std::time::Duration;
use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `relaybridge`.
///
/// Library callers can match on these to decide recovery strategy; the binary
/// and config loader keep using `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum RelayError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Session ─────────────────────────────────────────────────────────
    #[error("session: {0}")]
    Session(#[from] SessionError),

    // ── External process ────────────────────────────────────────────────
    #[error("process: {0}")]
    Process(#[from] ProcessError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validation failed: {0}")]
    Validation(String),
}

// ─── Session errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("store: {0}")]
    Store(String),

    #[error("corrupt session record {path}: {message}")]
    Corrupt { path: String, message: String },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),
}

// ─── Process errors ─────────────────────────────────────────────────────────

/// Failure of one external process invocation.
///
/// `Timeout` and `Exit` carry whatever the child managed to write before it
/// stopped so callers can surface partial output.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command timed out after {}ms and was killed", .timeout.as_millis())]
    Timeout {
        timeout: Duration,
        stdout: String,
        stderr: String,
    },

    #[error("command exited with {}{}", exit_label(.code), stderr_suffix(.stderr))]
    Exit {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("io while waiting for child: {0}")]
    Io(#[from] std::io::Error),
}

impl ProcessError {
    /// Standard output captured before the failure, if any.
    pub fn partial_stdout(&self) -> &str {
        match self {
            Self::Timeout { stdout, .. } | Self::Exit { stdout, .. } => stdout,
            Self::Spawn { .. } | Self::Io(_) => "",
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[allow(clippy::ref_option)]
fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, RelayError>;
