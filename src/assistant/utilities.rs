//! Host utilities exposed next to assistant queries. They share the process
//! invoker but never touch session state.

use super::response::QueryResult;
use crate::config::UtilitiesConfig;
use crate::error::ProcessError;
use crate::process::{Invocation, ProcessInvoker};
use std::path::Path;
use std::time::Duration;

pub const MAX_LOG_LINES: usize = 500;
const NO_MATCHES: &str = "no matching processes";

pub struct HostUtilities {
    invoker: ProcessInvoker,
    config: UtilitiesConfig,
}

impl HostUtilities {
    pub fn new(invoker: ProcessInvoker, config: UtilitiesConfig) -> Self {
        Self { invoker, config }
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.config.timeout_ms)
    }

    fn invocation(&self, argv: &[String]) -> Option<Invocation> {
        let (program, args) = argv.split_first()?;
        Some(Invocation::new(program, self.timeout()).args(args.iter().cloned()))
    }

    /// Run each configured stat command in order and stitch the sections together.
    pub async fn system_stats(&self) -> QueryResult {
        if self.config.stat_commands.is_empty() {
            return QueryResult::ok("no system stat commands configured");
        }

        let mut sections = Vec::with_capacity(self.config.stat_commands.len());
        for argv in &self.config.stat_commands {
            let Some(invocation) = self.invocation(argv) else {
                continue;
            };
            let body = match self.invoker.run(&invocation).await {
                Ok(output) => output.stdout.trim().to_string(),
                Err(error) => {
                    tracing::debug!(command = %invocation.display(), "stat command failed: {error}");
                    format!("unavailable: {error}")
                }
            };
            sections.push(format!("=== {} ===\n{body}", invocation.display()));
        }

        QueryResult::ok(sections.join("\n\n"))
    }

    /// Last `lines` lines of the configured log file, clamped to `1..=500`.
    pub async fn tail_logs(&self, lines: usize) -> QueryResult {
        let Some(log_file) = &self.config.log_file else {
            return QueryResult::failed("no log file configured (utilities.log_file)", "");
        };
        let lines = clamp_lines(lines);
        let invocation = tail_invocation(log_file, lines, self.timeout());
        match self.invoker.run(&invocation).await {
            Ok(output) => QueryResult::ok(output.stdout.trim_end()),
            Err(error) => QueryResult::from_process_error(&error),
        }
    }

    /// Processes whose command line matches `pattern`.
    pub async fn check_processes(&self, pattern: &str) -> QueryResult {
        let pattern = if pattern.trim().is_empty() {
            self.config.default_process_pattern.as_str()
        } else {
            pattern.trim()
        };
        let invocation = Invocation::new("pgrep", self.timeout())
            .arg("-af")
            .arg(pattern);
        match self.invoker.run(&invocation).await {
            Ok(output) if output.stdout.trim().is_empty() => QueryResult::ok(NO_MATCHES),
            Ok(output) => QueryResult::ok(output.stdout.trim_end()),
            Err(ProcessError::Exit { code: Some(1), .. }) => QueryResult::ok(NO_MATCHES),
            Err(error) => QueryResult::from_process_error(&error),
        }
    }
}

pub fn clamp_lines(lines: usize) -> usize {
    lines.clamp(1, MAX_LOG_LINES)
}

fn tail_invocation(log_file: &Path, lines: usize, timeout: Duration) -> Invocation {
    Invocation::new("tail", timeout)
        .arg("-n")
        .arg(lines.to_string())
        .arg(log_file.to_string_lossy())
}
