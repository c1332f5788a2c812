//! Chat front end: sender filtering, slash commands, and reply rendering on
//! top of the assistant executor.

use crate::assistant::{AssistantExecutor, QueryResult};
use crate::config::FrontendConfig;
use std::fmt::Write as _;
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

const DEFAULT_LOG_LINES: usize = 50;
const EMPTY_OUTPUT: &str = "✅ Command executed (no output)";

const HELP_TEXT: &str = "\
Send any message to ask the assistant. Commands:
/clear - forget this conversation
/stats - session totals
/sysinfo - host uptime, memory, disk and GPU
/logs [n] - last n log lines
/ps [pattern] - matching processes
/help - this text";

/// A parsed inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Help,
    Clear,
    Stats,
    SysInfo,
    Logs(usize),
    Processes(Option<String>),
    Query(String),
}

impl ChatCommand {
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Self::Query(trimmed.to_string());
        };

        let (head, arg) = rest
            .split_once(char::is_whitespace)
            .map_or((rest, ""), |(head, arg)| (head, arg.trim()));
        // Group chats address commands as `/cmd@botname`.
        let name = head.split('@').next().unwrap_or(head);

        match name {
            "start" | "help" => Self::Help,
            "clear" => Self::Clear,
            "stats" => Self::Stats,
            "sysinfo" => Self::SysInfo,
            "logs" => Self::Logs(arg.parse().unwrap_or(DEFAULT_LOG_LINES)),
            "ps" => Self::Processes((!arg.is_empty()).then(|| arg.to_string())),
            _ => Self::Query(trimmed.to_string()),
        }
    }
}

pub struct ChatFrontend {
    executor: Arc<AssistantExecutor>,
    config: FrontendConfig,
}

impl ChatFrontend {
    pub fn new(executor: Arc<AssistantExecutor>, config: FrontendConfig) -> Self {
        Self { executor, config }
    }

    pub fn executor(&self) -> &AssistantExecutor {
        &self.executor
    }

    /// Reply to one inbound message, or `None` for senders not on the allow-list.
    pub async fn handle(&self, sender: &str, text: &str) -> Option<String> {
        if !self.config.is_allowed(sender) {
            tracing::warn!(sender, "ignoring message from unauthorized sender");
            return None;
        }

        let reply = match ChatCommand::parse(text) {
            ChatCommand::Help => HELP_TEXT.to_string(),
            ChatCommand::Clear => {
                self.executor.clear_session(sender).await;
                "🗑️ Conversation cleared.".to_string()
            }
            ChatCommand::Stats => {
                let stats = self.executor.stats().await;
                format!(
                    "📊 Sessions: {}\n💬 Messages: {}",
                    stats.total_sessions, stats.total_messages
                )
            }
            ChatCommand::SysInfo => render(&self.executor.system_stats().await),
            ChatCommand::Logs(lines) => render(&self.executor.tail_logs(lines).await),
            ChatCommand::Processes(pattern) => render(
                &self
                    .executor
                    .check_processes(pattern.as_deref().unwrap_or_default())
                    .await,
            ),
            ChatCommand::Query(query) if query.is_empty() => HELP_TEXT.to_string(),
            ChatCommand::Query(query) => render(&self.executor.execute_query(&query, sender).await),
        };
        Some(reply)
    }
}

/// Text shown to the user for one result.
pub fn render(result: &QueryResult) -> String {
    if !result.success {
        let mut text = format!(
            "❌ Error: {}",
            result.error.as_deref().unwrap_or("unknown error")
        );
        if !result.output.trim().is_empty() {
            let _ = write!(text, "\n\n{}", result.output.trim());
        }
        return text;
    }

    if result.output.trim().is_empty() {
        EMPTY_OUTPUT.to_string()
    } else {
        result.output.clone()
    }
}

/// Interactive loop over stdin for a single local user. `/quit`, `/exit`, EOF or Ctrl-C ends it.
pub async fn run_repl(frontend: &ChatFrontend, user_id: &str) -> anyhow::Result<()> {
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    loop {
        let next = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = next else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" || line == "/exit" {
            break;
        }

        if let Some(reply) = frontend.handle(user_id, line).await {
            stdout.write_all(reply.as_bytes()).await?;
            stdout.write_all(b"\n\n").await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}
