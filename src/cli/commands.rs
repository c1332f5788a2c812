use clap::{Parser, Subcommand};

/// `RelayBridge` - Relay chat messages to a local assistant CLI with per-user memory.
#[derive(Parser, Debug)]
#[command(name = "relaybridge")]
#[command(version)]
#[command(about = "Relay chat messages to a local assistant CLI.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive chat on stdin/stdout
    Chat {
        /// Sender id to chat as (default: first allowed user)
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Send a single query and print the reply
    Ask {
        #[arg(short, long)]
        user: Option<String>,

        /// Query text
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Forget a user's conversation
    Clear {
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Show session totals
    Stats,

    /// Print a user's stored messages
    History {
        #[arg(short, long)]
        user: Option<String>,

        /// Only the most recent N messages
        #[arg(long)]
        last: Option<usize>,
    },

    /// Host uptime, memory, disk and GPU
    Sysinfo,

    /// Tail the configured log file
    Logs {
        #[arg(short = 'n', long, default_value = "50")]
        lines: usize,
    },

    /// List processes matching a pattern
    Ps {
        /// Pattern for `pgrep -af` (default from config)
        pattern: Option<String>,
    },
}
