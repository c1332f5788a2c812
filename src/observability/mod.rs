use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Parse a configured level name, falling back to `info` for anything unknown.
pub fn parse_level(raw: &str) -> Level {
    match raw.trim().parse::<Level>() {
        Ok(level) => level,
        Err(_) => {
            eprintln!("Warning: unknown log level '{raw}', using info");
            Level::INFO
        }
    }
}

/// Install the global `fmt` subscriber. Logs go to stderr so REPL replies stay clean.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&config.level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")
}
