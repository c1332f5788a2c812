#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

use anyhow::Result;
use clap::Parser;

mod app;
mod cli;

use cli::commands::Cli;
use relaybridge::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_init()?;
    relaybridge::observability::init_logging(&config.logging)?;

    let runtime = app::Runtime::build(config).await?;
    app::dispatch::dispatch(cli, runtime).await
}
