use super::Runtime;
use crate::cli::commands::{Cli, Commands};
use anyhow::{Result, bail};
use relaybridge::frontend::{render, run_repl};

pub async fn dispatch(cli: Cli, runtime: Runtime) -> Result<()> {
    match cli.command {
        Commands::Chat { user } => {
            let user = runtime.resolve_user(user)?;
            println!("Chatting as {user}. /help for commands, /quit to leave.");
            run_repl(&runtime.frontend, &user).await
        }
        Commands::Ask { user, text } => {
            let user = runtime.resolve_user(user)?;
            match runtime.frontend.handle(&user, &text.join(" ")).await {
                Some(reply) => {
                    println!("{reply}");
                    Ok(())
                }
                None => bail!("Sender '{user}' is not in frontend.allowed_users"),
            }
        }
        Commands::Clear { user } => {
            let user = runtime.resolve_user(user)?;
            runtime.executor.clear_session(&user).await;
            println!("Cleared session for {user}");
            Ok(())
        }
        Commands::Stats => {
            let stats = runtime.executor.stats().await;
            println!("Sessions: {}", stats.total_sessions);
            println!("Messages: {}", stats.total_messages);
            Ok(())
        }
        Commands::History { user, last } => {
            let user = runtime.resolve_user(user)?;
            let history = runtime.sessions.get_history(&user, last).await;
            if history.is_empty() {
                println!("No messages for {user}");
            }
            for message in history {
                println!(
                    "[{}] {}: {}",
                    message.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    message.role.label(),
                    message.content
                );
            }
            Ok(())
        }
        Commands::Sysinfo => {
            println!("{}", render(&runtime.executor.system_stats().await));
            Ok(())
        }
        Commands::Logs { lines } => {
            println!("{}", render(&runtime.executor.tail_logs(lines).await));
            Ok(())
        }
        Commands::Ps { pattern } => {
            let result = runtime
                .executor
                .check_processes(pattern.as_deref().unwrap_or_default())
                .await;
            println!("{}", render(&result));
            Ok(())
        }
    }
}
