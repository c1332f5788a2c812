use std::sync::Arc;

use relaybridge::frontend::ChatFrontend;

use crate::assistant_harness::{ECHO_ARGS, Harness};

async fn frontend(harness: &Harness) -> ChatFrontend {
    let executor = Arc::new(harness.executor().await);
    ChatFrontend::new(executor, harness.config.frontend.clone())
}

#[tokio::test]
async fn unauthorized_sender_gets_no_reply_and_no_state() {
    let harness = Harness::new(ECHO_ARGS);
    let frontend = frontend(&harness).await;

    assert!(frontend.handle("mallory", "hello").await.is_none());
    assert!(frontend.handle("mallory", "/clear").await.is_none());

    let stats = frontend.executor().stats().await;
    assert_eq!(stats.total_sessions, 0);
    assert!(!harness.tmp.path().join("sessions").join("mallory.json").exists());
}

#[tokio::test]
async fn empty_success_renders_placeholder() {
    let harness = Harness::new("true");
    let frontend = frontend(&harness).await;

    let reply = frontend.handle("alice", "do the thing").await.unwrap();

    assert_eq!(reply, "✅ Command executed (no output)");
}

#[tokio::test]
async fn failure_renders_error_prefix() {
    let harness = Harness::new("echo partial; echo broken >&2; exit 2");
    let frontend = frontend(&harness).await;

    let reply = frontend.handle("alice", "hello").await.unwrap();

    assert!(reply.starts_with("❌ Error: command exited with status 2: broken"));
    assert!(reply.ends_with("partial"));
}

#[tokio::test]
async fn stats_and_clear_commands_drive_sessions() {
    let harness = Harness::new(ECHO_ARGS);
    let frontend = frontend(&harness).await;

    frontend.handle("alice", "one").await;
    frontend.handle("bob", "two").await;
    let stats = frontend.handle("alice", "/stats").await.unwrap();
    assert!(stats.contains("Sessions: 2"));
    assert!(stats.contains("Messages: 4"));

    frontend.handle("alice", "/clear").await.unwrap();
    let stats = frontend.executor().stats().await;
    assert_eq!(stats.total_sessions, 1);
    assert_eq!(stats.total_messages, 2);
}

#[tokio::test]
async fn help_does_not_touch_sessions() {
    let harness = Harness::new(ECHO_ARGS);
    let frontend = frontend(&harness).await;

    let reply = frontend.handle("alice", "/start").await.unwrap();

    assert!(reply.contains("/clear"));
    assert_eq!(frontend.executor().stats().await.total_sessions, 0);
}

#[tokio::test]
async fn logs_command_reads_configured_file() {
    let mut harness = Harness::new(ECHO_ARGS);
    let log = harness.tmp.path().join("bot.log");
    std::fs::write(&log, "a\nb\nc\n").unwrap();
    harness.config.utilities.log_file = Some(log);
    let frontend = frontend(&harness).await;

    let reply = frontend.handle("alice", "/logs 2").await.unwrap();

    assert_eq!(reply, "b\nc");
}
