use std::time::{Duration, Instant};

use relaybridge::session::MessageRole;

use crate::assistant_harness::{ECHO_ARGS, FLAKY_ECHO, Harness, write_script};

#[tokio::test]
async fn timeout_fails_and_leaves_history_untouched() {
    let mut harness = Harness::new(ECHO_ARGS);
    let executor = harness.executor().await;
    assert!(executor.execute_query("before", "alice").await.success);

    let slow = write_script(harness.tmp.path(), "slow.sh", "echo thinking\nsleep 5");
    harness.config.assistant.base_args = vec![slow.to_string_lossy().into_owned()];
    harness.config.assistant.timeout_ms = 100;
    let slow_executor = harness.executor().await;

    let started = Instant::now();
    let result = slow_executor.execute_query("too slow", "alice").await;

    assert!(started.elapsed() < Duration::from_secs(1), "{:?}", started.elapsed());
    assert!(!result.success);
    assert!(result.error.as_deref().unwrap().contains("timed out"));
    assert_eq!(result.output, "thinking");

    let history = slow_executor.sessions().get_history("alice", None).await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].content, "before");
}

#[tokio::test]
async fn nonzero_exit_reports_stderr_and_records_nothing() {
    let harness = Harness::new(FLAKY_ECHO);
    let executor = harness.executor().await;
    harness.set_failing(true);

    let result = executor.execute_query("hello", "alice").await;

    assert!(!result.success);
    let error = result.error.unwrap();
    assert!(error.contains("status 3"), "{error}");
    assert!(error.contains("assistant unavailable"), "{error}");
    assert!(executor.sessions().get_history("alice", None).await.is_empty());
}

#[tokio::test]
async fn missing_program_is_a_failed_result() {
    let mut harness = Harness::new(ECHO_ARGS);
    harness.config.assistant.program = "/nonexistent/assistant-cli".into();
    harness.config.assistant.base_args.clear();
    let executor = harness.executor().await;

    let result = executor.execute_query("hello", "alice").await;

    assert!(!result.success);
    assert!(result.error.unwrap().contains("/nonexistent/assistant-cli"));
    assert_eq!(executor.stats().await.total_messages, 0);
}

#[tokio::test]
async fn failure_then_success_serves_next_turn_normally() {
    let harness = Harness::new(FLAKY_ECHO);
    let executor = harness.executor().await;

    harness.set_failing(true);
    assert!(!executor.execute_query("one", "alice").await.success);
    harness.set_failing(false);
    let result = executor.execute_query("two", "alice").await;

    assert!(result.success);
    let history = executor.sessions().get_history("alice", None).await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, MessageRole::User);
    assert_eq!(history[0].content, "two");
}

#[tokio::test]
async fn structured_error_is_a_failure() {
    let mut harness = Harness::new(r#"printf '{"is_error":true,"result":"rate limited"}'"#);
    harness.config.assistant.output_format = Some("json".into());
    let executor = harness.executor().await;

    let result = executor.execute_query("hello", "alice").await;

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("rate limited"));
    assert!(executor.sessions().get_history("alice", None).await.is_empty());
}

#[tokio::test]
async fn empty_query_is_rejected_without_invoking() {
    let harness = Harness::new("exit 9");
    let executor = harness.executor().await;

    let result = executor.execute_query("   ", "alice").await;

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("empty query"));
}
