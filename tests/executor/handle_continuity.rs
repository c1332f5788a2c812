use relaybridge::config::ContinuityMode;

use crate::assistant_harness::{ECHO_ARGS, FLAKY_ECHO, Harness, arg_lines, value_after};

fn handle_harness(body: &str, replay_on_fresh: bool) -> Harness {
    let mut harness = Harness::new(body);
    harness.config.assistant.continuity = ContinuityMode::Handle;
    harness.config.assistant.replay_on_fresh_handle = replay_on_fresh;
    harness
}

#[tokio::test]
async fn first_turn_starts_then_second_resumes_same_handle() {
    let harness = handle_harness(ECHO_ARGS, false);
    let executor = harness.executor().await;

    let first = executor.execute_query("q1", "alice").await;
    assert!(first.success);
    assert!(value_after(&first.output, "--resume").is_none());
    let handle = value_after(&first.output, "--session-id").unwrap().to_string();
    assert_eq!(uuid::Uuid::parse_str(&handle).unwrap().get_version_num(), 4);

    let second = executor.execute_query("q2", "alice").await;
    assert!(value_after(&second.output, "--session-id").is_none());
    assert_eq!(value_after(&second.output, "--resume"), Some(handle.as_str()));
    assert_eq!(value_after(&second.output, "-p"), Some("q2"));
}

#[tokio::test]
async fn clear_starts_a_new_handle() {
    let harness = handle_harness(ECHO_ARGS, false);
    let executor = harness.executor().await;

    let first = executor.execute_query("q1", "alice").await;
    let old = value_after(&first.output, "--session-id").unwrap().to_string();

    executor.clear_session("alice").await;
    assert!(executor.continuity().current_handle("alice").is_none());

    let next = executor.execute_query("q2", "alice").await;
    let new = value_after(&next.output, "--session-id").unwrap();
    assert_ne!(new, old);
}

#[tokio::test]
async fn failed_fresh_turn_does_not_store_handle() {
    let harness = handle_harness(FLAKY_ECHO, false);
    let executor = harness.executor().await;

    harness.set_failing(true);
    let failed = executor.execute_query("q1", "alice").await;
    assert!(!failed.success);
    assert!(executor.continuity().current_handle("alice").is_none());

    harness.set_failing(false);
    let retry = executor.execute_query("q1", "alice").await;
    assert!(retry.success);
    assert!(value_after(&retry.output, "--session-id").is_some());
    assert!(executor.continuity().current_handle("alice").is_some());
}

#[tokio::test]
async fn failed_resumed_turn_keeps_handle_for_retry() {
    let harness = handle_harness(FLAKY_ECHO, false);
    let executor = harness.executor().await;

    executor.execute_query("q1", "alice").await;
    let held = executor.continuity().current_handle("alice").unwrap();

    harness.set_failing(true);
    assert!(!executor.execute_query("q2", "alice").await.success);
    harness.set_failing(false);

    let retry = executor.execute_query("q2", "alice").await;
    assert_eq!(value_after(&retry.output, "--resume"), Some(held.as_str()));
}

#[tokio::test]
async fn fresh_handle_replays_stored_history_once() {
    let harness = handle_harness(ECHO_ARGS, true);
    let executor = harness.executor().await;
    executor
        .sessions()
        .append_message("alice", relaybridge::session::MessageRole::User, "from yesterday")
        .await;

    let first = executor.execute_query("q1", "alice").await;
    assert!(first.output.contains("Previous conversation:\nUser: from yesterday"));

    let second = executor.execute_query("q2", "alice").await;
    assert!(!second.output.contains("Previous conversation:"));
    assert_eq!(arg_lines(&second.output)[1], "q2");
}

#[tokio::test]
async fn handles_are_per_user() {
    let harness = handle_harness(ECHO_ARGS, false);
    let executor = harness.executor().await;

    let alice = executor.execute_query("hi", "alice").await;
    let bob = executor.execute_query("hi", "bob").await;

    assert_ne!(
        value_after(&alice.output, "--session-id"),
        value_after(&bob.output, "--session-id")
    );
}

#[tokio::test]
async fn handle_mode_still_records_history() {
    let harness = handle_harness(ECHO_ARGS, false);
    let executor = harness.executor().await;

    executor.execute_query("q1", "alice").await;

    assert_eq!(executor.stats().await.total_messages, 2);
}
