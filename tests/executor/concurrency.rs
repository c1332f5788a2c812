use std::sync::Arc;

use relaybridge::session::MessageRole;

use crate::assistant_harness::Harness;

const SLOW_ECHO: &str = r#"sleep 0.2
printf '%s\n' "$@""#;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn same_user_turns_are_serialized() {
    let harness = Harness::new(SLOW_ECHO);
    let executor = Arc::new(harness.executor().await);

    let first = tokio::spawn({
        let executor = Arc::clone(&executor);
        async move { executor.execute_query("one", "alice").await }
    });
    let second = tokio::spawn({
        let executor = Arc::clone(&executor);
        async move { executor.execute_query("two", "alice").await }
    });
    assert!(first.await.unwrap().success);
    assert!(second.await.unwrap().success);

    let history = executor.sessions().get_history("alice", None).await;
    let roles: Vec<_> = history.iter().map(|message| message.role).collect();
    assert_eq!(
        roles,
        [
            MessageRole::User,
            MessageRole::Assistant,
            MessageRole::User,
            MessageRole::Assistant
        ]
    );
    // The later turn saw the earlier one replayed.
    assert!(history[3].content.contains("Previous conversation:"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn different_users_run_independently() {
    let harness = Harness::new(SLOW_ECHO);
    let executor = Arc::new(harness.executor().await);

    let (alice, bob) = tokio::join!(
        executor.execute_query("hi", "alice"),
        executor.execute_query("hi", "bob"),
    );

    assert!(alice.success && bob.success);
    let stats = executor.stats().await;
    assert_eq!(stats.total_sessions, 2);
    assert_eq!(stats.total_messages, 4);
}
