use relaybridge::session::MessageRole;

use crate::assistant_harness::{ECHO_ARGS, Harness, RECORD_ARGS, arg_lines};

#[tokio::test]
async fn first_turn_sends_raw_query() {
    let harness = Harness::new(ECHO_ARGS);
    let executor = harness.executor().await;

    let result = executor.execute_query("hello there", "alice").await;

    assert!(result.success, "{result:?}");
    assert_eq!(arg_lines(&result.output), ["-p", "hello there"]);
}

#[tokio::test]
async fn second_turn_replays_previous_exchange() {
    let harness = Harness::new(ECHO_ARGS);
    let executor = harness.executor().await;

    executor.execute_query("hello", "alice").await;
    let result = executor.execute_query("again", "alice").await;

    assert!(result.success);
    let prompt = arg_lines(&result.output)[1..].join("\n");
    assert_eq!(
        prompt,
        "Previous conversation:\nUser: hello\n\nAssistant: -p\nhello\n\nCurrent query:\nagain"
    );
}

#[tokio::test]
async fn successful_turn_appends_user_then_assistant() {
    let harness = Harness::new(ECHO_ARGS);
    let executor = harness.executor().await;

    executor.execute_query("ping", "alice").await;

    let history = executor.sessions().get_history("alice", None).await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, MessageRole::User);
    assert_eq!(history[0].content, "ping");
    assert_eq!(history[1].role, MessageRole::Assistant);
    assert_eq!(history[1].content, "-p\nping");
}

#[tokio::test]
async fn replay_is_limited_to_context_turns() {
    let mut harness = Harness::new(RECORD_ARGS);
    harness.config.session.context_turns = 2;
    let executor = harness.executor().await;

    executor.execute_query("first", "alice").await;
    executor.execute_query("second", "alice").await;
    let result = executor.execute_query("third", "alice").await;

    assert!(result.success, "{result:?}");
    let args = harness.recorded_args();
    assert!(!args.contains("first"), "{args}");
    assert_eq!(
        args,
        "-p\nPrevious conversation:\nUser: second\n\nAssistant: ok\n\nCurrent query:\nthird\n"
    );
}

#[tokio::test]
async fn history_bound_holds_across_turns() {
    let mut harness = Harness::new(ECHO_ARGS);
    harness.config.session.max_messages_per_session = 3;
    let executor = harness.executor().await;

    for query in ["q1", "q2", "q3"] {
        assert!(executor.execute_query(query, "alice").await.success);
    }

    let history = executor.sessions().get_history("alice", None).await;
    assert_eq!(history.len(), 3);
    assert_eq!(history[2].role, MessageRole::Assistant);
    assert_eq!(history[1].content, "q3");
}

#[tokio::test]
async fn users_do_not_see_each_others_history() {
    let harness = Harness::new(ECHO_ARGS);
    let executor = harness.executor().await;

    executor.execute_query("alice secret", "alice").await;
    let result = executor.execute_query("hi", "bob").await;

    assert_eq!(arg_lines(&result.output), ["-p", "hi"]);
}
