use std::sync::Arc;
use std::time::Duration;

use horreum_query::{
    Debouncer, Dialect, ExplorerConfig, QueryMode, QuerySession, QueryState, RemoteError,
    RemoteResponse,
};
use serde_json::json;

#[tokio::test(start_paused = true)]
async fn slow_answers_to_superseded_queries_are_dropped() {
    let doc = json!({"a": 1, "ab": 2});
    let remote = |query: String, _array: bool| async move {
        let delay = if query == "$.a" { 500 } else { 100 };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok::<_, RemoteError>(RemoteResponse::valid(format!("\"{query}\"")))
    };

    let mut session = QuerySession::new();
    let first = session.begin(QueryMode::FirstMatch, "$.a");
    let second = session.begin(QueryMode::FirstMatch, "$.ab");

    let (a, b) = tokio::join!(
        first.run(Some(&doc), &remote),
        second.run(Some(&doc), &remote)
    );

    assert_eq!(session.accept(first.ticket, a.unwrap()), None);
    let accepted = session.accept(second.ticket, b.unwrap()).unwrap();
    assert_eq!(accepted.query, "$.ab");
    assert_eq!(accepted.formatted, "\"$.ab\"");
}

#[tokio::test]
async fn replay_reruns_the_persisted_query_after_reload() {
    let state = QueryState::from_query_string("?type=js&query=%24.version").unwrap();
    let mut session = QuerySession::with_state(state);
    let remote = |_query: String, _array: bool| async {
        Err::<RemoteResponse, _>(RemoteError::Transport("offline".into()))
    };

    let before = session.replay();
    let outcome = before
        .run(Some(&json!({"version": 1})), &remote)
        .await
        .unwrap();
    assert_eq!(outcome.formatted, "[\n  {\n    \"$.version\": 1\n  }\n]");

    let after = session.replay();
    assert!(!session.is_current(before.ticket));
    let outcome = after
        .run(Some(&json!({"version": 2})), &remote)
        .await
        .unwrap();
    let outcome = session.accept(after.ticket, outcome).unwrap();
    assert_eq!(outcome.formatted, "[\n  {\n    \"$.version\": 2\n  }\n]");
    assert_eq!(
        session.state().to_query_string().unwrap(),
        "type=js&query=%24.version"
    );
}

#[test]
fn configured_default_mode_seeds_the_session() {
    let config = ExplorerConfig::from_toml("[query]\ndefault_mode = \"js\"").unwrap();
    let session = QuerySession::from_config(&config);
    assert_eq!(session.state(), &QueryState::new(QueryMode::LocalEvaluator, ""));
    assert_eq!(session.dialect(), Dialect::Postgres);
}

#[tokio::test]
async fn configured_postgres_dialect_is_translated_for_local_queries() {
    let config = ExplorerConfig::from_toml("[query]\ndefault_dialect = \"postgres\"").unwrap();
    let mut session = QuerySession::from_config(&config);
    let remote = |_query: String, _array: bool| async {
        Err::<RemoteResponse, _>(RemoteError::Transport("offline".into()))
    };
    let doc = json!({"runs": [{"id": 1, "score": 1}, {"id": 2, "score": 3}]});

    let pending = session.begin(QueryMode::LocalEvaluator, "$.runs ? (@.score > 2).id");
    let outcome = pending.run(Some(&doc), &remote).await.unwrap();
    assert!(outcome.valid);
    assert_eq!(outcome.formatted, "[\n  {\n    \"$.runs[1].id\": 2\n  }\n]");

    let mut native = QuerySession::new();
    let pending = native.begin(QueryMode::LocalEvaluator, "$.runs ? (@.score > 2).id");
    assert!(!pending.run(Some(&doc), &remote).await.unwrap().valid);
}

#[tokio::test(start_paused = true)]
async fn debounced_suggestions_use_the_latest_input() {
    let doc = Arc::new(json!({"foo": 1, "foobar": 2, "baz": 3}));
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let config = ExplorerConfig::default();
    let suggestion = config.suggestion.clone();
    let mut debouncer = Debouncer::from_config(&config.suggestion, move |input: String| {
        let _ = tx.send(suggestion.suggest(Some(doc.as_ref()), &input));
    });

    for input in ["f", "fo", "foob"] {
        debouncer.trigger(input.to_string());
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    assert!(debouncer.is_pending());

    let suggestions = rx.recv().await.unwrap();
    assert_eq!(suggestions.candidates, vec!["foobar"]);
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn short_inputs_get_no_debounced_suggestions() {
    let doc = Arc::new(json!({"foo": 1, "foobar": 2}));
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let config = ExplorerConfig::from_toml("[suggestion]\nmin_input_len = 3").unwrap();
    let suggestion = config.suggestion.clone();
    let mut debouncer = Debouncer::from_config(&config.suggestion, move |input: String| {
        let _ = tx.send(suggestion.suggest(Some(doc.as_ref()), &input));
    });

    debouncer.trigger("fo".to_string());
    let suggestions = rx.recv().await.unwrap();
    assert!(suggestions.candidates.is_empty());
    assert_eq!(suggestions.valid, None);

    debouncer.trigger("foob".to_string());
    assert_eq!(rx.recv().await.unwrap().candidates, vec!["foobar"]);
}
