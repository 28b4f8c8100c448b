//! Database integration tests
//!
//! These tests verify the Store functionality using in-memory SQLite.

use socratic::db::Store;
use socratic::types::{RunStatus, SourceType};
use std::time::Duration;

/// Test helper to create a Store with an in-memory database
async fn create_test_store() -> Store {
    Store::open_memory()
        .await
        .expect("Failed to create in-memory database")
}

// ============= Connection Tests =============

#[tokio::test]
async fn test_open_memory_store() {
    // Opening twice proves schema creation is idempotent per database
    let _store = create_test_store().await;
    let _store = create_test_store().await;
}

#[tokio::test]
async fn test_file_backed_store_persists_across_reopens() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("research.db");
    let path = path.to_str().expect("utf-8 path");

    {
        let store = Store::open(path).await.expect("Failed to open database");
        store
            .create_user("alice", "hash", "key")
            .await
            .expect("Failed to create user");
    }

    let store = Store::open(path).await.expect("Failed to reopen database");
    let user = store
        .get_user_by_username("alice")
        .await
        .expect("Failed to query user");
    assert!(user.is_some());
}

// ============= User Tests =============

#[tokio::test]
async fn test_create_and_fetch_user() {
    let store = create_test_store().await;

    let created = store
        .create_user("alice", "argon2-hash", "sk-or-key")
        .await
        .expect("Failed to create user");
    assert_eq!(created.username, "alice");
    assert!(!created.id.is_empty());

    let by_name = store
        .get_user_by_username("alice")
        .await
        .expect("Failed to query user")
        .expect("User should exist");
    assert_eq!(by_name.id, created.id);
    assert_eq!(by_name.password_hash, "argon2-hash");
    assert_eq!(by_name.api_key, "sk-or-key");

    let by_id = store
        .get_user_by_id(&created.id)
        .await
        .expect("Failed to query user")
        .expect("User should exist");
    assert_eq!(by_id.username, "alice");
}

#[tokio::test]
async fn test_missing_user_returns_none() {
    let store = create_test_store().await;

    let user = store
        .get_user_by_username("nobody")
        .await
        .expect("Query should succeed");
    assert!(user.is_none());

    let user = store
        .get_user_by_id("no-such-id")
        .await
        .expect("Query should succeed");
    assert!(user.is_none());
}

#[tokio::test]
async fn test_duplicate_username_fails() {
    let store = create_test_store().await;

    store
        .create_user("alice", "hash-1", "key-1")
        .await
        .expect("First user creation should succeed");

    let result = store.create_user("alice", "hash-2", "key-2").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_update_password_and_api_key() {
    let store = create_test_store().await;
    let user = store
        .create_user("alice", "old-hash", "old-key")
        .await
        .expect("Failed to create user");

    store
        .update_user_password(&user.id, "new-hash")
        .await
        .expect("Failed to update password");
    store
        .update_user_api_key(&user.id, "new-key")
        .await
        .expect("Failed to update API key");

    let reloaded = store
        .get_user_by_id(&user.id)
        .await
        .expect("Failed to query user")
        .expect("User should exist");
    assert_eq!(reloaded.password_hash, "new-hash");
    assert_eq!(reloaded.api_key, "new-key");
}

#[tokio::test]
async fn test_user_profile_conversion() {
    let store = create_test_store().await;
    let user = store
        .create_user("alice", "hash", "key")
        .await
        .expect("Failed to create user");

    let profile = user.to_profile();
    assert_eq!(profile.id, user.id);
    assert_eq!(profile.username, "alice");
    assert_eq!(profile.created_at.timestamp_millis(), user.created_at);
}

// ============= Run Lifecycle Tests =============

#[tokio::test]
async fn test_new_run_starts_queued() {
    let store = create_test_store().await;
    let user = store
        .create_user("alice", "hash", "key")
        .await
        .expect("Failed to create user");

    let run = store
        .create_run(&user.id, "what is rust")
        .await
        .expect("Failed to create run");

    assert_eq!(run.status, RunStatus::Queued);
    assert_eq!(run.user_query, "what is rust");
    assert!(run.final_report.is_none());
    assert!(run.error_message.is_none());
    assert_eq!(run.created_at, run.updated_at);
}

#[tokio::test]
async fn test_run_completion_stores_report() {
    let store = create_test_store().await;
    let user = store
        .create_user("alice", "hash", "key")
        .await
        .expect("Failed to create user");
    let run = store
        .create_run(&user.id, "what is rust")
        .await
        .expect("Failed to create run");

    store
        .mark_run_in_progress(&run.id)
        .await
        .expect("Failed to mark run in progress");
    let reloaded = store
        .get_run(&run.id)
        .await
        .expect("Failed to query run")
        .expect("Run should exist");
    assert_eq!(reloaded.status, RunStatus::InProgress);

    store
        .complete_run(&run.id, "Rust is a systems language.")
        .await
        .expect("Failed to complete run");
    let reloaded = store
        .get_run(&run.id)
        .await
        .expect("Failed to query run")
        .expect("Run should exist");
    assert_eq!(reloaded.status, RunStatus::Completed);
    assert_eq!(
        reloaded.final_report.as_deref(),
        Some("Rust is a systems language.")
    );
    assert!(reloaded.error_message.is_none());
    assert!(reloaded.updated_at >= reloaded.created_at);
}

#[tokio::test]
async fn test_run_failure_stores_error() {
    let store = create_test_store().await;
    let user = store
        .create_user("alice", "hash", "key")
        .await
        .expect("Failed to create user");
    let run = store
        .create_run(&user.id, "what is rust")
        .await
        .expect("Failed to create run");

    store
        .fail_run(&run.id, "LLM error: no response")
        .await
        .expect("Failed to mark run failed");

    let reloaded = store
        .get_run(&run.id)
        .await
        .expect("Failed to query run")
        .expect("Run should exist");
    assert_eq!(reloaded.status, RunStatus::Failed);
    assert_eq!(reloaded.error_message.as_deref(), Some("LLM error: no response"));
    assert!(reloaded.final_report.is_none());
}

#[tokio::test]
async fn test_get_run_for_user_enforces_ownership() {
    let store = create_test_store().await;
    let alice = store
        .create_user("alice", "hash", "key")
        .await
        .expect("Failed to create user");
    let bob = store
        .create_user("bob", "hash", "key")
        .await
        .expect("Failed to create user");

    let run = store
        .create_run(&alice.id, "alice's query")
        .await
        .expect("Failed to create run");

    let found = store
        .get_run_for_user(&run.id, &alice.id)
        .await
        .expect("Query should succeed");
    assert!(found.is_some());

    // Bob sees nothing, not an error
    let hidden = store
        .get_run_for_user(&run.id, &bob.id)
        .await
        .expect("Query should succeed");
    assert!(hidden.is_none());
}

#[tokio::test]
async fn test_list_runs_newest_first_and_scoped() {
    let store = create_test_store().await;
    let alice = store
        .create_user("alice", "hash", "key")
        .await
        .expect("Failed to create user");
    let bob = store
        .create_user("bob", "hash", "key")
        .await
        .expect("Failed to create user");

    let first = store
        .create_run(&alice.id, "first query")
        .await
        .expect("Failed to create run");
    // Millisecond timestamps need a beat between rows for a stable order
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = store
        .create_run(&alice.id, "second query")
        .await
        .expect("Failed to create run");
    store
        .create_run(&bob.id, "bob's query")
        .await
        .expect("Failed to create run");

    let runs = store
        .list_runs_for_user(&alice.id)
        .await
        .expect("Failed to list runs");

    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].id, second.id);
    assert_eq!(runs[1].id, first.id);
}

// ============= Agent Log Tests =============

#[tokio::test]
async fn test_logs_keep_append_order() {
    let store = create_test_store().await;
    let user = store
        .create_user("alice", "hash", "key")
        .await
        .expect("Failed to create user");
    let run = store
        .create_run(&user.id, "query")
        .await
        .expect("Failed to create run");

    let first = store
        .append_log(&run.id, "status", r#"{"type":"status","message":"one"}"#)
        .await
        .expect("Failed to append log");
    let second = store
        .append_log(&run.id, "plan", r#"{"type":"plan","tool":"web","queries":["q"]}"#)
        .await
        .expect("Failed to append log");
    let third = store
        .append_log(&run.id, "status", r#"{"type":"status","message":"two"}"#)
        .await
        .expect("Failed to append log");

    assert!(first < second && second < third);

    let logs = store.list_logs(&run.id).await.expect("Failed to list logs");
    assert_eq!(logs.len(), 3);
    assert_eq!(
        logs.iter().map(|l| l.id).collect::<Vec<_>>(),
        vec![first, second, third]
    );
    assert_eq!(logs[1].action_type, "plan");
}

#[tokio::test]
async fn test_log_entry_parses_details_json() {
    let store = create_test_store().await;
    let user = store
        .create_user("alice", "hash", "key")
        .await
        .expect("Failed to create user");
    let run = store
        .create_run(&user.id, "query")
        .await
        .expect("Failed to create run");

    store
        .append_log(&run.id, "status", r#"{"type":"status","message":"hi"}"#)
        .await
        .expect("Failed to append log");
    // Non-JSON details survive as a plain string
    store
        .append_log(&run.id, "status", "not json at all")
        .await
        .expect("Failed to append log");

    let logs = store.list_logs(&run.id).await.expect("Failed to list logs");
    let entries: Vec<_> = logs.iter().map(|l| l.to_entry()).collect();

    assert_eq!(entries[0].run_id, run.id);
    assert_eq!(entries[0].details["message"], "hi");
    assert_eq!(
        entries[1].details,
        serde_json::Value::String("not json at all".to_string())
    );
}

// ============= Citation Tests =============

#[tokio::test]
async fn test_citations_round_trip() {
    let store = create_test_store().await;
    let user = store
        .create_user("alice", "hash", "key")
        .await
        .expect("Failed to create user");
    let run = store
        .create_run(&user.id, "query")
        .await
        .expect("Failed to create run");

    store
        .add_citation(&run.id, "Rust Book", "https://doc.rust-lang.org/book/", SourceType::Web)
        .await
        .expect("Failed to add citation");
    store
        .add_citation(
            &run.id,
            "Attention Is All You Need",
            "https://arxiv.org/abs/1706.03762",
            SourceType::Arxiv,
        )
        .await
        .expect("Failed to add citation");

    let citations = store
        .list_citations(&run.id)
        .await
        .expect("Failed to list citations");

    assert_eq!(citations.len(), 2);
    assert_eq!(citations[0].title, "Rust Book");
    assert_eq!(citations[0].source_type, SourceType::Web);
    assert_eq!(citations[1].source_type, SourceType::Arxiv);

    let entry = citations[1].to_entry();
    assert_eq!(entry.run_id, run.id);
    assert_eq!(entry.url, "https://arxiv.org/abs/1706.03762");
}

// ============= Follow-up Tests =============

#[tokio::test]
async fn test_follow_ups_keep_conversation_order() {
    let store = create_test_store().await;
    let user = store
        .create_user("alice", "hash", "key")
        .await
        .expect("Failed to create user");
    let run = store
        .create_run(&user.id, "query")
        .await
        .expect("Failed to create run");

    let question = store
        .add_follow_up(&run.id, "user", "What about lifetimes?")
        .await
        .expect("Failed to add follow-up");
    let answer = store
        .add_follow_up(&run.id, "agent", "Lifetimes bound borrows.")
        .await
        .expect("Failed to add follow-up");

    assert_eq!(question.role, "user");
    assert_eq!(answer.role, "agent");

    let messages = store
        .list_follow_ups(&run.id)
        .await
        .expect("Failed to list follow-ups");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].id, question.id);
    assert_eq!(messages[1].id, answer.id);
    assert_eq!(messages[1].content, "Lifetimes bound borrows.");
}

#[tokio::test]
async fn test_follow_ups_scoped_to_run() {
    let store = create_test_store().await;
    let user = store
        .create_user("alice", "hash", "key")
        .await
        .expect("Failed to create user");
    let run_a = store
        .create_run(&user.id, "query a")
        .await
        .expect("Failed to create run");
    let run_b = store
        .create_run(&user.id, "query b")
        .await
        .expect("Failed to create run");

    store
        .add_follow_up(&run_a.id, "user", "about a")
        .await
        .expect("Failed to add follow-up");

    let messages = store
        .list_follow_ups(&run_b.id)
        .await
        .expect("Failed to list follow-ups");
    assert!(messages.is_empty());
}
