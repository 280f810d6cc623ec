//! Integration tests for the feedback store.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use family_run::feedback::{FeedbackUpdate, NewFeedback};
use family_run::storage::file::JsonFileBackend;
use family_run::storage::memory::InMemoryBackend;
use family_run::{FeedbackKind, FeedbackStatus, FeedbackStore, Priority, TrackerError};
use pretty_assertions::assert_eq;
use serde_json::Value;

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, hour, minute, 0).unwrap()
}

#[tokio::test]
async fn test_create_update_list() {
    let store = FeedbackStore::new(InMemoryBackend::new());

    let first = store
        .create(
            NewFeedback {
                kind: Some(FeedbackKind::Bug),
                priority: Some(Priority::High),
                description: Some("Header overlaps the chart".to_string()),
                ..NewFeedback::titled("Fix header")
            },
            at(8, 0),
        )
        .await
        .unwrap();
    let second = store
        .create(NewFeedback::titled("Weekly email"), at(8, 5))
        .await
        .unwrap();
    assert!(first.id.starts_with("task-20240610080000-"));
    assert_ne!(first.id, second.id);

    let updated = store
        .update(
            &first.id,
            FeedbackUpdate {
                status: Some(FeedbackStatus::Resolved),
                title: Some("  Fix sticky header ".to_string()),
                ..FeedbackUpdate::default()
            },
            at(9, 30),
        )
        .await
        .unwrap();
    assert_eq!(updated.status, FeedbackStatus::Resolved);
    assert_eq!(updated.title, "Fix sticky header");
    assert_eq!(updated.priority, Priority::High);
    assert_eq!(updated.description, "Header overlaps the chart");
    assert_eq!(updated.created_at, at(8, 0));
    assert_eq!(updated.updated_at, Some(at(9, 30)));

    let items = store.list().await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0], updated);
    assert_eq!(items[1], second);
}

#[tokio::test]
async fn test_empty_update_only_stamps_time() {
    let store = FeedbackStore::new(InMemoryBackend::new());
    let item = store.create(NewFeedback::titled("Dark mode"), at(8, 0)).await.unwrap();

    let changes = FeedbackUpdate::default();
    assert!(changes.is_empty());
    let updated = store.update(&item.id, changes, at(10, 0)).await.unwrap();

    assert_eq!(updated.title, item.title);
    assert_eq!(updated.status, item.status);
    assert_eq!(updated.updated_at, Some(at(10, 0)));
}

#[tokio::test]
async fn test_delete_removes_exactly_one() {
    let backend = Arc::new(InMemoryBackend::new());
    let store = FeedbackStore::new(Arc::clone(&backend));
    let a = store.create(NewFeedback::titled("a"), at(8, 0)).await.unwrap();
    let b = store.create(NewFeedback::titled("b"), at(8, 1)).await.unwrap();
    let c = store.create(NewFeedback::titled("c"), at(8, 2)).await.unwrap();

    store.delete(&b.id).await.unwrap();
    let ids: Vec<String> = store.list().await.unwrap().into_iter().map(|i| i.id).collect();
    assert_eq!(ids, [a.id.clone(), c.id.clone()]);

    let writes = backend.write_count();
    assert!(matches!(
        store.delete(&b.id).await,
        Err(TrackerError::NotFound { .. })
    ));
    assert_eq!(backend.write_count(), writes);
}

#[tokio::test]
async fn test_blank_title_is_rejected() {
    let backend = Arc::new(InMemoryBackend::new());
    let store = FeedbackStore::new(Arc::clone(&backend));

    let err = store
        .create(NewFeedback::titled(" \n "), at(8, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::EmptyTitle));
    assert_eq!(err.to_string(), "Title is required");
    assert_eq!(backend.write_count(), 0);
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_file_layout_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedback.json");

    let store = FeedbackStore::new(JsonFileBackend::new(&path));
    let item = store
        .create(
            NewFeedback {
                kind: Some(FeedbackKind::Improvement),
                ..NewFeedback::titled("Bigger buttons")
            },
            at(12, 0),
        )
        .await
        .unwrap();

    let value: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    let stored = &value.as_array().unwrap()[0];
    assert_eq!(stored["id"], item.id.as_str());
    assert_eq!(stored["type"], "improvement");
    assert_eq!(stored["status"], "open");
    assert_eq!(stored["priority"], "medium");
    assert_eq!(stored["created_at"], "2024-06-10T12:00:00Z");
    assert!(stored.get("updated_at").is_none());

    let reopened = FeedbackStore::new(JsonFileBackend::new(&path));
    assert_eq!(reopened.get(&item.id).await.unwrap(), item);
}

#[tokio::test]
async fn test_legacy_items_without_optional_fields_load() {
    let backend = InMemoryBackend::with_data(
        br#"[{"id": "task-20240101000000", "title": "Old", "created_at": "2024-01-01T00:00:00Z"}]"#
            .to_vec(),
    );
    let store = FeedbackStore::new(backend);

    let item = store.get("task-20240101000000").await.unwrap();
    assert_eq!(item.kind, FeedbackKind::Feature);
    assert_eq!(item.status, FeedbackStatus::Open);
    assert_eq!(item.priority, Priority::Medium);
    assert_eq!(item.description, "");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_are_all_kept() {
    let store = Arc::new(FeedbackStore::new(InMemoryBackend::new()));

    let mut handles = Vec::new();
    for i in 0..16 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .create(NewFeedback::titled(format!("item {i}")), at(8, 0))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let items = store.list().await.unwrap();
    assert_eq!(items.len(), 16);
    let mut ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 16);
}
