//! Integration tests for the freshness coordinator against the in-memory
//! repository and a scripted importer.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use timetable_core::db::repositories::LocalRepository;
use timetable_core::db::{DirectoryRepository, RecordRepository};
use timetable_core::importer::{ImportError, ImporterGateway};
use timetable_core::models::{HourMarker, RawRecord, RecordDetails, Variant};
use timetable_core::services::{formatter, FreshnessCoordinator};

/// Importer that serves a fixed record set, counts calls, and can be made
/// slow (to widen race windows) or failing.
struct ScriptedImporter {
    records: Vec<RawRecord>,
    calls: AtomicUsize,
    fail: AtomicBool,
    delay: Option<Duration>,
}

impl ScriptedImporter {
    fn returning(records: Vec<RawRecord>) -> Self {
        Self {
            records,
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            delay: None,
        }
    }

    fn slow(records: Vec<RawRecord>, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::returning(records)
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImporterGateway for ScriptedImporter {
    async fn import(
        &self,
        _variant: Variant,
        _external_id: i64,
    ) -> Result<Vec<RawRecord>, ImportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(ImportError::RemoteUnavailable("scripted outage".into()));
        }
        Ok(self.records.clone())
    }
}

fn raw(date: &str, pair: &str, subject: &str) -> RawRecord {
    RawRecord {
        date: date.parse().unwrap(),
        pair_name: pair.to_string(),
        details: RecordDetails {
            subject: subject.to_string(),
            ..Default::default()
        },
    }
}

fn marker(token: &str) -> HourMarker {
    HourMarker::from_token(token)
}

/// The scenario from the freshness contract: a group last refreshed at 09:00
/// resolved at 10:00 imports once, returns the imported record, and moves
/// the marker to the current hour.
#[tokio::test]
async fn stale_group_refreshes_once_and_advances_marker() {
    let repo = Arc::new(LocalRepository::new());
    repo.upsert_entity(Variant::Group, 42, "CS-101").await.unwrap();
    repo.mark_refreshed(Variant::Group, 42, &marker("2024-01-01T09"))
        .await
        .unwrap();

    let importer = Arc::new(ScriptedImporter::returning(vec![raw(
        "2024-01-02", "P1", "Math",
    )]));
    let coordinator = FreshnessCoordinator::new(Arc::clone(&repo), importer.clone());

    let records = coordinator
        .resolve_at(Variant::Group, 42, &marker("2024-01-01T10"))
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].pair_name, "P1");
    assert_eq!(records[0].details.subject, "Math");
    assert_eq!(importer.call_count(), 1);

    let entity = repo
        .get_by_external_id(Variant::Group, 42)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entity.last_refreshed_at, Some(marker("2024-01-01T10")));
}

/// N parallel resolves for the same stale key trigger exactly one import,
/// and every caller observes the new complete set.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_stale_resolves_import_exactly_once() {
    let repo = Arc::new(LocalRepository::new());
    let entity = repo.upsert_entity(Variant::Group, 42, "CS-101").await.unwrap();
    repo.insert_records(entity.id, &[raw("2023-12-20", "P1", "stale")])
        .await
        .unwrap();
    repo.mark_refreshed(Variant::Group, 42, &marker("2024-01-01T09"))
        .await
        .unwrap();

    let importer = Arc::new(ScriptedImporter::slow(
        vec![raw("2024-01-02", "P1", "Math"), raw("2024-01-02", "P2", "Physics")],
        Duration::from_millis(50),
    ));
    let coordinator = Arc::new(FreshnessCoordinator::new(
        Arc::clone(&repo),
        importer.clone(),
    ));

    let current = marker("2024-01-01T10");
    let calls = (0..8).map(|_| {
        let coordinator = Arc::clone(&coordinator);
        let current = current.clone();
        tokio::spawn(async move { coordinator.resolve_at(Variant::Group, 42, &current).await })
    });

    for handle in futures::future::join_all(calls).await {
        let records = handle.unwrap().unwrap();
        let subjects: Vec<&str> = records.iter().map(|r| r.details.subject.as_str()).collect();
        assert_eq!(subjects, vec!["Math", "Physics"]);
    }

    assert_eq!(importer.call_count(), 1);
    assert_eq!(repo.record_count(), 2);
}

/// Parallel resolves for different keys refresh independently: one import
/// per key, no cross-key blocking.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn different_keys_refresh_in_parallel() {
    let repo = Arc::new(LocalRepository::new());
    for id in 1..=4 {
        repo.upsert_entity(Variant::Teacher, id, &format!("Teacher {}", id))
            .await
            .unwrap();
    }

    let importer = Arc::new(ScriptedImporter::slow(
        vec![raw("2024-01-02", "P1", "Math")],
        Duration::from_millis(20),
    ));
    let coordinator = Arc::new(FreshnessCoordinator::new(
        Arc::clone(&repo),
        importer.clone(),
    ));

    let current = marker("2024-01-01T10");
    let calls = (1..=4).map(|id| {
        let coordinator = Arc::clone(&coordinator);
        let current = current.clone();
        tokio::spawn(async move { coordinator.resolve_at(Variant::Teacher, id, &current).await })
    });

    for handle in futures::future::join_all(calls).await {
        assert_eq!(handle.unwrap().unwrap().len(), 1);
    }
    assert_eq!(importer.call_count(), 4);
}

/// A caller that gives up mid-refresh must not leave the entity in the
/// deleted-but-not-reinserted state: the replace runs to completion anyway.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cancelled_caller_does_not_abandon_refresh() {
    let repo = Arc::new(LocalRepository::new());
    repo.upsert_entity(Variant::Group, 42, "CS-101").await.unwrap();

    let importer = Arc::new(ScriptedImporter::slow(
        vec![raw("2024-01-02", "P1", "Math")],
        Duration::from_millis(80),
    ));
    let coordinator = Arc::new(FreshnessCoordinator::new(
        Arc::clone(&repo),
        importer.clone(),
    ));

    let current = marker("2024-01-01T10");
    let racing = {
        let coordinator = Arc::clone(&coordinator);
        let current = current.clone();
        tokio::spawn(async move { coordinator.resolve_at(Variant::Group, 42, &current).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    racing.abort();
    let _ = racing.await;

    // Give the detached refresh time to finish, then verify the replace
    // completed: records present, marker advanced, no second import needed.
    tokio::time::sleep(Duration::from_millis(120)).await;
    let entity = repo
        .get_by_external_id(Variant::Group, 42)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entity.last_refreshed_at, Some(current.clone()));

    let records = coordinator
        .resolve_at(Variant::Group, 42, &current)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(importer.call_count(), 1);
}

/// Import failure for a stale key: empty result, marker unchanged, and the
/// next resolve retries the import.
#[tokio::test]
async fn import_failure_is_empty_and_retried() {
    let repo = Arc::new(LocalRepository::new());
    repo.upsert_entity(Variant::Auditorium, 7, "Physics Lab")
        .await
        .unwrap();

    let importer = Arc::new(ScriptedImporter::returning(vec![raw(
        "2024-01-02", "P1", "Optics",
    )]));
    importer.fail.store(true, Ordering::SeqCst);
    let coordinator = FreshnessCoordinator::new(Arc::clone(&repo), importer.clone());

    let records = coordinator
        .resolve_at(Variant::Auditorium, 7, &marker("2024-01-01T10"))
        .await
        .unwrap();
    assert!(records.is_empty());

    let entity = repo
        .get_by_external_id(Variant::Auditorium, 7)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entity.last_refreshed_at, None);

    importer.fail.store(false, Ordering::SeqCst);
    let records = coordinator
        .resolve_at(Variant::Auditorium, 7, &marker("2024-01-01T10"))
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(importer.call_count(), 2);
}

/// End-to-end: search the directory, follow a suggestion token, format the
/// resolved schedule.
#[tokio::test]
async fn search_then_resolve_then_format() {
    let repo = Arc::new(LocalRepository::new());
    repo.upsert_entity(Variant::Group, 42, "CS-101").await.unwrap();

    let importer = Arc::new(ScriptedImporter::returning(vec![raw(
        "2024-01-02", "P1", "Math",
    )]));
    let coordinator = FreshnessCoordinator::new(Arc::clone(&repo), importer);

    let hits = coordinator.search_all("cs-1").await.unwrap();
    let suggestions = formatter::directory_suggestions(&hits.groups);
    assert_eq!(suggestions.len(), 1);

    let (variant, external_id) = Variant::parse_token(&suggestions[0].token).unwrap();
    assert_eq!(variant, Variant::Group);

    let records = coordinator
        .resolve_at(variant, external_id, &marker("2024-01-01T10"))
        .await
        .unwrap();
    let entity = repo
        .get_by_external_id(variant, external_id)
        .await
        .unwrap()
        .unwrap();

    let text = formatter::format_schedule(&entity, &records);
    assert!(text.contains("Math"));
    assert!(text.ends_with("Group - CS-101"));
}

/// Ordering is stable across repeated resolves within the same hour.
#[tokio::test]
async fn repeated_resolves_return_identical_order() {
    let repo = Arc::new(LocalRepository::new());
    repo.upsert_entity(Variant::Group, 42, "CS-101").await.unwrap();

    let importer = Arc::new(ScriptedImporter::returning(vec![
        raw("2024-01-03", "P1", "c"),
        raw("2024-01-02", "P2", "b"),
        raw("2024-01-02", "P1", "a"),
    ]));
    let coordinator = FreshnessCoordinator::new(Arc::clone(&repo), importer);

    let current = marker("2024-01-01T10");
    let first = coordinator
        .resolve_at(Variant::Group, 42, &current)
        .await
        .unwrap();
    let second = coordinator
        .resolve_at(Variant::Group, 42, &current)
        .await
        .unwrap();

    let subjects: Vec<&str> = first.iter().map(|r| r.details.subject.as_str()).collect();
    assert_eq!(subjects, vec!["a", "b", "c"]);
    assert_eq!(first, second);
}
