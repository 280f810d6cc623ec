//! Integration tests for the run log over file and in-memory backends.
//!
//! Organized into module blocks per concern: recording, views, persistence
//! and concurrent access.

use std::sync::Arc;

use chrono::NaiveDate;
use family_run::storage::file::JsonFileBackend;
use family_run::storage::memory::InMemoryBackend;
use family_run::{RunData, RunLog, TrackerError, WeekKey};
use serde_json::{json, Value};

fn members() -> Vec<String> {
    vec!["Gabor".to_string(), "Petia".to_string(), "David".to_string()]
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn week(key: &str) -> WeekKey {
    key.parse().unwrap()
}

// ─── Recording ──────────────────────────────────────────────────────────────

mod recording_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_first_run_initializes_week_for_all_members() {
        let log = RunLog::new(InMemoryBackend::new(), members());
        let key = log.add_run("Petia", 3.5, date(2024, 6, 12)).await.unwrap();
        assert_eq!(key, week("2024-W24"));

        let data = log.load().await.unwrap();
        let record = data.get(&key).unwrap();
        assert_eq!(
            record.member_names().collect::<Vec<_>>(),
            ["Gabor", "Petia", "David"]
        );
        assert_eq!(record.runs("Petia"), &[3.5]);
        assert!(record.runs("Gabor").is_empty());
    }

    #[tokio::test]
    async fn test_runs_keep_submission_order() {
        let log = RunLog::new(InMemoryBackend::new(), members());
        for km in [2.0, 7.5, 1.25] {
            log.add_run("David", km, date(2024, 6, 14)).await.unwrap();
        }

        let data = log.load().await.unwrap();
        let record = data.get(&week("2024-W24")).unwrap();
        assert_eq!(record.runs("David"), &[2.0, 7.5, 1.25]);
        assert_eq!(record.total_km("David"), 10.75);
    }

    #[tokio::test]
    async fn test_sunday_and_next_monday_land_in_different_weeks() {
        let log = RunLog::new(InMemoryBackend::new(), members());
        let sunday = log.add_run("Gabor", 5.0, date(2024, 6, 16)).await.unwrap();
        let monday = log.add_run("Gabor", 5.0, date(2024, 6, 17)).await.unwrap();
        assert_eq!(sunday, week("2024-W24"));
        assert_eq!(monday, week("2024-W25"));
        assert_eq!(log.load().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_rejections_leave_store_untouched() {
        let backend = Arc::new(InMemoryBackend::new());
        let log = RunLog::new(Arc::clone(&backend), members());
        let today = date(2024, 6, 10);

        assert!(matches!(
            log.add_run("Mallory", 5.0, today).await,
            Err(TrackerError::UnknownMember { .. })
        ));
        assert!(matches!(
            log.add_run("Gabor", 0.0, today).await,
            Err(TrackerError::NonPositiveDistance { .. })
        ));
        assert!(matches!(
            log.add_run("Gabor", -1.0, today).await,
            Err(TrackerError::NonPositiveDistance { .. })
        ));
        assert!(matches!(
            log.add_run("Gabor", f64::NAN, today).await,
            Err(TrackerError::InvalidDistance { .. })
        ));
        // An unknown member is reported even when the distance is also bad.
        assert!(matches!(
            log.add_run("Mallory", -1.0, today).await,
            Err(TrackerError::UnknownMember { .. })
        ));

        assert_eq!(backend.write_count(), 0);
        assert!(backend.contents().is_none());
    }
}

// ─── Views ──────────────────────────────────────────────────────────────────

mod view_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_weeks_listed_newest_first_across_year_boundary() {
        let seeded = json!({
            "2023-W52": {"Gabor": [1.0], "Petia": [], "David": []},
            "2024-W05": {"Gabor": [], "Petia": [2.0], "David": []},
            "2024-W24": {"Gabor": [], "Petia": [], "David": [3.0]},
            "2024-W10": {"Gabor": [4.0], "Petia": [], "David": []},
        });
        let backend = InMemoryBackend::with_data(serde_json::to_vec(&seeded).unwrap());
        let log = RunLog::new(backend, members());

        let weeks = log.list_weeks(date(2024, 6, 10)).await.unwrap();
        let keys: Vec<String> = weeks.iter().map(|w| w.week.to_string()).collect();
        assert_eq!(keys, ["2024-W24", "2024-W10", "2024-W05", "2023-W52"]);

        assert!(weeks[0].is_current);
        assert!(weeks[1..].iter().all(|w| !w.is_current));
        assert_eq!(weeks[3].week_display, "Dec 25 - Dec 31, 2023");
    }

    #[tokio::test]
    async fn test_summary_totals_and_has_run() {
        let log = RunLog::new(InMemoryBackend::new(), members());
        let today = date(2024, 6, 10);
        log.add_run("Gabor", 5.5, today).await.unwrap();
        log.add_run("Gabor", 2.5, today).await.unwrap();

        let weeks = log.list_weeks(today).await.unwrap();
        let gabor = &weeks[0].members["Gabor"];
        assert_eq!(gabor.total_km, 8.0);
        assert!(gabor.has_run);

        let petia = &weeks[0].members["Petia"];
        assert_eq!(petia.total_km, 0.0);
        assert!(!petia.has_run);
    }

    #[tokio::test]
    async fn test_members_missing_from_week_read_as_empty() {
        let seeded = json!({"2024-W24": {"Gabor": [5.0]}});
        let log = RunLog::new(
            InMemoryBackend::with_data(serde_json::to_vec(&seeded).unwrap()),
            members(),
        );

        let weeks = log.list_weeks(date(2024, 6, 10)).await.unwrap();
        let names: Vec<&str> = weeks[0].members.keys().map(String::as_str).collect();
        assert_eq!(names, ["Gabor", "Petia", "David"]);
        assert!(weeks[0].members["David"].runs.is_empty());
    }

    #[tokio::test]
    async fn test_overview_reports_current_week_without_runs() {
        let log = RunLog::new(InMemoryBackend::new(), members());
        let overview = log.overview(date(2024, 12, 31)).await.unwrap();
        assert!(overview.weeks.is_empty());
        assert_eq!(overview.current_week, week("2024-W53"));
        assert_eq!(overview.current_week_display, "Dec 30, 2024 - Jan 05, 2025");
    }
}

// ─── Persistence ────────────────────────────────────────────────────────────

mod persistence_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_file_store_round_trips_through_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        let log = RunLog::new(JsonFileBackend::new(&path), members());
        log.add_run("Gabor", 5.0, date(2024, 6, 10)).await.unwrap();
        drop(log);

        let reopened = RunLog::new(JsonFileBackend::new(&path), members());
        let data = reopened.load().await.unwrap();
        assert_eq!(data.get(&week("2024-W24")).unwrap().runs("Gabor"), &[5.0]);
    }

    #[tokio::test]
    async fn test_file_is_pretty_printed_object_keyed_by_week() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let log = RunLog::new(JsonFileBackend::new(&path), members());
        log.add_run("Petia", 4.0, date(2024, 2, 1)).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"2024-W05\": {"));
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            json!({"2024-W05": {"Gabor": [], "Petia": [4.0], "David": []}})
        );
    }

    #[tokio::test]
    async fn test_unconfigured_members_survive_rewrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(
            &path,
            r#"{"2024-W24": {"Gabor": [1.0], "Grandma": [2.0]}}"#,
        )
        .unwrap();

        let log = RunLog::new(JsonFileBackend::new(&path), members());
        log.add_run("Gabor", 3.0, date(2024, 6, 11)).await.unwrap();

        let data = log.load().await.unwrap();
        let record = data.get(&week("2024-W24")).unwrap();
        assert_eq!(record.runs("Grandma"), &[2.0]);
        assert_eq!(record.runs("Gabor"), &[1.0, 3.0]);

        // Views only show configured members.
        let weeks = log.list_weeks(date(2024, 6, 11)).await.unwrap();
        assert!(!weeks[0].members.contains_key("Grandma"));
    }

    #[tokio::test]
    async fn test_malformed_week_key_is_storage_error() {
        let backend = InMemoryBackend::with_data(br#"{"2024-24": {"Gabor": [1.0]}}"#.to_vec());
        let log = RunLog::new(backend, members());
        assert!(matches!(log.load().await, Err(TrackerError::Storage(_))));
    }

    #[tokio::test]
    async fn test_same_week_spelled_twice_is_storage_error() {
        let seeded = br#"{"2024-W9": {"Gabor": [1.0]}, "2024-W09": {"Gabor": [2.0]}}"#;
        let backend = Arc::new(InMemoryBackend::with_data(seeded.to_vec()));
        let log = RunLog::new(Arc::clone(&backend), members());

        assert!(matches!(log.load().await, Err(TrackerError::Storage(_))));
        assert!(matches!(
            log.add_run("Gabor", 3.0, date(2024, 6, 10)).await,
            Err(TrackerError::Storage(_))
        ));
        assert_eq!(backend.write_count(), 0);
        assert_eq!(backend.contents().unwrap(), seeded.to_vec());
    }

    #[tokio::test]
    async fn test_save_replaces_whole_store() {
        let backend = Arc::new(InMemoryBackend::new());
        let log = RunLog::new(Arc::clone(&backend), members());
        log.add_run("Gabor", 1.0, date(2024, 6, 10)).await.unwrap();

        log.save(&RunData::default()).await.unwrap();
        assert!(log.load().await.unwrap().is_empty());
        assert_eq!(backend.contents().unwrap(), b"{}");
    }
}

// ─── Concurrency ────────────────────────────────────────────────────────────

mod concurrency_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_runs_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(RunLog::new(
            JsonFileBackend::new(dir.path().join("data.json")),
            members(),
        ));

        let mut handles = Vec::new();
        for i in 0..24 {
            let log = Arc::clone(&log);
            let member = members()[i % 3].clone();
            handles.push(tokio::spawn(async move {
                log.add_run(&member, 1.0, date(2024, 6, 10)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let data = log.load().await.unwrap();
        let record = data.get(&week("2024-W24")).unwrap();
        for member in members() {
            assert_eq!(record.runs(&member).len(), 8, "{member}");
        }
    }
}
