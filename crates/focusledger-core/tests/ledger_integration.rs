//! Integration tests for ledger persistence and schema migration.

use chrono::{NaiveDate, NaiveDateTime};
use focusledger_core::storage::{LoadSource, LEDGER_FILE_NAME};
use focusledger_core::{log_session, Ledger, LedgerStore};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

const LEGACY_DOCUMENT: &str = r#"{
    "productivityData": {
        "2026-10-17": [
            { "hour": 9, "segments": [
                { "startMinute": 0, "durationMinutes": 30, "tag": "Reading" },
                { "startMinute": 30, "durationMinutes": 20 }
            ] }
        ]
    },
    "productiveSessionCount": 3,
    "dailyGoalMinutes": 45
}"#;

#[test]
fn test_saved_ledger_reloads_identically() {
    let dir = tempfile::tempdir().unwrap();
    let store = LedgerStore::new(dir.path().join(LEDGER_FILE_NAME));

    let mut ledger = Ledger::new();
    ledger.add_category("Work");
    ledger.set_goal(90).unwrap();
    log_session(&mut ledger, at(2026, 10, 18, 14, 10), 25 * 60, "Work");
    log_session(&mut ledger, at(2026, 10, 19, 0, 20), 50 * 60, "Work");
    ledger.record_work_session(4);

    store.save(&ledger).unwrap();
    let (reloaded, source) = store.try_load().unwrap();
    assert_eq!(source, LoadSource::Current);
    assert_eq!(reloaded, ledger);

    let first = std::fs::read_to_string(store.path()).unwrap();
    store.save(&reloaded).unwrap();
    let second = std::fs::read_to_string(store.path()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_legacy_document_is_migrated_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(LEDGER_FILE_NAME);
    std::fs::write(&path, LEGACY_DOCUMENT).unwrap();
    let store = LedgerStore::new(&path);

    let ledger = store.load();
    let day = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
    assert_eq!(ledger.day_total(day, None), 50);
    assert_eq!(ledger.day_total(day, Some("Reading")), 30);
    assert_eq!(ledger.day_total(day, Some("Uncategorized")), 20);
    assert_eq!(ledger.sessions_since_long_break(), 3);
    assert_eq!(ledger.daily_goal_minutes(), 45);
    assert_eq!(ledger.categories(), ["Reading", "Uncategorized"]);

    // The load rewrote the file in the current schema.
    let (again, source) = store.try_load().unwrap();
    assert_eq!(source, LoadSource::Current);
    assert_eq!(again, ledger);

    let rewritten = std::fs::read_to_string(&path).unwrap();
    assert!(rewritten.contains("\"schemaVersion\": 2"));
    assert!(!rewritten.contains("\"tag\""));
}

#[test]
fn test_corrupt_file_falls_back_and_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(LEDGER_FILE_NAME);
    std::fs::write(&path, "{ not json").unwrap();
    let store = LedgerStore::new(&path);

    assert!(store.try_load().is_err());
    let ledger = store.load();
    assert_eq!(ledger, Ledger::new());
    assert!(dir.path().join("ledger.json.corrupt").exists());
}

#[test]
fn test_missing_file_loads_defaults_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let store = LedgerStore::new(dir.path().join("nested").join(LEDGER_FILE_NAME));

    let (ledger, source) = store.try_load().unwrap();
    assert_eq!(source, LoadSource::Missing);
    assert_eq!(ledger.daily_goal_minutes(), 120);
    assert!(!store.path().exists());

    store.save(&ledger).unwrap();
    assert!(store.path().exists());
    assert!(!dir.path().join("nested").join("ledger.json.tmp").exists());
}

#[test]
fn test_unversioned_document_keeps_categories_after_resave() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(LEDGER_FILE_NAME);
    std::fs::write(
        &path,
        r#"{"productivityData":{"2026-10-17":[{"hour":9,"segments":[
            {"startMinute":0,"durationMinutes":25,"category":"Reading"}]}]},
            "productiveSessionCount":1,"dailyGoalMinutes":120,"categories":["Reading"]}"#,
    )
    .unwrap();
    let store = LedgerStore::new(&path);

    let (_, source) = store.try_load().unwrap();
    assert_eq!(source, LoadSource::Migrated { from: "v2-unversioned" });

    let ledger = store.load();
    let day = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
    assert_eq!(ledger.day_total(day, Some("Reading")), 25);
    assert_eq!(ledger.categories(), ["Reading"]);

    let (reloaded, source) = store.try_load().unwrap();
    assert_eq!(source, LoadSource::Current);
    assert_eq!(reloaded, ledger);
    assert!(!std::fs::read_to_string(&path).unwrap().contains("Uncategorized"));
}
