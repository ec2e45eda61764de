use std::fs;

use chrono::NaiveDate;
use slip_core::{
    storage::{KeyValueStore, StorageService, RECEIPTS_KEY},
    LoadSource, ReceiptRepository,
};
use slip_domain::{Category, ReceiptDraft};
use slip_storage_json::{write_file_atomic, JsonFileStore};
use tempfile::tempdir;

#[test]
fn json_store_round_trips_values() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("store")).expect("create store");

    assert_eq!(store.read(RECEIPTS_KEY).expect("read"), None);
    store.write(RECEIPTS_KEY, "[]").expect("write");
    assert_eq!(store.read(RECEIPTS_KEY).expect("read").as_deref(), Some("[]"));

    let path = store.path_for(RECEIPTS_KEY);
    assert_eq!(path, dir.path().join("store").join("slip_receipts.json"));
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn json_store_remove_is_idempotent() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path()).expect("create store");

    store.write("slip_settings", "{}").expect("write");
    store.remove("slip_settings").expect("remove");
    store.remove("slip_settings").expect("remove missing");
    assert_eq!(store.read("slip_settings").expect("read"), None);
}

#[test]
fn json_store_lists_keys() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path()).expect("create store");
    store.write("slip_settings", "{}").expect("write");
    store.write("slip_receipts", "[]").expect("write");
    fs::write(dir.path().join("notes.txt"), "ignored").expect("write stray file");

    assert_eq!(
        store.keys().expect("keys"),
        vec!["slip_receipts".to_string(), "slip_settings".to_string()]
    );
}

#[test]
fn repository_survives_restart_on_disk() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path().join("store");

    let added_id = {
        let store = JsonFileStore::new(&root).expect("create store");
        let mut repository = ReceiptRepository::new(StorageService::new(Box::new(store)));
        assert_eq!(repository.load().source, LoadSource::Seeded);
        let added = repository
            .add(ReceiptDraft::new(
                "Kedai Runcit",
                NaiveDate::from_ymd_opt(2025, 1, 5).expect("date"),
                12.5,
                Category::Food,
            ))
            .expect("add receipt");
        added.id
    };

    let store = JsonFileStore::new(&root).expect("reopen store");
    let mut repository = ReceiptRepository::new(StorageService::new(Box::new(store)));
    let report = repository.load();

    assert_eq!(report.source, LoadSource::Stored);
    assert_eq!(report.receipt_count, 6);
    assert_eq!(repository.receipts()[0].id, added_id);
}

#[test]
fn corrupt_file_is_reseeded() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path()).expect("create store");
    fs::write(store.path_for(RECEIPTS_KEY), "{not json").expect("write corrupt file");

    let mut repository = ReceiptRepository::new(StorageService::new(Box::new(store.clone())));
    assert_eq!(repository.load().source, LoadSource::Recovered);

    let raw = store.read(RECEIPTS_KEY).expect("read").expect("reseeded");
    let parsed: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    assert_eq!(parsed.as_array().map(Vec::len), Some(5));
}

#[test]
fn write_file_atomic_creates_parent_directories() {
    let dir = tempdir().expect("tempdir");
    let target = dir.path().join("exports").join("slip_receipts_2025-01-01.csv");

    write_file_atomic(&target, b"Store,Date,Total,Category,Notes").expect("write export");
    assert_eq!(
        fs::read_to_string(&target).expect("read export"),
        "Store,Date,Total,Category,Notes"
    );
}
