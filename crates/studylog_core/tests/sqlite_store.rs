use studylog_core::db::open_db_in_memory;
use studylog_core::{
    NewRecord, RecordStore, RecordValidationError, SqliteRecordStore, StoreError,
};

fn store() -> SqliteRecordStore {
    SqliteRecordStore::new(open_db_in_memory().unwrap())
}

#[test]
fn insert_assigns_ids_and_select_all_keeps_insertion_order() {
    let store = store();

    let go = store.insert(&NewRecord::new("Go", 1.0)).unwrap();
    let rust = store.insert(&NewRecord::new("Rust", 2.5)).unwrap();
    assert_ne!(go.id, rust.id);

    let records = store.select_all().unwrap();
    assert_eq!(records, vec![go, rust]);
    assert_eq!(records[1].hours, 2.5);
}

#[test]
fn select_all_on_empty_table_returns_empty_list() {
    assert!(store().select_all().unwrap().is_empty());
}

#[test]
fn insert_rejects_invalid_payload_without_writing() {
    let store = store();

    let err = store.insert(&NewRecord::new("", 1.0)).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(RecordValidationError::EmptyTitle)
    ));
    let err = store.insert(&NewRecord::new("Go", f64::NAN)).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(RecordValidationError::InvalidHours)
    ));
    assert!(store.select_all().unwrap().is_empty());
}

#[test]
fn delete_by_id_removes_only_that_record() {
    let store = store();
    let a = store.insert(&NewRecord::new("a", 1.0)).unwrap();
    let b = store.insert(&NewRecord::new("b", 2.0)).unwrap();
    let c = store.insert(&NewRecord::new("c", 3.0)).unwrap();

    store.delete_by_id(b.id).unwrap();

    assert_eq!(store.select_all().unwrap(), vec![a, c]);
}

#[test]
fn delete_missing_id_returns_not_found() {
    let store = store();
    let err = store.delete_by_id(42).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(42)));
}

#[test]
fn ids_are_not_reused_after_delete() {
    let store = store();
    let first = store.insert(&NewRecord::new("a", 1.0)).unwrap();
    store.delete_by_id(first.id).unwrap();

    let second = store.insert(&NewRecord::new("b", 1.0)).unwrap();
    assert!(second.id > first.id);
}
