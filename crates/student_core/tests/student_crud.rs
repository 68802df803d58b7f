use std::error::Error;

use rusqlite::Connection;
use student_core::{
    DbError, SqliteStudentStore, StoreError, Student, StudentRepository, StudentService,
};
use tempfile::TempDir;

fn open_store() -> (TempDir, SqliteStudentStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStudentStore::open(dir.path().join("database").join("students.db")).unwrap();
    (dir, store)
}

fn student(id: &str, age: i32, gpa: f64) -> Student {
    Student::new(id, "Ayse", "Yilmaz", age, gpa).unwrap()
}

#[test]
fn create_and_get_roundtrip() {
    let (_dir, store) = open_store();

    let original = Student::new("12345", "Ayse", "Yilmaz", 20, 85.5).unwrap();
    store.create(&original).unwrap();

    let loaded = store.get("12345").unwrap().unwrap();
    assert_eq!(loaded, original);
}

#[test]
fn get_missing_id_returns_none() {
    let (_dir, store) = open_store();

    assert!(store.get("54321").unwrap().is_none());
}

#[test]
fn contact_fields_are_not_persisted() {
    let (_dir, store) = open_store();

    let mut original = student("12345", 20, 85.5);
    original.set_email(Some("ayse@example.com".to_string()));
    original.set_phone(Some("555".to_string()));
    store.create(&original).unwrap();

    let loaded = store.get("12345").unwrap().unwrap();
    assert_eq!(loaded.email(), None);
    assert_eq!(loaded.phone(), None);
    assert_eq!(loaded.first_name(), "Ayse");
    assert_ne!(loaded, original);

    original.set_email(None);
    original.set_phone(None);
    assert_eq!(loaded, original);
}

#[test]
fn create_duplicate_returns_duplicate_key_and_keeps_existing_row() {
    let (_dir, store) = open_store();

    let existing = student("12345", 20, 85.5);
    store.create(&existing).unwrap();

    let intruder = Student::new("12345", "Mehmet", "Kaya", 30, 40.0).unwrap();
    let err = store.create(&intruder).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey(ref id) if id == "12345"));
    assert_eq!(err.to_string(), "student already exists: 12345");

    assert_eq!(store.get("12345").unwrap().unwrap(), existing);
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn update_overwrites_non_key_fields() {
    let (_dir, store) = open_store();

    let mut record = student("12345", 20, 85.5);
    store.create(&record).unwrap();

    record.set_first_name("Zeynep").unwrap();
    record.set_last_name("Demir").unwrap();
    record.set_age(22).unwrap();
    record.set_gpa(70.25).unwrap();
    store.update(&record).unwrap();

    let loaded = store.get("12345").unwrap().unwrap();
    assert_eq!(loaded, record);
}

#[test]
fn update_missing_id_returns_not_found_and_leaves_table_unchanged() {
    let (_dir, store) = open_store();
    store.create(&student("10001", 20, 50.0)).unwrap();
    let before = store.list().unwrap();

    let err = store.update(&student("99999", 30, 60.0)).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ref id) if id == "99999"));
    assert_eq!(store.list().unwrap(), before);
}

#[test]
fn delete_removes_row_and_missing_id_returns_not_found() {
    let (_dir, store) = open_store();
    store.create(&student("10001", 20, 50.0)).unwrap();
    store.create(&student("10002", 21, 60.0)).unwrap();

    store.delete("10001").unwrap();
    assert!(store.get("10001").unwrap().is_none());

    let err = store.delete("10001").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ref id) if id == "10001"));

    let remaining = store.list().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id(), "10002");
}

#[test]
fn list_empty_table_returns_empty_vec() {
    let (_dir, store) = open_store();

    assert!(store.list().unwrap().is_empty());
}

#[test]
fn list_orders_by_id_ascending() {
    let (_dir, store) = open_store();
    for id in ["10001", "10005", "10002"] {
        store.create(&student(id, 20, 75.0)).unwrap();
    }

    let ids: Vec<String> = store
        .list()
        .unwrap()
        .into_iter()
        .map(|item| item.id().to_string())
        .collect();
    assert_eq!(ids, ["10001", "10002", "10005"]);
}

#[test]
fn ids_are_bound_as_text_not_interpreted() {
    let (_dir, store) = open_store();
    store.create(&student("10001", 20, 75.0)).unwrap();

    assert!(store.get("10001' OR '1'='1").unwrap().is_none());
    let err = store.delete("10001' OR '1'='1").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn leading_zero_ids_stay_distinct() {
    let (_dir, store) = open_store();
    store.create(&student("01234", 20, 75.0)).unwrap();
    store.create(&student("001234", 20, 75.0)).unwrap();

    assert_eq!(store.get("01234").unwrap().unwrap().id(), "01234");
    assert_eq!(store.get("001234").unwrap().unwrap().id(), "001234");
}

#[test]
fn full_lifecycle_through_service() {
    let (_dir, store) = open_store();
    let service = StudentService::new(&store);

    let mut record = Student::new("12345", "Ayse", "Yilmaz", 20, 85.5).unwrap();
    service.create(&record).unwrap();

    let loaded = service.get("12345").unwrap().unwrap();
    assert_eq!(loaded.first_name(), "Ayse");
    assert_eq!(loaded.last_name(), "Yilmaz");
    assert_eq!(loaded.age(), 20);
    assert_eq!(loaded.gpa(), 85.5);

    record.set_age(21).unwrap();
    record.set_gpa(90.0).unwrap();
    service.update(&record).unwrap();

    let updated = service.get("12345").unwrap().unwrap();
    assert_eq!(updated.id(), "12345");
    assert_eq!(updated.first_name(), "Ayse");
    assert_eq!(updated.last_name(), "Yilmaz");
    assert_eq!(updated.age(), 21);
    assert_eq!(updated.gpa(), 90.0);

    service.delete("12345").unwrap();
    assert!(service.get("12345").unwrap().is_none());
    assert!(service.list().unwrap().is_empty());
}

#[test]
fn service_returns_store_errors_unchanged() {
    let (_dir, store) = open_store();
    let service = StudentService::new(store.clone());

    let err = service.delete("77777").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ref id) if id == "77777"));
    assert_eq!(service.repository().path(), store.path());
}

#[test]
fn invalid_persisted_row_is_reported_as_storage_error() {
    let (_dir, store) = open_store();
    let conn = Connection::open(store.path()).unwrap();
    conn.execute(
        "INSERT INTO students (id, first_name, last_name, age, gpa)
         VALUES ('12345', 'Ayse', 'Yilmaz', 7, 85.5);",
        [],
    )
    .unwrap();
    drop(conn);

    let err = store.get("12345").unwrap_err();
    assert!(matches!(err, StoreError::Storage(DbError::InvalidData(_))));
    assert!(err.source().is_some());

    let err = store.list().unwrap_err();
    assert!(matches!(err, StoreError::Storage(DbError::InvalidData(_))));
}

#[test]
fn missing_database_file_is_a_storage_error() {
    let (dir, store) = open_store();
    drop(dir);

    let err = store.list().unwrap_err();
    assert!(matches!(err, StoreError::Storage(DbError::Sqlite(_))));
    assert!(store.check_connection().is_err());
}

#[test]
fn check_connection_succeeds_on_open_store() {
    let (_dir, store) = open_store();

    store.check_connection().unwrap();
}
