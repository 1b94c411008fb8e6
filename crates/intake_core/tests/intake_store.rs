use intake_core::db::migrations::latest_version;
use intake_core::db::{open_db, open_db_in_memory, DbError};
use intake_core::{
    apply_edit_at, FormSnapshot, IntakeRecord, IntakeRepository, IntakeValidationError, RepoError,
    SqliteIntakeRepository,
};
use rusqlite::Connection;

fn complete_record() -> IntakeRecord {
    let mut snapshot = FormSnapshot::empty();
    for (path, value) in [
        ("organization.name", "Globex"),
        ("organization.phone", "555-0199"),
        ("organization.tier", "2"),
        ("person.firstName", "Hank"),
        ("person.email", "hank@globex.test"),
    ] {
        snapshot = apply_edit_at(&snapshot, path, &value.into()).unwrap();
    }
    IntakeRecord::from(&snapshot)
}

#[test]
fn open_db_applies_latest_schema() {
    let conn = open_db_in_memory().unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());

    let foreign_keys: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(foreign_keys, 1);
}

#[test]
fn reopening_file_database_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("intake.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let repo = SqliteIntakeRepository::new(&conn);
        repo.create_records(&complete_record()).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let repo = SqliteIntakeRepository::new(&conn);
    assert_eq!(repo.count_intakes().unwrap(), 1);
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version() + 1))
            .unwrap();
    }

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::UnsupportedSchemaVersion { db_version, .. } if db_version == latest_version() + 1
    ));
}

#[test]
fn current_version_without_intake_tables_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stripped.sqlite3");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
            .unwrap();
    }

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::MissingTable("organizations")));
    assert_eq!(err.to_string(), "intake table `organizations` is missing");
}

#[test]
fn flattened_record_uses_sixteen_camel_case_fields() {
    let record = complete_record();
    let json = serde_json::to_value(&record).unwrap();
    let object = json.as_object().unwrap();

    assert_eq!(object.len(), 16);
    assert_eq!(json["organizationName"], "Globex");
    assert_eq!(json["personLastName"], "Globex");
    assert_eq!(json["dealName"], "Opportunity for Globex");
    assert_eq!(json["dealAmount"], 200.0);
    assert_eq!(json["personPhone"], "555-0199");
    assert_eq!(json["dealEmail"], "hank@globex.test");
    assert_eq!(json["dealStage"], "Prospecting");
}

#[test]
fn create_records_writes_three_linked_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteIntakeRepository::new(&conn);
    let record = complete_record();

    let id = repo.create_records(&record).unwrap().unwrap();

    let (persons, deals): (i64, i64) = conn
        .query_row(
            "SELECT
                (SELECT COUNT(*) FROM persons WHERE organization_uuid = ?1),
                (SELECT COUNT(*) FROM deals WHERE organization_uuid = ?1)",
            [id.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!((persons, deals), (1, 1));
    assert_eq!(repo.get_intake(id).unwrap(), Some(record));
}

#[test]
fn get_intake_returns_none_for_unknown_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteIntakeRepository::new(&conn);
    assert_eq!(repo.get_intake(uuid::Uuid::new_v4()).unwrap(), None);
}

#[test]
fn create_records_validates_before_writing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteIntakeRepository::new(&conn);

    let mut bad_stage = complete_record();
    bad_stage.deal_stage = "Negotiation".to_string();
    let err = repo.create_records(&bad_stage).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(IntakeValidationError::InvalidStage(ref stage)) if stage == "Negotiation"
    ));

    let mut bad_date = complete_record();
    bad_date.deal_close_date = "2026-02-30".to_string();
    assert!(matches!(
        repo.create_records(&bad_date).unwrap_err(),
        RepoError::Validation(IntakeValidationError::InvalidCloseDate(_))
    ));

    let mut nan_amount = complete_record();
    nan_amount.deal_amount = f64::NAN;
    assert!(matches!(
        repo.create_records(&nan_amount).unwrap_err(),
        RepoError::Validation(IntakeValidationError::NonFiniteAmount)
    ));

    let mut no_last_name = complete_record();
    no_last_name.person_last_name = "  ".to_string();
    assert!(matches!(
        repo.create_records(&no_last_name).unwrap_err(),
        RepoError::Validation(IntakeValidationError::MissingField("personLastName"))
    ));

    let mut no_deal_name = complete_record();
    no_deal_name.deal_name = String::new();
    assert!(matches!(
        repo.create_records(&no_deal_name).unwrap_err(),
        RepoError::Validation(IntakeValidationError::MissingField("dealName"))
    ));

    assert_eq!(repo.count_intakes().unwrap(), 0);
}
