//! Intake record repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Store one flattened intake as organization, person and deal rows.
//! - Read a stored intake back in flattened form.
//!
//! # Invariants
//! - `create_records` validates before any SQL mutation.
//! - The three rows are inserted in a single transaction.

use crate::db::DbError;
use crate::model::record::{IntakeRecord, IntakeValidationError};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Identifier returned for a stored intake (the organization row).
pub type RecordId = Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for intake persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(IntakeValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid stored intake data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<IntakeValidationError> for RepoError {
    fn from(value: IntakeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Save contract used by the intake form.
///
/// `Ok(None)` means the store accepted the call but produced no identifier;
/// callers treat it as a failed save.
pub trait IntakeRepository {
    fn create_records(&self, record: &IntakeRecord) -> RepoResult<Option<RecordId>>;
}

impl<T: IntakeRepository + ?Sized> IntakeRepository for &T {
    fn create_records(&self, record: &IntakeRecord) -> RepoResult<Option<RecordId>> {
        (**self).create_records(record)
    }
}

/// SQLite-backed intake repository.
pub struct SqliteIntakeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteIntakeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Reads one stored intake by organization ID.
    pub fn get_intake(&self, organization_id: RecordId) -> RepoResult<Option<IntakeRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT
                    o.name, o.email, o.phone, o.category, o.tier,
                    p.first_name, p.last_name, p.email, p.phone, p.title,
                    d.name, d.stage, d.close_date, d.amount, d.email, d.phone
                 FROM organizations o
                 JOIN persons p ON p.organization_uuid = o.uuid
                 JOIN deals d ON d.organization_uuid = o.uuid AND d.person_uuid = p.uuid
                 WHERE o.uuid = ?1;",
                params![organization_id.to_string()],
                parse_intake_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Counts stored intakes.
    pub fn count_intakes(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM organizations;", [], |row| {
                row.get::<_, i64>(0)
            })?;
        u64::try_from(count).map_err(|_| RepoError::InvalidData(format!("negative count {count}")))
    }
}

impl IntakeRepository for SqliteIntakeRepository<'_> {
    fn create_records(&self, record: &IntakeRecord) -> RepoResult<Option<RecordId>> {
        record.validate()?;

        let organization_id = Uuid::new_v4();
        let person_id = Uuid::new_v4();
        let deal_id = Uuid::new_v4();

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO organizations (uuid, name, email, phone, category, tier)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                organization_id.to_string(),
                record.organization_name.as_str(),
                record.organization_email.as_str(),
                record.organization_phone.as_str(),
                record.organization_category.as_str(),
                record.organization_tier.as_str(),
            ],
        )?;
        tx.execute(
            "INSERT INTO persons (uuid, organization_uuid, first_name, last_name, email, phone, title)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                person_id.to_string(),
                organization_id.to_string(),
                record.person_first_name.as_str(),
                record.person_last_name.as_str(),
                record.person_email.as_str(),
                record.person_phone.as_str(),
                record.person_title.as_str(),
            ],
        )?;
        tx.execute(
            "INSERT INTO deals (
                uuid, organization_uuid, person_uuid, name, stage, close_date, amount, email, phone
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                deal_id.to_string(),
                organization_id.to_string(),
                person_id.to_string(),
                record.deal_name.as_str(),
                record.deal_stage.as_str(),
                record.deal_close_date.as_str(),
                record.deal_amount,
                record.deal_email.as_str(),
                record.deal_phone.as_str(),
            ],
        )?;
        tx.commit().map_err(|err| {
            error!("event=intake_store module=repo status=error error_code=commit_failed error={err}");
            err
        })?;

        info!("event=intake_store module=repo status=ok organization_id={organization_id}");
        Ok(Some(organization_id))
    }
}

fn parse_intake_row(row: &Row<'_>) -> rusqlite::Result<IntakeRecord> {
    Ok(IntakeRecord {
        organization_name: row.get(0)?,
        organization_email: row.get(1)?,
        organization_phone: row.get(2)?,
        organization_category: row.get(3)?,
        organization_tier: row.get(4)?,
        person_first_name: row.get(5)?,
        person_last_name: row.get(6)?,
        person_email: row.get(7)?,
        person_phone: row.get(8)?,
        person_title: row.get(9)?,
        deal_name: row.get(10)?,
        deal_stage: row.get(11)?,
        deal_close_date: row.get(12)?,
        deal_amount: row.get(13)?,
        deal_email: row.get(14)?,
        deal_phone: row.get(15)?,
    })
}
