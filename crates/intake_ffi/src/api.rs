//! FFI use-case API for the intake form UI shell.
//!
//! # Responsibility
//! - Expose the propagation engine and intake save flow to Dart via FRB.
//! - Exchange snapshots as JSON so the shell owns no form rules.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every call returns an envelope; errors are carried as messages.

use intake_core::db::open_db;
use intake_core::{
    apply_edit_at, core_version as core_version_inner, init_logging as init_logging_inner,
    ping as ping_inner, DealStage, FieldValue, FormSnapshot, IntakeForm, LogNotifier, SaveOutcome,
    SqliteIntakeRepository,
};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;

const INTAKE_DB_FILE_NAME: &str = "intake_records.sqlite3";
const INTAKE_DB_PATH_ENV: &str = "INTAKE_DB_PATH";
static INTAKE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Snapshot response envelope for form calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshotResponse {
    /// Whether the call produced a new snapshot.
    pub ok: bool,
    /// Snapshot JSON; the input snapshot unchanged when `ok` is false.
    pub snapshot_json: String,
    /// Human-readable message for diagnostics.
    pub message: String,
}

/// Save response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSaveResponse {
    /// Whether records were created.
    pub ok: bool,
    /// Created organization ID on success.
    pub record_id: Option<String>,
    /// Snapshot the shell should render next (empty after success).
    pub snapshot_json: String,
    /// Toast message for the shell.
    pub message: String,
}

/// Returns a fresh snapshot as JSON.
///
/// # FFI contract
/// - Sync call, no I/O.
#[flutter_rust_bridge::frb(sync)]
pub fn form_empty() -> FormSnapshotResponse {
    match serde_json::to_string(&FormSnapshot::empty()) {
        Ok(snapshot_json) => FormSnapshotResponse {
            ok: true,
            snapshot_json,
            message: String::new(),
        },
        Err(err) => FormSnapshotResponse {
            ok: false,
            snapshot_json: String::new(),
            message: format!("form_empty failed: {err}"),
        },
    }
}

/// Applies one field edit to a JSON snapshot.
///
/// Input semantics:
/// - `snapshot_json`: snapshot previously returned by this API.
/// - `path`: dot-path such as `organization.email`.
/// - `value_json`: JSON string or number, e.g. `"Acme"` or `5`.
///
/// # FFI contract
/// - Sync call, no I/O.
/// - On failure returns the input snapshot unchanged with an error message.
#[flutter_rust_bridge::frb(sync)]
pub fn form_apply_edit(
    snapshot_json: String,
    path: String,
    value_json: String,
) -> FormSnapshotResponse {
    let edited = decode_snapshot(&snapshot_json).and_then(|snapshot| {
        let value = serde_json::from_str::<FieldValue>(&value_json)
            .map_err(|err| format!("invalid field value: {err}"))?;
        let next = apply_edit_at(&snapshot, path.trim(), &value).map_err(|err| err.to_string())?;
        serde_json::to_string(&next).map_err(|err| format!("snapshot encode failed: {err}"))
    });

    match edited {
        Ok(next_json) => FormSnapshotResponse {
            ok: true,
            snapshot_json: next_json,
            message: String::new(),
        },
        Err(err) => FormSnapshotResponse {
            ok: false,
            snapshot_json,
            message: format!("form_apply_edit failed: {err}"),
        },
    }
}

/// Deal stage labels in picker order.
#[flutter_rust_bridge::frb(sync)]
pub fn form_stage_options() -> Vec<String> {
    DealStage::ALL
        .iter()
        .map(|stage| stage.as_str().to_string())
        .collect()
}

/// Saves a JSON snapshot to the intake database.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Success returns the organization ID and an empty snapshot.
/// - Failure returns the input snapshot unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn form_save(snapshot_json: String) -> FormSaveResponse {
    let failure = |message: String| FormSaveResponse {
        ok: false,
        record_id: None,
        snapshot_json: snapshot_json.clone(),
        message,
    };

    let snapshot = match decode_snapshot(&snapshot_json) {
        Ok(snapshot) => snapshot,
        Err(err) => return failure(format!("form_save failed: {err}")),
    };
    let conn = match open_db(resolve_intake_db_path()) {
        Ok(conn) => conn,
        Err(err) => {
            warn!("event=ffi_form_save module=ffi status=error error_code=db_open_failed");
            return failure(format!("intake DB open failed: {err}"));
        }
    };

    let repo = SqliteIntakeRepository::new(&conn);
    let mut form = IntakeForm::with_snapshot(snapshot, repo, LogNotifier);
    match form.save() {
        SaveOutcome::Saved(target) => FormSaveResponse {
            ok: true,
            record_id: Some(target.record_id.to_string()),
            snapshot_json: serde_json::to_string(form.snapshot()).unwrap_or_default(),
            message: "Records created successfully".to_string(),
        },
        SaveOutcome::MissingId => failure("No organization ID returned".to_string()),
        SaveOutcome::Failed(message) => failure(message),
    }
}

fn decode_snapshot(snapshot_json: &str) -> Result<FormSnapshot, String> {
    serde_json::from_str(snapshot_json).map_err(|err| format!("invalid snapshot: {err}"))
}

fn resolve_intake_db_path() -> PathBuf {
    INTAKE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(INTAKE_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(INTAKE_DB_FILE_NAME)
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, form_apply_edit, form_empty, form_save, form_stage_options, init_logging,
        ping,
    };
    use intake_core::db::open_db;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn stage_options_start_with_prospecting() {
        let options = form_stage_options();
        assert_eq!(options.len(), 6);
        assert_eq!(options[0], "Prospecting");
        assert_eq!(options[5], "Closed Lost");
    }

    #[test]
    fn apply_edit_propagates_through_json() {
        let empty = form_empty();
        assert!(empty.ok, "{}", empty.message);

        let named = form_apply_edit(
            empty.snapshot_json,
            "organization.name".to_string(),
            "\"Acme\"".to_string(),
        );
        assert!(named.ok, "{}", named.message);
        let rated = form_apply_edit(
            named.snapshot_json,
            "organization.tier".to_string(),
            "4".to_string(),
        );
        assert!(rated.ok, "{}", rated.message);

        let json: serde_json::Value = serde_json::from_str(&rated.snapshot_json).unwrap();
        assert_eq!(json["person"]["lastName"], "Acme");
        assert_eq!(json["deal"]["name"], "Opportunity for Acme");
        assert_eq!(json["deal"]["amount"], 400.0);
        assert_eq!(json["organization"]["tier"], "4");
    }

    #[test]
    fn apply_edit_failure_returns_input_snapshot() {
        let empty = form_empty();
        let response = form_apply_edit(
            empty.snapshot_json.clone(),
            "account.name".to_string(),
            "\"Acme\"".to_string(),
        );
        assert!(!response.ok);
        assert_eq!(response.snapshot_json, empty.snapshot_json);
        assert!(response.message.contains("account"));

        let bad_value = form_apply_edit(
            empty.snapshot_json,
            "organization.name".to_string(),
            "not json".to_string(),
        );
        assert!(!bad_value.ok);
        assert!(bad_value.message.contains("invalid field value"));
    }

    #[test]
    fn form_save_stores_intake_and_returns_empty_snapshot() {
        let name = unique_token("ffi-save");
        let named = form_apply_edit(
            form_empty().snapshot_json,
            "organization.name".to_string(),
            serde_json::to_string(&name).unwrap(),
        );
        assert!(named.ok, "{}", named.message);

        let response = form_save(named.snapshot_json);
        assert!(response.ok, "{}", response.message);
        let record_id = response.record_id.expect("save should return record_id");
        assert!(uuid::Uuid::parse_str(&record_id).is_ok());

        let saved: serde_json::Value = serde_json::from_str(&response.snapshot_json).unwrap();
        assert_eq!(saved["organization"]["name"], "");

        let conn = open_db(super::resolve_intake_db_path()).expect("open db");
        let (stored_name, deal_name): (String, String) = conn
            .query_row(
                "SELECT o.name, d.name FROM organizations o
                 JOIN deals d ON d.organization_uuid = o.uuid
                 WHERE o.uuid = ?1",
                [record_id.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .expect("query saved intake");
        assert_eq!(stored_name, name);
        assert_eq!(deal_name, format!("Opportunity for {name}"));
    }

    #[test]
    fn form_save_rejects_incomplete_snapshot() {
        let empty = form_empty();
        let response = form_save(empty.snapshot_json.clone());
        assert!(!response.ok);
        assert_eq!(response.record_id, None);
        assert_eq!(response.snapshot_json, empty.snapshot_json);
        assert!(response.message.contains("organizationName"));
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
