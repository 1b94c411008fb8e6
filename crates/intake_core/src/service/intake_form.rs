//! Intake form controller.
//!
//! # Responsibility
//! - Hold the current snapshot and replace it on every field edit.
//! - Accept edits from rendered inputs and from child section components.
//! - Submit the flattened snapshot and report the outcome.
//!
//! # Invariants
//! - The snapshot is replaced through the propagation engine only.
//! - A failed save leaves the snapshot untouched.
//! - The snapshot resets to empty only after a save returns an identifier.

use crate::engine::propagation::{apply_edit, apply_edit_at};
use crate::model::form::FormSnapshot;
use crate::model::path::{FieldPath, PathError};
use crate::model::record::IntakeRecord;
use crate::model::value::FieldValue;
use crate::repo::intake_repo::{IntakeRepository, RecordId};
use crate::service::notify::{Notifier, Toast};
use log::{info, warn};
use serde::{Deserialize, Serialize};

const SAVED_MESSAGE: &str = "Records created successfully";
const MISSING_ID_MESSAGE: &str = "No organization ID returned";
const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Change event emitted by a child section component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeNotification {
    /// Dot-path of the edited leaf, e.g. `person.email`.
    pub field: String,
    pub value: FieldValue,
}

/// Page to open after a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    pub record_id: RecordId,
    pub object_name: &'static str,
    pub action: &'static str,
}

impl NavigationTarget {
    fn organization_view(record_id: RecordId) -> Self {
        Self {
            record_id,
            object_name: "organization",
            action: "view",
        }
    }
}

/// Result of one save attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Stored; the form was reset.
    Saved(NavigationTarget),
    /// The store answered without an identifier.
    MissingId,
    /// The store rejected the save with this message.
    Failed(String),
}

/// Controller for the three-section intake form.
pub struct IntakeForm<R: IntakeRepository, N: Notifier> {
    snapshot: FormSnapshot,
    repo: R,
    notifier: N,
}

impl<R: IntakeRepository, N: Notifier> IntakeForm<R, N> {
    /// Mounts a form with an empty snapshot.
    pub fn new(repo: R, notifier: N) -> Self {
        Self::with_snapshot(FormSnapshot::empty(), repo, notifier)
    }

    /// Mounts a form on an existing snapshot.
    pub fn with_snapshot(snapshot: FormSnapshot, repo: R, notifier: N) -> Self {
        Self {
            snapshot,
            repo,
            notifier,
        }
    }

    /// Current read-only snapshot for rendering.
    pub fn snapshot(&self) -> &FormSnapshot {
        &self.snapshot
    }

    /// Handles an edit from a rendered input addressed by dot-path.
    ///
    /// # Errors
    /// Returns `PathError` for paths outside the form shape; the snapshot is
    /// left unchanged.
    pub fn on_field_edit(
        &mut self,
        path: &str,
        raw_value: impl Into<FieldValue>,
    ) -> Result<(), PathError> {
        self.snapshot = apply_edit_at(&self.snapshot, path, &raw_value.into())?;
        Ok(())
    }

    /// Handles an edit addressed by typed path.
    pub fn edit(
        &mut self,
        path: FieldPath,
        raw_value: impl Into<FieldValue>,
    ) -> Result<(), PathError> {
        self.snapshot = apply_edit(&self.snapshot, path, &raw_value.into())?;
        Ok(())
    }

    /// Handles a change event from a child section component.
    pub fn on_child_change(&mut self, change: ChangeNotification) -> Result<(), PathError> {
        self.snapshot = apply_edit_at(&self.snapshot, &change.field, &change.value)?;
        Ok(())
    }

    /// Flattened record for the current snapshot.
    pub fn record(&self) -> IntakeRecord {
        IntakeRecord::from(&self.snapshot)
    }

    /// Submits the current snapshot.
    ///
    /// # Side effects
    /// - Calls the repository once.
    /// - Emits exactly one toast.
    /// - Resets the snapshot on success only.
    pub fn save(&mut self) -> SaveOutcome {
        info!("event=intake_save module=service status=start");

        match self.repo.create_records(&self.record()) {
            Ok(Some(record_id)) => {
                self.snapshot = FormSnapshot::empty();
                self.notifier.notify(Toast::success(SAVED_MESSAGE));
                info!("event=intake_save module=service status=ok record_id={record_id}");
                SaveOutcome::Saved(NavigationTarget::organization_view(record_id))
            }
            Ok(None) => {
                self.notifier.notify(Toast::error(MISSING_ID_MESSAGE));
                warn!("event=intake_save module=service status=error error_code=missing_id");
                SaveOutcome::MissingId
            }
            Err(err) => {
                let mut message = err.to_string();
                if message.trim().is_empty() {
                    message = UNKNOWN_ERROR_MESSAGE.to_string();
                }
                self.notifier.notify(Toast::error(message.clone()));
                warn!("event=intake_save module=service status=error error_code=store_rejected");
                SaveOutcome::Failed(message)
            }
        }
    }

    /// Discards all edits.
    pub fn reset(&mut self) {
        self.snapshot = FormSnapshot::empty();
    }
}
