//! Core logic for the organization/person/deal intake form.
//! This crate owns the form state rules; UI shells only render and forward.

pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod rules;
pub mod service;

pub use engine::propagation::{apply_edit, apply_edit_at};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::form::{
    DealRecord, DealStage, EntityRecord, FormSnapshot, LeafSlot, OrganizationRecord, PersonRecord,
};
pub use model::path::{resolve, resolve_mut, Entity, FieldPath, PathError};
pub use model::record::{IntakeRecord, IntakeValidationError};
pub use model::value::FieldValue;
pub use repo::intake_repo::{
    IntakeRepository, RecordId, RepoError, RepoResult, SqliteIntakeRepository,
};
pub use rules::dependency::{dependency_table, DependencyTable};
pub use rules::transform::{transform_for, Transform};
pub use service::intake_form::{ChangeNotification, IntakeForm, NavigationTarget, SaveOutcome};
pub use service::notify::{LogNotifier, Notifier, Toast, ToastVariant};
pub use service::property_search::{
    PropertyAddress, PropertyRow, PropertySearchForm, PropertySearchResponse, PropertySource,
    PropertySourceError, SearchCriteria, SearchTerm,
};

/// Minimal health-check API for shell integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
