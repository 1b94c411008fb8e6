//! Intake form domain model.
//!
//! # Responsibility
//! - Define the nested form snapshot shared by the organization, person and
//!   deal sections of the intake form.
//! - Address individual leaves through typed dot-paths.
//! - Flatten a snapshot into the record shape submitted for persistence.
//!
//! # Invariants
//! - Every leaf has exactly one `<entity>.<field>` path.
//! - Snapshots are replaced, never shared mutably between edits.

pub mod form;
pub mod path;
pub mod record;
pub mod value;
