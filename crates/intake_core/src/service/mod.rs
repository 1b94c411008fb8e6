//! Form controllers used by the UI shell.
//!
//! # Responsibility
//! - Own form state between UI events and route edits through the engine.
//! - Talk to persistence/search collaborators and report outcomes as toasts.
//!
//! # Invariants
//! - Collaborators are reached through traits; controllers stay storage-agnostic.

pub mod intake_form;
pub mod notify;
pub mod property_search;
