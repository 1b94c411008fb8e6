//! Persistence contracts for saved intakes.
//!
//! # Responsibility
//! - Define the save contract the intake form calls on submit.
//! - Provide the SQLite implementation of that contract.
//!
//! # Invariants
//! - Writes call `IntakeRecord::validate()` before touching storage.
//! - One intake is stored atomically or not at all.

pub mod intake_repo;
