//! Field edit propagation.
//!
//! # Responsibility
//! - Turn one field edit into the next immutable form snapshot.
//!
//! # Invariants
//! - The input snapshot is never mutated.
//! - Propagation is one level deep from the edited path.

pub mod propagation;
