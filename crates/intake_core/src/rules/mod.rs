//! Cross-entity dependency rules.
//!
//! # Responsibility
//! - Declare which leaves mirror or derive from which other leaves.
//! - Pick the value transform for each (source, dependent) pair.
//!
//! # Invariants
//! - The rule set is compiled in and never mutated at runtime.
//! - Every dependent path is a valid snapshot leaf.

pub mod dependency;
pub mod transform;
