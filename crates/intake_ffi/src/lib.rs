//! Flutter-facing bindings for the intake core.

pub mod api;
