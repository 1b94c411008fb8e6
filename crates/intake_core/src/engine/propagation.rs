//! Propagation of one field edit across dependent leaves.
//!
//! # Invariants
//! - Dependents are written in table order.
//! - Every transform reads the edited raw value, never a sibling's result.
//! - Dependents of dependents are never followed, so rule cycles such as
//!   `person.email <-> deal.email` terminate after one pass.
//! - Editing a leaf to its current value still clones and propagates.

use crate::model::form::FormSnapshot;
use crate::model::path::{resolve_mut, FieldPath, PathError};
use crate::model::value::FieldValue;
use crate::rules::dependency::dependency_table;
use crate::rules::transform::transform_for;
use log::debug;

/// Applies an edit at `path` and returns the next snapshot.
///
/// The returned snapshot is a full copy of `snapshot` with `raw_value`
/// written at `path` and each dependent leaf rewritten from `raw_value`
/// through its pair transform.
///
/// # Errors
/// Returns `PathError` only when a path does not resolve on the snapshot;
/// typed paths built by this crate always resolve.
pub fn apply_edit(
    snapshot: &FormSnapshot,
    path: FieldPath,
    raw_value: &FieldValue,
) -> Result<FormSnapshot, PathError> {
    let mut next = snapshot.clone();
    resolve_mut(&mut next, path)?.write(raw_value);

    let dependents = dependency_table().dependents_of(path);
    for dependent in dependents {
        let value = transform_for(path, *dependent).apply(raw_value);
        resolve_mut(&mut next, *dependent)?.write(&value);
    }

    debug!(
        "event=apply_edit module=engine status=ok path={} dependents={}",
        path,
        dependents.len()
    );
    Ok(next)
}

/// Parses `raw_path` and applies the edit.
///
/// Entry point for untyped paths coming from rendered inputs.
pub fn apply_edit_at(
    snapshot: &FormSnapshot,
    raw_path: &str,
    raw_value: &FieldValue,
) -> Result<FormSnapshot, PathError> {
    let path = FieldPath::parse(raw_path).map_err(|err| {
        debug!("event=apply_edit module=engine status=rejected error={err}");
        err
    })?;
    apply_edit(snapshot, path, raw_value)
}
