//! Per-pair value transforms applied during propagation.

use crate::model::path::FieldPath;
use crate::model::value::FieldValue;

/// Deal amount granted per tier point.
const AMOUNT_PER_TIER_POINT: f64 = 100.0;
const DEAL_NAME_PREFIX: &str = "Opportunity for ";

/// How a dependent leaf's value is computed from the edited value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Mirror the edited value unchanged.
    Identity,
    /// Multiply the numeric view of the edited value.
    Scale(f64),
    /// Prepend a fixed prefix to the text view of the edited value.
    Prefix(&'static str),
}

impl Transform {
    /// Computes the dependent value from the edited raw value only.
    ///
    /// `Scale` on non-numeric text yields `NaN`; it is not validated here.
    pub fn apply(self, raw: &FieldValue) -> FieldValue {
        match self {
            Self::Identity => raw.clone(),
            Self::Scale(factor) => FieldValue::Number(raw.as_number() * factor),
            Self::Prefix(prefix) => FieldValue::Text(format!("{prefix}{}", raw.to_text())),
        }
    }
}

/// Returns the transform for one (source, dependent) pair.
///
/// Pairs without a dedicated policy mirror the value.
pub fn transform_for(source: FieldPath, dependent: FieldPath) -> Transform {
    match (source, dependent) {
        (FieldPath::ORGANIZATION_TIER, FieldPath::DEAL_AMOUNT) => {
            Transform::Scale(AMOUNT_PER_TIER_POINT)
        }
        (FieldPath::ORGANIZATION_NAME, FieldPath::DEAL_NAME) => Transform::Prefix(DEAL_NAME_PREFIX),
        _ => Transform::Identity,
    }
}
