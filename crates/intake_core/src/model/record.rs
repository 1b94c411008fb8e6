//! Flattened intake record submitted on save.
//!
//! # Responsibility
//! - Flatten a [`FormSnapshot`] into the 16 named fields expected by the
//!   persistence collaborator.
//! - Validate the record before any storage write.
//!
//! # Invariants
//! - Flattening is lossless for every snapshot leaf.
//! - Validation never mutates the record.

use crate::model::form::{DealStage, FormSnapshot, CLOSE_DATE_FORMAT};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static CLOSE_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid close date regex"));

/// Save payload with one flat field per snapshot leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeRecord {
    pub organization_name: String,
    pub organization_email: String,
    pub organization_phone: String,
    pub organization_category: String,
    pub organization_tier: String,

    pub person_first_name: String,
    pub person_last_name: String,
    pub person_email: String,
    pub person_phone: String,
    pub person_title: String,

    pub deal_name: String,
    pub deal_stage: String,
    pub deal_close_date: String,
    pub deal_amount: f64,
    pub deal_email: String,
    pub deal_phone: String,
}

impl From<&FormSnapshot> for IntakeRecord {
    fn from(snapshot: &FormSnapshot) -> Self {
        let FormSnapshot {
            organization,
            person,
            deal,
        } = snapshot;

        Self {
            organization_name: organization.name.clone(),
            organization_email: organization.email.clone(),
            organization_phone: organization.phone.clone(),
            organization_category: organization.category.clone(),
            organization_tier: organization.tier.clone(),
            person_first_name: person.first_name.clone(),
            person_last_name: person.last_name.clone(),
            person_email: person.email.clone(),
            person_phone: person.phone.clone(),
            person_title: person.title.clone(),
            deal_name: deal.name.clone(),
            deal_stage: deal.stage.clone(),
            deal_close_date: deal.close_date.clone(),
            deal_amount: deal.amount,
            deal_email: deal.email.clone(),
            deal_phone: deal.phone.clone(),
        }
    }
}

impl IntakeRecord {
    /// Validates storage-level invariants.
    ///
    /// # Errors
    /// - `MissingField` when a name the three records need is blank.
    /// - `InvalidStage` when `deal_stage` is not a known stage label.
    /// - `InvalidCloseDate` when `deal_close_date` is not a real `YYYY-MM-DD` date.
    /// - `NonFiniteAmount` when `deal_amount` is `NaN` or infinite.
    pub fn validate(&self) -> Result<(), IntakeValidationError> {
        require("organizationName", &self.organization_name)?;
        require("personLastName", &self.person_last_name)?;
        require("dealName", &self.deal_name)?;

        if DealStage::parse(&self.deal_stage).is_none() {
            return Err(IntakeValidationError::InvalidStage(self.deal_stage.clone()));
        }

        if !CLOSE_DATE_RE.is_match(&self.deal_close_date)
            || NaiveDate::parse_from_str(&self.deal_close_date, CLOSE_DATE_FORMAT).is_err()
        {
            return Err(IntakeValidationError::InvalidCloseDate(
                self.deal_close_date.clone(),
            ));
        }

        if !self.deal_amount.is_finite() {
            return Err(IntakeValidationError::NonFiniteAmount);
        }

        Ok(())
    }
}

fn require(field: &'static str, value: &str) -> Result<(), IntakeValidationError> {
    if value.trim().is_empty() {
        return Err(IntakeValidationError::MissingField(field));
    }
    Ok(())
}

/// Intake record invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeValidationError {
    MissingField(&'static str),
    InvalidStage(String),
    InvalidCloseDate(String),
    NonFiniteAmount,
}

impl Display for IntakeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::InvalidStage(stage) => write!(f, "unknown deal stage `{stage}`"),
            Self::InvalidCloseDate(value) => {
                write!(f, "deal close date `{value}` must be a YYYY-MM-DD date")
            }
            Self::NonFiniteAmount => write!(f, "deal amount must be a finite number"),
        }
    }
}

impl Error for IntakeValidationError {}
