//! Form snapshot model.
//!
//! # Responsibility
//! - Define the three entity sections edited by the intake form.
//! - Provide the empty snapshot used at mount and after a successful save.
//! - Expose per-field read/write slots used by the path resolver.
//!
//! # Invariants
//! - A fresh snapshot has `deal.stage = "Prospecting"`, `deal.amount = 0` and
//!   `deal.closeDate` set to the creation date.
//! - `Clone` copies every owned field; clones share no mutable state.

use crate::model::value::FieldValue;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// ISO calendar date format used by `deal.closeDate`.
pub const CLOSE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Sales stage for the deal section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum DealStage {
    #[default]
    Prospecting,
    Qualification,
    NeedsAnalysis,
    ValueProposition,
    ClosedWon,
    ClosedLost,
}

impl DealStage {
    /// All stages in picker display order.
    pub const ALL: [DealStage; 6] = [
        Self::Prospecting,
        Self::Qualification,
        Self::NeedsAnalysis,
        Self::ValueProposition,
        Self::ClosedWon,
        Self::ClosedLost,
    ];

    /// Stable label, used both for display and as the stored value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prospecting => "Prospecting",
            Self::Qualification => "Qualification",
            Self::NeedsAnalysis => "Needs Analysis",
            Self::ValueProposition => "Value Proposition",
            Self::ClosedWon => "Closed Won",
            Self::ClosedLost => "Closed Lost",
        }
    }

    /// Parses an exact stage label.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.as_str() == value)
    }
}

/// Mutable view of one leaf, handed out by the path resolver.
#[derive(Debug)]
pub enum LeafSlot<'a> {
    Text(&'a mut String),
    Number(&'a mut f64),
}

impl LeafSlot<'_> {
    /// Writes `value` into the leaf, coercing to the leaf's storage type.
    pub fn write(self, value: &FieldValue) {
        match self {
            Self::Text(slot) => *slot = value.to_text(),
            Self::Number(slot) => *slot = value.as_number(),
        }
    }
}

/// Field-level access shared by the three entity sections.
pub trait EntityRecord {
    /// Field names in declaration order.
    const FIELDS: &'static [&'static str];

    /// Reads one field by name.
    fn leaf(&self, field: &str) -> Option<FieldValue>;

    /// Returns a writable slot for one field by name.
    fn leaf_mut(&mut self, field: &str) -> Option<LeafSlot<'_>>;
}

/// Organization section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Free-text industry/category.
    pub category: String,
    /// Ordinal rating category; drives `deal.amount`.
    pub tier: String,
}

impl EntityRecord for OrganizationRecord {
    const FIELDS: &'static [&'static str] = &["name", "email", "phone", "category", "tier"];

    fn leaf(&self, field: &str) -> Option<FieldValue> {
        let value = match field {
            "name" => &self.name,
            "email" => &self.email,
            "phone" => &self.phone,
            "category" => &self.category,
            "tier" => &self.tier,
            _ => return None,
        };
        Some(FieldValue::Text(value.clone()))
    }

    fn leaf_mut(&mut self, field: &str) -> Option<LeafSlot<'_>> {
        let slot = match field {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "category" => &mut self.category,
            "tier" => &mut self.tier,
            _ => return None,
        };
        Some(LeafSlot::Text(slot))
    }
}

/// Contact person section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub title: String,
}

impl EntityRecord for PersonRecord {
    const FIELDS: &'static [&'static str] = &["firstName", "lastName", "email", "phone", "title"];

    fn leaf(&self, field: &str) -> Option<FieldValue> {
        let value = match field {
            "firstName" => &self.first_name,
            "lastName" => &self.last_name,
            "email" => &self.email,
            "phone" => &self.phone,
            "title" => &self.title,
            _ => return None,
        };
        Some(FieldValue::Text(value.clone()))
    }

    fn leaf_mut(&mut self, field: &str) -> Option<LeafSlot<'_>> {
        let slot = match field {
            "firstName" => &mut self.first_name,
            "lastName" => &mut self.last_name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "title" => &mut self.title,
            _ => return None,
        };
        Some(LeafSlot::Text(slot))
    }
}

/// Deal/opportunity section.
///
/// `stage` stays a plain string: edits are written verbatim and only the
/// persistence boundary checks it against [`DealStage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealRecord {
    pub name: String,
    pub stage: String,
    /// ISO `YYYY-MM-DD` date.
    pub close_date: String,
    /// May hold `NaN` after a non-numeric tier edit. Serialized as `null`.
    #[serde(
        serialize_with = "serialize_amount",
        deserialize_with = "deserialize_amount"
    )]
    pub amount: f64,
    pub email: String,
    pub phone: String,
}

impl DealRecord {
    /// Creates the default deal section for a form opened on `today`.
    pub fn opened_on(today: NaiveDate) -> Self {
        Self {
            name: String::new(),
            stage: DealStage::default().as_str().to_string(),
            close_date: today.format(CLOSE_DATE_FORMAT).to_string(),
            amount: 0.0,
            email: String::new(),
            phone: String::new(),
        }
    }
}

impl EntityRecord for DealRecord {
    const FIELDS: &'static [&'static str] =
        &["name", "stage", "closeDate", "amount", "email", "phone"];

    fn leaf(&self, field: &str) -> Option<FieldValue> {
        let value = match field {
            "name" => &self.name,
            "stage" => &self.stage,
            "closeDate" => &self.close_date,
            "amount" => return Some(FieldValue::Number(self.amount)),
            "email" => &self.email,
            "phone" => &self.phone,
            _ => return None,
        };
        Some(FieldValue::Text(value.clone()))
    }

    fn leaf_mut(&mut self, field: &str) -> Option<LeafSlot<'_>> {
        let slot = match field {
            "name" => &mut self.name,
            "stage" => &mut self.stage,
            "closeDate" => &mut self.close_date,
            "amount" => return Some(LeafSlot::Number(&mut self.amount)),
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            _ => return None,
        };
        Some(LeafSlot::Text(slot))
    }
}

/// Complete intake form state at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSnapshot {
    pub organization: OrganizationRecord,
    pub person: PersonRecord,
    pub deal: DealRecord,
}

impl FormSnapshot {
    /// Creates an empty snapshot dated today (UTC).
    pub fn empty() -> Self {
        Self::opened_on(Utc::now().date_naive())
    }

    /// Creates an empty snapshot with `deal.closeDate = today`.
    pub fn opened_on(today: NaiveDate) -> Self {
        Self {
            organization: OrganizationRecord::default(),
            person: PersonRecord::default(),
            deal: DealRecord::opened_on(today),
        }
    }
}

fn serialize_amount<S: Serializer>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if amount.is_finite() {
        serializer.serialize_f64(*amount)
    } else {
        serializer.serialize_none()
    }
}

fn deserialize_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}
