//! Dot-path addressing for snapshot leaves.
//!
//! # Responsibility
//! - Parse `<entity>.<field>` strings into typed [`FieldPath`] values.
//! - Resolve a path against a snapshot to a readable value or writable slot.
//!
//! # Invariants
//! - A `FieldPath` always names an existing leaf; parsing is the only way to
//!   build one from untrusted input.
//! - Resolution has no side effects.

use crate::model::form::{
    DealRecord, EntityRecord, FormSnapshot, LeafSlot, OrganizationRecord, PersonRecord,
};
use crate::model::value::FieldValue;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const PATH_SEPARATOR: char = '.';

/// Top-level section of the form snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Entity {
    Organization,
    Person,
    Deal,
}

impl Entity {
    /// Path segment naming this section.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::Person => "person",
            Self::Deal => "deal",
        }
    }

    /// Leaf field names declared by this section.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Organization => OrganizationRecord::FIELDS,
            Self::Person => PersonRecord::FIELDS,
            Self::Deal => DealRecord::FIELDS,
        }
    }

    fn parse(segment: &str) -> Option<Self> {
        match segment {
            "organization" => Some(Self::Organization),
            "person" => Some(Self::Person),
            "deal" => Some(Self::Deal),
            _ => None,
        }
    }
}

/// Typed address of one snapshot leaf, e.g. `organization.email`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath {
    entity: Entity,
    field: &'static str,
}

impl FieldPath {
    pub const ORGANIZATION_NAME: Self = Self::leaf(Entity::Organization, "name");
    pub const ORGANIZATION_EMAIL: Self = Self::leaf(Entity::Organization, "email");
    pub const ORGANIZATION_PHONE: Self = Self::leaf(Entity::Organization, "phone");
    pub const ORGANIZATION_CATEGORY: Self = Self::leaf(Entity::Organization, "category");
    pub const ORGANIZATION_TIER: Self = Self::leaf(Entity::Organization, "tier");

    pub const PERSON_FIRST_NAME: Self = Self::leaf(Entity::Person, "firstName");
    pub const PERSON_LAST_NAME: Self = Self::leaf(Entity::Person, "lastName");
    pub const PERSON_EMAIL: Self = Self::leaf(Entity::Person, "email");
    pub const PERSON_PHONE: Self = Self::leaf(Entity::Person, "phone");
    pub const PERSON_TITLE: Self = Self::leaf(Entity::Person, "title");

    pub const DEAL_NAME: Self = Self::leaf(Entity::Deal, "name");
    pub const DEAL_STAGE: Self = Self::leaf(Entity::Deal, "stage");
    pub const DEAL_CLOSE_DATE: Self = Self::leaf(Entity::Deal, "closeDate");
    pub const DEAL_AMOUNT: Self = Self::leaf(Entity::Deal, "amount");
    pub const DEAL_EMAIL: Self = Self::leaf(Entity::Deal, "email");
    pub const DEAL_PHONE: Self = Self::leaf(Entity::Deal, "phone");

    const fn leaf(entity: Entity, field: &'static str) -> Self {
        Self { entity, field }
    }

    /// Parses a dot-delimited path and checks it against the snapshot shape.
    ///
    /// # Errors
    /// - `Empty` for blank input.
    /// - `TooShallow` when the path has no field segment.
    /// - `UnknownEntity` / `UnknownField` when a segment names nothing.
    /// - `PastLeaf` when segments continue below a scalar field.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.trim().is_empty() {
            return Err(PathError::Empty);
        }

        let mut segments = raw.split(PATH_SEPARATOR);
        let entity_segment = segments.next().unwrap_or_default();
        let field_segment = segments
            .next()
            .ok_or_else(|| PathError::TooShallow(raw.to_string()))?;

        let entity = Entity::parse(entity_segment)
            .ok_or_else(|| PathError::UnknownEntity(entity_segment.to_string()))?;
        let field = entity
            .fields()
            .iter()
            .copied()
            .find(|candidate| *candidate == field_segment)
            .ok_or_else(|| PathError::UnknownField {
                entity,
                field: field_segment.to_string(),
            })?;

        if segments.next().is_some() {
            return Err(PathError::PastLeaf(raw.to_string()));
        }

        Ok(Self { entity, field })
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Enumerates every leaf path of the snapshot shape.
    pub fn all() -> impl Iterator<Item = FieldPath> {
        [Entity::Organization, Entity::Person, Entity::Deal]
            .into_iter()
            .flat_map(|entity| {
                entity
                    .fields()
                    .iter()
                    .map(move |field| Self::leaf(entity, *field))
            })
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{PATH_SEPARATOR}{}", self.entity.as_str(), self.field)
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Malformed or unknown field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    Empty,
    TooShallow(String),
    UnknownEntity(String),
    UnknownField { entity: Entity, field: String },
    PastLeaf(String),
}

impl Display for PathError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "field path must not be empty"),
            Self::TooShallow(path) => {
                write!(f, "field path `{path}` must have the form <entity>.<field>")
            }
            Self::UnknownEntity(segment) => write!(f, "unknown form section `{segment}`"),
            Self::UnknownField { entity, field } => {
                write!(f, "section `{}` has no field `{field}`", entity.as_str())
            }
            Self::PastLeaf(path) => {
                write!(f, "field path `{path}` continues past a scalar field")
            }
        }
    }
}

impl Error for PathError {}

/// Resolves `path` to a writable slot inside `root`.
///
/// Walks the entity segment to its section record, then hands back the slot
/// for the final field segment.
pub fn resolve_mut(root: &mut FormSnapshot, path: FieldPath) -> Result<LeafSlot<'_>, PathError> {
    let slot = match path.entity {
        Entity::Organization => root.organization.leaf_mut(path.field),
        Entity::Person => root.person.leaf_mut(path.field),
        Entity::Deal => root.deal.leaf_mut(path.field),
    };
    slot.ok_or_else(|| unknown_field(path))
}

/// Reads the current value at `path`.
pub fn resolve(root: &FormSnapshot, path: FieldPath) -> Result<FieldValue, PathError> {
    let value = match path.entity {
        Entity::Organization => root.organization.leaf(path.field),
        Entity::Person => root.person.leaf(path.field),
        Entity::Deal => root.deal.leaf(path.field),
    };
    value.ok_or_else(|| unknown_field(path))
}

fn unknown_field(path: FieldPath) -> PathError {
    PathError::UnknownField {
        entity: path.entity,
        field: path.field.to_string(),
    }
}
