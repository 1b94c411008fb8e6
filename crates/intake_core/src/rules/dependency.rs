//! Dependency table between snapshot leaves.
//!
//! # Responsibility
//! - Map each source leaf to the ordered leaves it influences.
//! - Validate the compiled-in rules once, when the table is first used.
//!
//! # Invariants
//! - Lookups for unknown sources return an empty slice.
//! - Dependents keep declaration order.
//! - A source never lists itself and is declared at most once.

use crate::model::form::FormSnapshot;
use crate::model::path::{resolve, FieldPath};
use log::info;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One authored dependency rule.
#[derive(Debug, Clone, Copy)]
pub struct DependencyRule {
    pub source: FieldPath,
    pub dependents: &'static [FieldPath],
}

const DEPENDENCY_RULES: &[DependencyRule] = &[
    DependencyRule {
        source: FieldPath::ORGANIZATION_NAME,
        dependents: &[FieldPath::PERSON_LAST_NAME, FieldPath::DEAL_NAME],
    },
    DependencyRule {
        source: FieldPath::ORGANIZATION_EMAIL,
        dependents: &[FieldPath::PERSON_EMAIL, FieldPath::DEAL_EMAIL],
    },
    DependencyRule {
        source: FieldPath::ORGANIZATION_PHONE,
        dependents: &[FieldPath::PERSON_PHONE, FieldPath::DEAL_PHONE],
    },
    DependencyRule {
        source: FieldPath::PERSON_EMAIL,
        dependents: &[FieldPath::ORGANIZATION_EMAIL, FieldPath::DEAL_EMAIL],
    },
    DependencyRule {
        source: FieldPath::PERSON_PHONE,
        dependents: &[FieldPath::ORGANIZATION_PHONE, FieldPath::DEAL_PHONE],
    },
    DependencyRule {
        source: FieldPath::DEAL_EMAIL,
        dependents: &[FieldPath::ORGANIZATION_EMAIL, FieldPath::PERSON_EMAIL],
    },
    DependencyRule {
        source: FieldPath::DEAL_PHONE,
        dependents: &[FieldPath::ORGANIZATION_PHONE, FieldPath::PERSON_PHONE],
    },
    DependencyRule {
        source: FieldPath::ORGANIZATION_TIER,
        dependents: &[FieldPath::DEAL_AMOUNT],
    },
];

static DEPENDENCY_TABLE: Lazy<DependencyTable> = Lazy::new(|| {
    let table = DependencyTable::from_rules(DEPENDENCY_RULES)
        .expect("compiled-in dependency rules must be valid");
    info!(
        "event=dependency_table_ready module=rules status=ok sources={} edges={}",
        table.len(),
        table.edge_count()
    );
    table
});

/// Returns the process-wide dependency table.
pub fn dependency_table() -> &'static DependencyTable {
    &DEPENDENCY_TABLE
}

/// Validated, read-only index from source leaf to dependents.
#[derive(Debug, Clone, Default)]
pub struct DependencyTable {
    index: BTreeMap<FieldPath, &'static [FieldPath]>,
}

impl DependencyTable {
    /// Builds a table from authored rules, rejecting rules that could not
    /// have been meant.
    ///
    /// # Errors
    /// - `DuplicateSource` when a source is declared twice.
    /// - `SelfDependency` when a source lists itself.
    /// - `DuplicateDependent` when a dependent repeats within one rule.
    /// - `Unresolvable` when a path does not resolve on an empty snapshot.
    pub fn from_rules(rules: &[DependencyRule]) -> Result<Self, DependencyTableError> {
        let probe = FormSnapshot::empty();
        let mut index = BTreeMap::new();

        for rule in rules {
            check_resolvable(&probe, rule.source)?;
            for (position, dependent) in rule.dependents.iter().enumerate() {
                check_resolvable(&probe, *dependent)?;
                if *dependent == rule.source {
                    return Err(DependencyTableError::SelfDependency(rule.source));
                }
                if rule.dependents[..position].contains(dependent) {
                    return Err(DependencyTableError::DuplicateDependent {
                        source: rule.source,
                        dependent: *dependent,
                    });
                }
            }
            if index.insert(rule.source, rule.dependents).is_some() {
                return Err(DependencyTableError::DuplicateSource(rule.source));
            }
        }

        Ok(Self { index })
    }

    /// Ordered dependents of `source`; empty when `source` has no rule.
    pub fn dependents_of(&self, source: FieldPath) -> &'static [FieldPath] {
        self.index.get(&source).copied().unwrap_or(&[])
    }

    /// Number of source leaves with at least one rule.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Total number of (source, dependent) pairs.
    pub fn edge_count(&self) -> usize {
        self.index.values().map(|dependents| dependents.len()).sum()
    }

    /// Source leaves in path order.
    pub fn sources(&self) -> impl Iterator<Item = FieldPath> + '_ {
        self.index.keys().copied()
    }
}

fn check_resolvable(probe: &FormSnapshot, path: FieldPath) -> Result<(), DependencyTableError> {
    resolve(probe, path)
        .map(|_| ())
        .map_err(|_| DependencyTableError::Unresolvable(path))
}

/// Authoring errors in a dependency rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyTableError {
    DuplicateSource(FieldPath),
    SelfDependency(FieldPath),
    DuplicateDependent {
        source: FieldPath,
        dependent: FieldPath,
    },
    Unresolvable(FieldPath),
}

impl Display for DependencyTableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateSource(path) => write!(f, "dependency source `{path}` declared twice"),
            Self::SelfDependency(path) => write!(f, "dependency source `{path}` lists itself"),
            Self::DuplicateDependent { source, dependent } => write!(
                f,
                "dependency source `{source}` lists `{dependent}` more than once"
            ),
            Self::Unresolvable(path) => write!(f, "dependency path `{path}` does not resolve"),
        }
    }
}

impl Error for DependencyTableError {}

#[cfg(test)]
mod tests {
    use super::{dependency_table, DependencyRule, DependencyTable, DependencyTableError};
    use crate::model::path::FieldPath;

    #[test]
    fn compiled_rules_build_the_expected_table() {
        let table = dependency_table();
        assert_eq!(table.len(), 8);
        assert_eq!(table.edge_count(), 15);
        assert_eq!(
            table.dependents_of(FieldPath::ORGANIZATION_NAME),
            &[FieldPath::PERSON_LAST_NAME, FieldPath::DEAL_NAME]
        );
        assert_eq!(
            table.dependents_of(FieldPath::DEAL_PHONE),
            &[FieldPath::ORGANIZATION_PHONE, FieldPath::PERSON_PHONE]
        );
        assert_eq!(
            table.dependents_of(FieldPath::ORGANIZATION_TIER),
            &[FieldPath::DEAL_AMOUNT]
        );
    }

    #[test]
    fn unknown_source_has_no_dependents() {
        let table = dependency_table();
        assert!(table.dependents_of(FieldPath::PERSON_TITLE).is_empty());
        assert!(table.dependents_of(FieldPath::DEAL_AMOUNT).is_empty());
    }

    #[test]
    fn table_is_closed_over_snapshot_leaves() {
        let leaves = FieldPath::all().collect::<Vec<_>>();
        let table = dependency_table();
        for source in table.sources() {
            assert!(leaves.contains(&source));
            for dependent in table.dependents_of(source) {
                assert!(leaves.contains(dependent), "{dependent} is not a leaf");
            }
        }
    }

    #[test]
    fn from_rules_rejects_duplicate_sources() {
        let rules = [
            DependencyRule {
                source: FieldPath::PERSON_EMAIL,
                dependents: &[FieldPath::DEAL_EMAIL],
            },
            DependencyRule {
                source: FieldPath::PERSON_EMAIL,
                dependents: &[FieldPath::ORGANIZATION_EMAIL],
            },
        ];
        let err = DependencyTable::from_rules(&rules).expect_err("duplicate source must fail");
        assert_eq!(
            err,
            DependencyTableError::DuplicateSource(FieldPath::PERSON_EMAIL)
        );
    }

    #[test]
    fn from_rules_rejects_self_and_repeated_dependents() {
        let self_rule = [DependencyRule {
            source: FieldPath::DEAL_EMAIL,
            dependents: &[FieldPath::DEAL_EMAIL],
        }];
        assert_eq!(
            DependencyTable::from_rules(&self_rule).expect_err("self dependency must fail"),
            DependencyTableError::SelfDependency(FieldPath::DEAL_EMAIL)
        );

        let repeated = [DependencyRule {
            source: FieldPath::DEAL_EMAIL,
            dependents: &[FieldPath::PERSON_EMAIL, FieldPath::PERSON_EMAIL],
        }];
        assert!(matches!(
            DependencyTable::from_rules(&repeated),
            Err(DependencyTableError::DuplicateDependent { .. })
        ));
    }
}
