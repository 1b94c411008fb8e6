//! Property search form controller.
//!
//! # Responsibility
//! - Collect address criteria and run a search against a property source.
//! - Track row selection and save the selected rows.
//!
//! # Invariants
//! - `is_loading` is false again whenever a search or save call returns.
//! - Search requires a zip code; save requires at least one selected row.
//! - Search results start unselected; selection is only set by the caller.
//! - A search that reaches the source replaces both results and selection,
//!   even when it finds nothing.

use crate::service::notify::{Notifier, Toast};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ZIP_REQUIRED_MESSAGE: &str = "Please enter a zip code to search for properties";
const NO_RESULTS_MESSAGE: &str = "No properties found for the given search criteria";
const SEARCH_FAILED_MESSAGE: &str = "An error occurred while searching properties";
const SELECTION_REQUIRED_MESSAGE: &str = "Please select at least one property to save";
const SAVE_EMPTY_MESSAGE: &str =
    "An error occurred while saving properties. Please try again later.";
const SAVE_FAILED_MESSAGE: &str = "An error occurred while saving properties";

/// Address used as the comparison anchor for a search.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PropertyAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Search request sent to the property source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    /// `"<city>, <state>"`.
    pub query: String,
    pub comp_address: PropertyAddress,
}

/// One property row as displayed in the result table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRow {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub property_type: String,
    pub year_built: Option<i32>,
    pub square_feet: Option<u32>,
    pub estimated_value: Option<f64>,
    #[serde(default)]
    pub selected: bool,
}

/// Search response envelope; `data` may be absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertySearchResponse {
    pub data: Option<Vec<PropertyRow>>,
}

/// Property source failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertySourceError {
    /// Rejected with a user-facing message.
    Rejected(String),
    /// Failed without a usable message.
    Unavailable,
}

impl PropertySourceError {
    fn message_or(&self, fallback: &str) -> String {
        match self {
            Self::Rejected(message) if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl Display for PropertySourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(message) => write!(f, "property source rejected request: {message}"),
            Self::Unavailable => write!(f, "property source unavailable"),
        }
    }
}

impl Error for PropertySourceError {}

/// External property search/save service.
pub trait PropertySource {
    fn search(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Option<PropertySearchResponse>, PropertySourceError>;

    /// Saves rows; returns one identifier per stored row.
    fn save(&self, rows: &[PropertyRow]) -> Result<Vec<String>, PropertySourceError>;
}

/// Search criteria input names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTerm {
    Street,
    City,
    State,
    Zip,
}

impl SearchTerm {
    /// Parses an input name (`street|city|state|zip`).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "street" => Some(Self::Street),
            "city" => Some(Self::City),
            "state" => Some(Self::State),
            "zip" => Some(Self::Zip),
            _ => None,
        }
    }
}

/// Property search form state.
#[derive(Debug, Clone, Default)]
pub struct PropertySearchForm {
    address: PropertyAddress,
    is_loading: bool,
    error: Option<String>,
    results: Vec<PropertyRow>,
    selected: Vec<PropertyRow>,
}

impl PropertySearchForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_term(&mut self, term: SearchTerm, value: impl Into<String>) {
        let value = value.into();
        match term {
            SearchTerm::Street => self.address.street = value,
            SearchTerm::City => self.address.city = value,
            SearchTerm::State => self.address.state = value,
            SearchTerm::Zip => self.address.zip = value,
        }
    }

    pub fn address(&self) -> &PropertyAddress {
        &self.address
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Last user-facing error, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn results(&self) -> &[PropertyRow] {
        &self.results
    }

    pub fn selected(&self) -> &[PropertyRow] {
        &self.selected
    }

    /// Criteria for the current address input.
    pub fn criteria(&self) -> SearchCriteria {
        SearchCriteria {
            query: format!("{}, {}", self.address.city, self.address.state),
            comp_address: self.address.clone(),
        }
    }

    /// Runs a search; outcome is reflected in `results()` and `error()`.
    pub fn search(&mut self, source: &impl PropertySource) {
        if self.address.zip.trim().is_empty() {
            self.error = Some(ZIP_REQUIRED_MESSAGE.to_string());
            return;
        }

        self.is_loading = true;
        self.error = None;
        let outcome = source.search(&self.criteria());
        self.is_loading = false;

        match outcome {
            Ok(response) => {
                let rows = response.and_then(|response| response.data).unwrap_or_default();
                self.results.clear();
                self.selected.clear();
                if rows.is_empty() {
                    self.error = Some(NO_RESULTS_MESSAGE.to_string());
                    info!("event=property_search module=service status=ok hits=0");
                    return;
                }
                info!(
                    "event=property_search module=service status=ok hits={}",
                    rows.len()
                );
                self.results = rows
                    .into_iter()
                    .map(|row| PropertyRow {
                        selected: false,
                        ..row
                    })
                    .collect();
            }
            Err(err) => {
                warn!("event=property_search module=service status=error error={err}");
                self.error = Some(err.message_or(SEARCH_FAILED_MESSAGE));
            }
        }
    }

    /// Replaces the selection with the rows picked in the result table.
    pub fn select_rows(&mut self, rows: Vec<PropertyRow>) {
        self.selected = rows
            .into_iter()
            .map(|row| PropertyRow {
                selected: true,
                ..row
            })
            .collect();
    }

    /// Saves the selected rows; returns the number stored.
    pub fn save(&mut self, source: &impl PropertySource, notifier: &impl Notifier) -> usize {
        if self.selected.is_empty() {
            self.error = Some(SELECTION_REQUIRED_MESSAGE.to_string());
            return 0;
        }

        self.is_loading = true;
        let outcome = source.save(&self.selected);
        self.is_loading = false;

        match outcome {
            Ok(ids) if ids.is_empty() => {
                self.error = Some(SAVE_EMPTY_MESSAGE.to_string());
                warn!("event=property_save module=service status=error error_code=empty_result");
                0
            }
            Ok(ids) => {
                notifier.notify(Toast::success(format!(
                    "{} property(s) saved successfully",
                    ids.len()
                )));
                self.selected.clear();
                info!(
                    "event=property_save module=service status=ok saved={}",
                    ids.len()
                );
                ids.len()
            }
            Err(err) => {
                warn!("event=property_save module=service status=error error={err}");
                self.error = Some(err.message_or(SAVE_FAILED_MESSAGE));
                0
            }
        }
    }
}
