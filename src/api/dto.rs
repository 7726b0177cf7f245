//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::dashboard::FilterOptions;
use crate::data::{parse_date, DateRange, FilterSelection, HousingRecord};

// ============================================
// SELECTION DTOs
// ============================================

/// Widget values as query parameters or a WebSocket payload
///
/// Omitted fields take the widgets' initial values.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct SelectionParams {
    /// State abbreviation
    #[serde(default)]
    pub state: Option<String>,
    /// Comma-separated property types; an empty string selects none
    #[serde(default)]
    pub types: Option<String>,
    /// Range start (YYYY-MM-DD)
    #[serde(default)]
    pub start: Option<String>,
    /// Range end (YYYY-MM-DD)
    #[serde(default)]
    pub end: Option<String>,
}

impl SelectionParams {
    /// Fill in defaults from the widget options and parse dates
    pub fn resolve(&self, options: &FilterOptions) -> ApiResult<FilterSelection> {
        let defaults = options.default_selection();

        let state = self.state.clone().unwrap_or(defaults.state);

        let property_types = match &self.types {
            Some(types) => {
                let mut selected: Vec<String> = Vec::new();
                for t in types.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                    if !selected.iter().any(|s| s == t) {
                        selected.push(t.to_string());
                    }
                }
                selected
            }
            None => defaults.property_types,
        };

        let start = match &self.start {
            Some(s) => parse_param_date("start", s)?,
            None => defaults.date_range.start,
        };
        let end = match &self.end {
            Some(s) => parse_param_date("end", s)?,
            None => defaults.date_range.end,
        };

        Ok(FilterSelection::new(
            state,
            property_types,
            DateRange::new(start, end),
        ))
    }
}

fn parse_param_date(name: &str, value: &str) -> ApiResult<chrono::NaiveDate> {
    parse_date(value).ok_or_else(|| {
        ApiError::Validation(format!("Cannot parse {} date: {}", name, value))
    })
}

/// Table export parameters
#[derive(Debug, Deserialize)]
pub struct TableParams {
    #[serde(flatten)]
    pub selection: SelectionParams,
    /// Format: json or csv
    #[serde(default = "default_table_format")]
    pub format: String,
}

fn default_table_format() -> String {
    "json".to_string()
}

// ============================================
// RESPONSE DTOs
// ============================================

/// Widget options and initial selection
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub options: FilterOptions,
    pub default_selection: FilterSelection,
}

/// Filtered table response (JSON format)
#[derive(Debug, Serialize)]
pub struct TableResponse {
    /// e.g. "Filtered Data for CA"
    pub caption: String,
    pub rows: Vec<HousingRecord>,
    pub row_count: usize,
}

/// Cache invalidation response
#[derive(Debug, Serialize)]
pub struct InvalidateResponse {
    pub status: String,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, unhealthy
    pub status: String,
    /// Primary dataset status: ok, error
    pub housing_data: String,
    /// Whether the primary dataset is currently cached
    pub cached: bool,
    /// Configured listen address
    pub address: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn options() -> FilterOptions {
        FilterOptions {
            states: vec!["CA".to_string(), "TX".to_string()],
            property_types: vec!["Condo".to_string(), "Single Family".to_string()],
            date_bounds: DateRange::new(
                NaiveDate::from_ymd_opt(2020, 1, 31).unwrap(),
                NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
            ),
        }
    }

    #[test]
    fn test_resolve_defaults() {
        let selection = SelectionParams::default().resolve(&options()).unwrap();
        assert_eq!(selection, options().default_selection());
    }

    #[test]
    fn test_resolve_explicit_values() {
        let params = SelectionParams {
            state: Some("TX".to_string()),
            types: Some("Condo, ".to_string()),
            start: Some("2020-03-01".to_string()),
            end: None,
        };
        let selection = params.resolve(&options()).unwrap();
        assert_eq!(selection.state, "TX");
        assert_eq!(selection.property_types, vec!["Condo"]);
        assert_eq!(selection.date_range.start, NaiveDate::from_ymd_opt(2020, 3, 1).unwrap());
        assert_eq!(selection.date_range.end, NaiveDate::from_ymd_opt(2020, 12, 31).unwrap());
    }

    #[test]
    fn test_resolve_repeated_types_keep_first_occurrence() {
        let params = SelectionParams {
            types: Some("Single Family,Condo,Single Family, Condo".to_string()),
            ..Default::default()
        };
        let selection = params.resolve(&options()).unwrap();
        assert_eq!(selection.property_types, vec!["Single Family", "Condo"]);
        assert!(options().validate(&selection).is_ok());
    }

    #[test]
    fn test_resolve_empty_types() {
        let params = SelectionParams {
            types: Some(String::new()),
            ..Default::default()
        };
        assert!(params.resolve(&options()).unwrap().property_types.is_empty());
    }

    #[test]
    fn test_resolve_bad_date() {
        let params = SelectionParams {
            start: Some("yesterday".to_string()),
            ..Default::default()
        };
        assert!(matches!(params.resolve(&options()), Err(ApiError::Validation(_))));
    }
}
