//! Filter Engine
//!
//! Sidebar widget options derived from the primary table, selection
//! validation, and the conjunctive state / date / type filter.

use super::error::{DashboardError, DashboardResult};
use crate::data::{DateRange, FilterSelection, HousingRecord};
use serde::{Deserialize, Serialize};

/// Choices offered by the sidebar widgets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterOptions {
    /// Distinct states, in order of first appearance
    pub states: Vec<String>,
    /// Distinct property types, in order of first appearance
    pub property_types: Vec<String>,
    /// Earliest and latest date in the dataset
    pub date_bounds: DateRange,
}

impl FilterOptions {
    /// Derive widget options from the primary table
    pub fn from_records(records: &[HousingRecord]) -> DashboardResult<Self> {
        let first = records.first().ok_or(DashboardError::EmptyDataset)?;

        let mut states: Vec<String> = Vec::new();
        let mut property_types: Vec<String> = Vec::new();
        let mut bounds = DateRange::new(first.date, first.date);

        for record in records {
            if !states.contains(&record.state) {
                states.push(record.state.clone());
            }
            if !property_types.contains(&record.property_type) {
                property_types.push(record.property_type.clone());
            }
            bounds.start = bounds.start.min(record.date);
            bounds.end = bounds.end.max(record.date);
        }

        Ok(Self {
            states,
            property_types,
            date_bounds: bounds,
        })
    }

    /// The selection the widgets start with: first state, every type, full range
    pub fn default_selection(&self) -> FilterSelection {
        FilterSelection {
            state: self.states.first().cloned().unwrap_or_default(),
            property_types: self.property_types.clone(),
            date_range: self.date_bounds,
        }
    }

    /// Reject selections the widgets could not have produced
    pub fn validate(&self, selection: &FilterSelection) -> DashboardResult<()> {
        if !self.states.contains(&selection.state) {
            return Err(DashboardError::InvalidSelection(format!(
                "unknown state '{}'",
                selection.state
            )));
        }

        if let Some(unknown) = selection
            .property_types
            .iter()
            .find(|t| !self.property_types.contains(t))
        {
            return Err(DashboardError::InvalidSelection(format!(
                "unknown property type '{}'",
                unknown
            )));
        }

        if let Some((_, repeated)) = selection
            .property_types
            .iter()
            .enumerate()
            .find(|(i, t)| selection.property_types[..*i].contains(t))
        {
            return Err(DashboardError::InvalidSelection(format!(
                "property type '{}' selected more than once",
                repeated
            )));
        }

        if selection.date_range.is_reversed() {
            return Err(DashboardError::InvalidSelection(format!(
                "start date {} is after end date {}",
                selection.date_range.start, selection.date_range.end
            )));
        }

        if !self.date_bounds.covers(&selection.date_range) {
            return Err(DashboardError::InvalidSelection(format!(
                "date range {} is outside {}",
                selection.date_range, self.date_bounds
            )));
        }

        Ok(())
    }
}

/// Select the rows matching state, inclusive date range and type membership
///
/// Source order is preserved. An empty result is valid.
pub fn filter_housing(records: &[HousingRecord], selection: &FilterSelection) -> Vec<HousingRecord> {
    records
        .iter()
        .filter(|r| selection.matches(r))
        .cloned()
        .collect()
}
