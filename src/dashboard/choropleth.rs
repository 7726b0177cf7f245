//! Choropleth Builder
//!
//! Mean monthly mortgage payment per state over the full mortgage table.
//! The active filter selection does not apply here.

use crate::data::MortgageRecord;
use serde::Serialize;
use std::collections::BTreeMap;

pub const CHOROPLETH_TITLE: &str = "Avg Monthly Mortgage Payment";
pub const CHOROPLETH_COLOR_LABEL: &str = "Monthly Payment ($)";

/// Abbreviations the US-states map can shade: the 50 states plus DC
pub const US_STATES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

/// Shading value for one state
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatePayment {
    pub state: String,
    pub monthly_payment: f64,
}

/// Map input: one entry per state, sorted by abbreviation
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Choropleth {
    pub title: String,
    pub color_label: String,
    pub location_mode: String,
    pub scope: String,
    pub states: Vec<StatePayment>,
}

impl Choropleth {
    pub fn payment_for(&self, state: &str) -> Option<f64> {
        self.states
            .iter()
            .find(|s| s.state == state)
            .map(|s| s.monthly_payment)
    }
}

pub fn is_us_state(abbrev: &str) -> bool {
    US_STATES.contains(&abbrev)
}

/// Group by state and average the monthly payment
pub fn average_payment_by_state(records: &[MortgageRecord]) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for record in records {
        let entry = sums.entry(record.state.as_str()).or_insert((0.0, 0));
        entry.0 += record.monthly_payment;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(state, (sum, count))| (state.to_string(), sum / count as f64))
        .collect()
}

/// Build the map input, dropping abbreviations outside the US-states scope
pub fn build_choropleth(records: &[MortgageRecord]) -> Choropleth {
    let states = average_payment_by_state(records)
        .into_iter()
        .filter(|(state, _)| {
            let keep = is_us_state(state);
            if !keep {
                tracing::debug!(state = %state, "Skipping non-US-state abbreviation on map");
            }
            keep
        })
        .map(|(state, monthly_payment)| StatePayment {
            state,
            monthly_payment,
        })
        .collect();

    Choropleth {
        title: CHOROPLETH_TITLE.to_string(),
        color_label: CHOROPLETH_COLOR_LABEL.to_string(),
        location_mode: "USA-states".to_string(),
        scope: "usa".to_string(),
        states,
    }
}
