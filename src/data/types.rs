//! Core record types for the housing dashboard
//!
//! This module defines the rows read from the three input files and the
//! user's filter selection:
//! - `HousingRecord`: average price per state, date and property type
//! - `MortgageRecord`: monthly mortgage payment per state
//! - `RentRecord`: monthly payment vs. average rent per state over time
//! - `DateRange` and `FilterSelection`: what the sidebar widgets produce

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single row of the primary housing dataset
///
/// Serialized with the source column names so exported tables look like
/// the input file minus its index column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HousingRecord {
    /// Two-letter state abbreviation
    #[serde(rename = "Abbrev")]
    pub state: String,
    /// Observation date
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    /// Property type label (e.g. "Single Family")
    #[serde(rename = "Type")]
    pub property_type: String,
    /// Average sale price in USD
    #[serde(rename = "AvgPrice")]
    pub average_price: f64,
}

impl HousingRecord {
    pub fn new(
        state: impl Into<String>,
        date: NaiveDate,
        property_type: impl Into<String>,
        average_price: f64,
    ) -> Self {
        Self {
            state: state.into(),
            date,
            property_type: property_type.into(),
            average_price,
        }
    }
}

/// A row of the mortgage-rates file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MortgageRecord {
    #[serde(rename = "Abbrev")]
    pub state: String,
    #[serde(rename = "MonthlyPayment")]
    pub monthly_payment: f64,
}

impl MortgageRecord {
    pub fn new(state: impl Into<String>, monthly_payment: f64) -> Self {
        Self {
            state: state.into(),
            monthly_payment,
        }
    }
}

/// A row of the rents-payments file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RentRecord {
    #[serde(rename = "Abbrev")]
    pub state: String,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "MonthlyPayment")]
    pub monthly_payment: f64,
    #[serde(rename = "AvgRent")]
    pub avg_rent: f64,
}

impl RentRecord {
    pub fn new(state: impl Into<String>, date: NaiveDate, monthly_payment: f64, avg_rent: f64) -> Self {
        Self {
            state: state.into(),
            date,
            monthly_payment,
            avg_rent,
        }
    }
}

/// An inclusive calendar date range
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    /// First date included
    pub start: NaiveDate,
    /// Last date included
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Check if a date falls within this range (both ends inclusive)
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Check if `other` lies entirely inside this range
    pub fn covers(&self, other: &DateRange) -> bool {
        self.contains(other.start) && self.contains(other.end)
    }

    /// True when start is after end
    pub fn is_reversed(&self) -> bool {
        self.start > self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

/// The user's current state / property types / date range choice
///
/// Recomputed from widget state on every interaction; every derived view
/// is a pure function of the loaded tables and this value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterSelection {
    /// Selected state abbreviation
    pub state: String,
    /// Selected property types, in widget order
    pub property_types: Vec<String>,
    /// Selected date range
    pub date_range: DateRange,
}

impl FilterSelection {
    pub fn new(
        state: impl Into<String>,
        property_types: Vec<String>,
        date_range: DateRange,
    ) -> Self {
        Self {
            state: state.into(),
            property_types,
            date_range,
        }
    }

    /// Check whether a record satisfies all three predicates
    pub fn matches(&self, record: &HousingRecord) -> bool {
        record.state == self.state
            && self.date_range.contains(record.date)
            && self.property_types.iter().any(|t| *t == record.property_type)
    }
}
