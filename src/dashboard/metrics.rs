//! Metrics Calculator
//!
//! Per-property-type returns over the selected window, shown as summary
//! cards. A type with no rows in the window yields an explicit `NoData`
//! card instead of a computed one.

use crate::data::HousingRecord;
use serde::Serialize;

/// Price change between the first and last observation of one type
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ReturnMetric {
    /// Price at the earliest date
    pub start_value: f64,
    /// Price at the latest date
    pub end_value: f64,
    /// `end_value - start_value`
    pub returns: f64,
    /// Percentage change rounded to a whole number; `None` when start is zero
    pub return_pct: Option<f64>,
}

impl ReturnMetric {
    pub fn between(start_value: f64, end_value: f64) -> Self {
        let returns = end_value - start_value;
        let return_pct = if start_value == 0.0 {
            None
        } else {
            // normalize -0 so it prints as "0%"
            Some((returns / start_value * 100.0).round_ties_even() + 0.0)
        };

        Self {
            start_value,
            end_value,
            returns,
            return_pct,
        }
    }
}

/// A summary card for one selected property type
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MetricCard {
    Computed {
        label: String,
        property_type: String,
        metric: ReturnMetric,
        /// Formatted return, e.g. "20 K"
        value: String,
        /// Formatted percentage, e.g. "10%"
        delta: String,
    },
    NoData {
        label: String,
        property_type: String,
    },
}

impl MetricCard {
    pub fn label(&self) -> &str {
        match self {
            MetricCard::Computed { label, .. } | MetricCard::NoData { label, .. } => label,
        }
    }

    pub fn metric(&self) -> Option<&ReturnMetric> {
        match self {
            MetricCard::Computed { metric, .. } => Some(metric),
            MetricCard::NoData { .. } => None,
        }
    }
}

/// Compute the return for one type over an already filtered table
///
/// Rows are ordered by date ascending (ties keep source order) before the
/// first and last prices are taken.
pub fn compute_return(filtered: &[HousingRecord], property_type: &str) -> Option<ReturnMetric> {
    let mut rows: Vec<&HousingRecord> = filtered
        .iter()
        .filter(|r| r.property_type == property_type)
        .collect();
    rows.sort_by_key(|r| r.date);

    let first = rows.first()?;
    let last = rows.last()?;
    Some(ReturnMetric::between(first.average_price, last.average_price))
}

/// Build one card per selected type, in selection order
pub fn metric_cards(filtered: &[HousingRecord], property_types: &[String]) -> Vec<MetricCard> {
    property_types
        .iter()
        .map(|property_type| {
            let label = format!("Returns for {}", property_type);
            match compute_return(filtered, property_type) {
                Some(metric) => MetricCard::Computed {
                    label,
                    property_type: property_type.clone(),
                    value: format_number(metric.returns),
                    delta: format_delta(metric.return_pct),
                    metric,
                },
                None => {
                    tracing::debug!(property_type = %property_type, "No rows for metric card");
                    MetricCard::NoData {
                        label,
                        property_type: property_type.clone(),
                    }
                }
            }
        })
        .collect()
}

/// Compact money formatting for metric cards
///
/// Millions get an "M" suffix with one decimal unless evenly divisible;
/// everything else is floor-divided into whole thousands with a "K" suffix.
pub fn format_number(num: f64) -> String {
    if num >= 1_000_000.0 {
        if num % 1_000_000.0 == 0.0 {
            return format!("{} M", (num / 1_000_000.0) as i64);
        }
        return format!("{:.1} M", num / 1_000_000.0);
    }
    format!("{} K", (num / 1000.0).floor() as i64)
}

/// Percentage delta shown under the card value
pub fn format_delta(pct: Option<f64>) -> String {
    match pct {
        Some(p) => format!("{:.0}%", p),
        None => "n/a".to_string(),
    }
}
