//! Rent Comparison Builder
//!
//! Monthly mortgage payment vs. average rent over time for the selected
//! state. Only the state applies; the type and date filters do not.

use crate::data::RentRecord;
use chrono::NaiveDate;
use serde::Serialize;

pub const RENT_CHART_TITLE: &str = "Monthly Payment vs. Avg Rent Over Time";
pub const MONTHLY_PAYMENT_SERIES: &str = "MonthlyPayment";
pub const AVG_RENT_SERIES: &str = "AvgRent";

/// One x position of the two-series chart
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RentPoint {
    pub date: NaiveDate,
    pub monthly_payment: f64,
    pub avg_rent: f64,
}

/// Two-series line chart input
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RentComparison {
    pub title: String,
    pub state: String,
    pub series: [String; 2],
    pub y_label: String,
    pub legend_title: String,
    /// Points in ascending date order
    pub points: Vec<RentPoint>,
}

impl RentComparison {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Filter the rent table to `state` and shape it as two series over date
pub fn build_rent_comparison(records: &[RentRecord], state: &str) -> RentComparison {
    let mut points: Vec<RentPoint> = records
        .iter()
        .filter(|r| r.state == state)
        .map(|r| RentPoint {
            date: r.date,
            monthly_payment: r.monthly_payment,
            avg_rent: r.avg_rent,
        })
        .collect();
    points.sort_by_key(|p| p.date);

    RentComparison {
        title: RENT_CHART_TITLE.to_string(),
        state: state.to_string(),
        series: [
            MONTHLY_PAYMENT_SERIES.to_string(),
            AVG_RENT_SERIES.to_string(),
        ],
        y_label: "USD".to_string(),
        legend_title: "Series".to_string(),
        points,
    }
}
