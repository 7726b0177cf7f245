//! Aggregation & Pivot
//!
//! Reshapes the filtered long-format table into a date-indexed wide table:
//! one column per property type holding the mean price for that
//! (date, type) pair, followed by a national-average column holding the
//! mean over every row sharing the date.

use crate::data::HousingRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Column label of the all-types average
pub const NATIONAL_AVERAGE_LABEL: &str = "US Average";

/// Running mean
#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// One row of a wide, date-indexed table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PriceRow {
    pub date: NaiveDate,
    /// Cells aligned with the table's `columns`; `None` where the pair has no rows
    pub values: Vec<Option<f64>>,
}

/// A wide, date-indexed table ready for a line chart
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PriceTable {
    pub columns: Vec<String>,
    /// Rows in ascending date order
    pub rows: Vec<PriceRow>,
}

impl PriceTable {
    /// Look up a single cell
    pub fn get(&self, date: NaiveDate, column: &str) -> Option<f64> {
        let col = self.columns.iter().position(|c| c == column)?;
        let row = self.rows.iter().find(|r| r.date == date)?;
        row.values.get(col).copied().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Extract one column as (date, value) points, skipping empty cells
    pub fn series(&self, column: &str) -> Vec<(NaiveDate, f64)> {
        let Some(col) = self.columns.iter().position(|c| c == column) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|r| r.values.get(col).copied().flatten().map(|v| (r.date, v)))
            .collect()
    }
}

/// Mean price per date across every row, in ascending date order
pub fn national_average(filtered: &[HousingRecord]) -> Vec<(NaiveDate, f64)> {
    let mut by_date: BTreeMap<NaiveDate, Mean> = BTreeMap::new();
    for record in filtered {
        by_date.entry(record.date).or_default().add(record.average_price);
    }

    by_date
        .into_iter()
        .filter_map(|(date, mean)| mean.value().map(|v| (date, v)))
        .collect()
}

/// Pivot into one column per property type (sorted by name), mean-aggregated
pub fn pivot_by_type(filtered: &[HousingRecord]) -> PriceTable {
    let mut cells: BTreeMap<NaiveDate, BTreeMap<&str, Mean>> = BTreeMap::new();
    let mut types: BTreeSet<&str> = BTreeSet::new();

    for record in filtered {
        types.insert(record.property_type.as_str());
        cells
            .entry(record.date)
            .or_default()
            .entry(record.property_type.as_str())
            .or_default()
            .add(record.average_price);
    }

    let columns: Vec<&str> = types.into_iter().collect();
    let rows = cells
        .into_iter()
        .map(|(date, by_type)| PriceRow {
            date,
            values: columns
                .iter()
                .map(|t| by_type.get(t).and_then(Mean::value))
                .collect(),
        })
        .collect();

    PriceTable {
        columns: columns.into_iter().map(str::to_string).collect(),
        rows,
    }
}

/// Per-type pivot with the national average appended, aligned on date
pub fn price_by_type(filtered: &[HousingRecord]) -> PriceTable {
    let mut table = pivot_by_type(filtered);
    let national: BTreeMap<NaiveDate, f64> = national_average(filtered).into_iter().collect();

    table.columns.push(NATIONAL_AVERAGE_LABEL.to_string());
    for row in &mut table.rows {
        row.values.push(national.get(&row.date).copied());
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_two_dates_two_types() {
        let d1 = date(2020, 1, 31);
        let d2 = date(2020, 2, 29);
        let rows = vec![
            HousingRecord::new("CA", d2, "Single Family", 600.0),
            HousingRecord::new("CA", d1, "Condo", 100.0),
            HousingRecord::new("CA", d1, "Condo", 200.0),
            HousingRecord::new("CA", d1, "Single Family", 400.0),
            HousingRecord::new("CA", d2, "Condo", 300.0),
        ];

        let table = price_by_type(&rows);

        assert_eq!(table.columns, vec!["Condo", "Single Family", NATIONAL_AVERAGE_LABEL]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].date, d1);
        assert_eq!(table.rows[1].date, d2);

        assert_eq!(table.get(d1, "Condo"), Some(150.0));
        assert_eq!(table.get(d1, "Single Family"), Some(400.0));
        assert_eq!(table.get(d1, NATIONAL_AVERAGE_LABEL), Some(700.0 / 3.0));
        assert_eq!(table.get(d2, "Condo"), Some(300.0));
        assert_eq!(table.get(d2, "Single Family"), Some(600.0));
        assert_eq!(table.get(d2, NATIONAL_AVERAGE_LABEL), Some(450.0));
    }

    #[test]
    fn test_missing_pair_is_empty_cell() {
        let d1 = date(2020, 1, 31);
        let d2 = date(2020, 2, 29);
        let rows = vec![
            HousingRecord::new("CA", d1, "Condo", 100.0),
            HousingRecord::new("CA", d2, "Townhouse", 300.0),
        ];

        let table = price_by_type(&rows);
        assert_eq!(table.get(d1, "Townhouse"), None);
        assert_eq!(table.series("Condo"), vec![(d1, 100.0)]);
        assert_eq!(table.series(NATIONAL_AVERAGE_LABEL).len(), 2);
    }

    #[test]
    fn test_empty_input_has_only_average_column() {
        let table = price_by_type(&[]);
        assert!(table.is_empty());
        assert_eq!(table.columns, vec![NATIONAL_AVERAGE_LABEL]);
        assert!(national_average(&[]).is_empty());
    }
}
