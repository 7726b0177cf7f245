//! CSV Loaders
//!
//! Readers for the three input files. Columns are located by header name,
//! so extra columns (including the `Unnamed: 0` index artifact written by
//! dataframe exports) are ignored rather than carried into the records.

use super::error::{DataError, DataResult};
use super::types::{HousingRecord, MortgageRecord, RentRecord};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Column names in the input files
pub mod columns {
    pub const STATE: &str = "Abbrev";
    pub const DATE: &str = "Date";
    pub const PROPERTY_TYPE: &str = "Type";
    pub const AVERAGE_PRICE: &str = "AvgPrice";
    pub const MONTHLY_PAYMENT: &str = "MonthlyPayment";
    pub const AVG_RENT: &str = "AvgRent";
    /// Index column left behind by dataframe CSV exports
    pub const INDEX_ARTIFACT: &str = "Unnamed: 0";
}

/// Load the primary housing dataset from a file
pub fn load_housing(path: &Path) -> DataResult<Vec<HousingRecord>> {
    let file = open(path)?;
    let records = read_housing(file, path)?;
    tracing::info!(path = %path.display(), rows = records.len(), "Loaded housing dataset");
    Ok(records)
}

/// Load the mortgage-rates file
pub fn load_mortgage_rates(path: &Path) -> DataResult<Vec<MortgageRecord>> {
    let file = open(path)?;
    let records = read_mortgage_rates(file, path)?;
    tracing::info!(path = %path.display(), rows = records.len(), "Loaded mortgage rates");
    Ok(records)
}

/// Load the rents-payments file
pub fn load_rents(path: &Path) -> DataResult<Vec<RentRecord>> {
    let file = open(path)?;
    let records = read_rents(file, path)?;
    tracing::info!(path = %path.display(), rows = records.len(), "Loaded rent comparison data");
    Ok(records)
}

/// Parse housing rows from any reader; `source` is used in error messages
pub fn read_housing<R: Read>(reader: R, source: &Path) -> DataResult<Vec<HousingRecord>> {
    let mut reader = csv_reader(reader);
    let headers = reader
        .headers()
        .map_err(|e| DataError::csv(source, e))?
        .clone();

    let state_idx = column_index(&headers, columns::STATE, source)?;
    let date_idx = column_index(&headers, columns::DATE, source)?;
    let type_idx = column_index(&headers, columns::PROPERTY_TYPE, source)?;
    let price_idx = column_index(&headers, columns::AVERAGE_PRICE, source)?;

    if headers.iter().any(|h| h == columns::INDEX_ARTIFACT) {
        tracing::debug!(path = %source.display(), "Dropping index column");
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| DataError::csv(source, e))?;
        let line = line_of(&record);

        records.push(HousingRecord {
            state: field(&record, state_idx).to_string(),
            date: parse_date_field(field(&record, date_idx), source, line)?,
            property_type: field(&record, type_idx).to_string(),
            average_price: parse_number(
                field(&record, price_idx),
                columns::AVERAGE_PRICE,
                source,
                line,
            )?,
        });
    }

    Ok(records)
}

/// Parse mortgage rows from any reader
pub fn read_mortgage_rates<R: Read>(reader: R, source: &Path) -> DataResult<Vec<MortgageRecord>> {
    let mut reader = csv_reader(reader);
    let headers = reader
        .headers()
        .map_err(|e| DataError::csv(source, e))?
        .clone();

    let state_idx = column_index(&headers, columns::STATE, source)?;
    let payment_idx = column_index(&headers, columns::MONTHLY_PAYMENT, source)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| DataError::csv(source, e))?;
        let line = line_of(&record);

        records.push(MortgageRecord {
            state: field(&record, state_idx).to_string(),
            monthly_payment: parse_number(
                field(&record, payment_idx),
                columns::MONTHLY_PAYMENT,
                source,
                line,
            )?,
        });
    }

    Ok(records)
}

/// Parse rent rows from any reader
pub fn read_rents<R: Read>(reader: R, source: &Path) -> DataResult<Vec<RentRecord>> {
    let mut reader = csv_reader(reader);
    let headers = reader
        .headers()
        .map_err(|e| DataError::csv(source, e))?
        .clone();

    let state_idx = column_index(&headers, columns::STATE, source)?;
    let date_idx = column_index(&headers, columns::DATE, source)?;
    let payment_idx = column_index(&headers, columns::MONTHLY_PAYMENT, source)?;
    let rent_idx = column_index(&headers, columns::AVG_RENT, source)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| DataError::csv(source, e))?;
        let line = line_of(&record);

        records.push(RentRecord {
            state: field(&record, state_idx).to_string(),
            date: parse_date_field(field(&record, date_idx), source, line)?,
            monthly_payment: parse_number(
                field(&record, payment_idx),
                columns::MONTHLY_PAYMENT,
                source,
                line,
            )?,
            avg_rent: parse_number(field(&record, rent_idx), columns::AVG_RENT, source, line)?,
        });
    }

    Ok(records)
}

/// Parse a calendar date in any of the formats dataframe exports produce
///
/// Timestamps are truncated to their date part.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%Y%m%d"];
    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%m/%d/%Y %H:%M:%S",
    ];

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }

    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

fn open(path: &Path) -> DataResult<File> {
    File::open(path).map_err(|e| DataError::io(path, e))
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn column_index(headers: &csv::StringRecord, name: &str, source: &Path) -> DataResult<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| DataError::MissingColumn {
            path: source.to_path_buf(),
            column: name.to_string(),
        })
}

fn field(record: &csv::StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn parse_date_field(value: &str, source: &Path, line: u64) -> DataResult<NaiveDate> {
    parse_date(value).ok_or_else(|| DataError::DateParse {
        path: source.to_path_buf(),
        line,
        value: value.to_string(),
    })
}

fn parse_number(value: &str, column: &str, source: &Path, line: u64) -> DataResult<f64> {
    value.parse::<f64>().map_err(|_| DataError::InvalidNumber {
        path: source.to_path_buf(),
        line,
        column: column.to_string(),
        value: value.to_string(),
    })
}
