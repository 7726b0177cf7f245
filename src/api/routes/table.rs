//! Table Routes
//!
//! Export of the filtered housing table.
//!
//! - GET /api/v1/table - Filtered rows as JSON or CSV

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::run_blocking;
use crate::api::dto::{TableParams, TableResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::data::loader::columns;
use crate::data::HousingRecord;

/// GET /api/v1/table
pub async fn export_table(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TableParams>,
) -> ApiResult<Response> {
    let format = params.format.to_lowercase();
    if format != "json" && format != "csv" {
        return Err(ApiError::Validation(format!(
            "Invalid format: {}. Use json or csv",
            params.format
        )));
    }

    let dashboard = Arc::clone(&state.dashboard);
    let selection_params = params.selection;
    let (selection, rows) = run_blocking(move || {
        let options = dashboard.options()?;
        let selection = selection_params.resolve(&options)?;
        let rows = dashboard.filtered_table_with(&options, &selection)?;
        Ok((selection, rows))
    })
    .await?;

    if format == "csv" {
        let body = rows_to_csv(&rows)?;
        return Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv")],
            body,
        )
            .into_response());
    }

    Ok((
        StatusCode::OK,
        Json(TableResponse {
            caption: format!("Filtered Data for {}", selection.state),
            row_count: rows.len(),
            rows,
        }),
    )
        .into_response())
}

/// Serialize rows with the source column names
///
/// The header row is always written, so an empty selection still exports
/// a valid table.
pub fn rows_to_csv(rows: &[HousingRecord]) -> ApiResult<String> {
    let encode_err = |e: csv::Error| ApiError::Internal(format!("CSV encoding failed: {}", e));

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record([
            columns::STATE,
            columns::DATE,
            columns::PROPERTY_TYPE,
            columns::AVERAGE_PRICE,
        ])
        .map_err(encode_err)?;
    for row in rows {
        writer.serialize(row).map_err(encode_err)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ApiError::Internal(format!("CSV encoding failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| ApiError::Internal(format!("CSV encoding failed: {}", e)))
}
