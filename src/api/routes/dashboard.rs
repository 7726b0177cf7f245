//! Dashboard Routes
//!
//! - GET /api/v1/dashboard - Render the full view-model for a selection

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use super::run_blocking;
use crate::api::dto::SelectionParams;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::dashboard::{Dashboard, DashboardView};

/// GET /api/v1/dashboard?state=CA&types=Condo,Single%20Family&start=2020-01-31&end=2023-12-31
///
/// Omitted parameters fall back to the widgets' initial values.
pub async fn render_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SelectionParams>,
) -> ApiResult<Json<DashboardView>> {
    let dashboard = Arc::clone(&state.dashboard);
    let view = run_blocking(move || render_selection(&dashboard, &params)).await?;
    Ok(Json(view))
}

/// Resolve widget values against the current options and render
pub fn render_selection(dashboard: &Dashboard, params: &SelectionParams) -> ApiResult<DashboardView> {
    let options = dashboard.options()?;
    let selection = params.resolve(&options)?;
    Ok(dashboard.render_with(&options, &selection)?)
}
