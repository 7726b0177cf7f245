//! Options Routes
//!
//! - GET /api/v1/options - Sidebar widget choices and initial selection

use axum::{extract::State, Json};
use std::sync::Arc;

use super::run_blocking;
use crate::api::dto::OptionsResponse;
use crate::api::error::ApiResult;
use crate::api::state::AppState;

/// GET /api/v1/options
pub async fn get_options(State(state): State<Arc<AppState>>) -> ApiResult<Json<OptionsResponse>> {
    let dashboard = Arc::clone(&state.dashboard);

    let options = run_blocking(move || Ok(dashboard.options()?)).await?;
    let default_selection = options.default_selection();

    Ok(Json(OptionsResponse {
        options,
        default_selection,
    }))
}
