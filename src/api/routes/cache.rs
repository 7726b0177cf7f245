//! Cache Routes
//!
//! - POST /api/v1/cache/invalidate - Drop memoized tables so the next render re-reads the files

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::InvalidateResponse;
use crate::api::state::AppState;

/// POST /api/v1/cache/invalidate
pub async fn invalidate_cache(State(state): State<Arc<AppState>>) -> Json<InvalidateResponse> {
    state.dashboard.invalidate();
    Json(InvalidateResponse {
        status: "invalidated".to_string(),
    })
}
