//! API Routes
//!
//! Route handlers organized by functionality.

pub mod cache;
pub mod dashboard;
pub mod health;
pub mod options;
pub mod table;

use crate::api::error::{ApiError, ApiResult};

/// Run file loading and rendering off the async runtime
///
/// The render pipeline is synchronous; each request gets its own blocking task.
pub(crate) async fn run_blocking<T, F>(work: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("Render task failed: {}", e)))?
}
