//! Cache maintenance admin endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::cache::CacheStats;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsResponse {
    pub backend: &'static str,
    #[serde(flatten)]
    pub stats: CacheStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepResponse {
    pub removed: usize,
}

/// GET /admin/cache/stats
pub async fn get_cache_stats(
    State(state): State<AppState>,
) -> Result<Json<CacheStatsResponse>, ApiError> {
    let stats = state.hotel_service.cache_stats().await?;

    Ok(Json(CacheStatsResponse {
        backend: state.hotel_service.cache().backend_name(),
        stats,
    }))
}

/// POST /admin/cache/sweep
pub async fn sweep_cache(State(state): State<AppState>) -> Result<Json<SweepResponse>, ApiError> {
    let removed = state.hotel_service.sweep_expired().await?;

    info!(removed = removed, "Manual cache sweep");

    Ok(Json(SweepResponse { removed }))
}

/// DELETE /admin/cache
pub async fn clear_cache(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.hotel_service.clear_cache().await?;

    info!("Hotel cache cleared");

    Ok(StatusCode::NO_CONTENT)
}
