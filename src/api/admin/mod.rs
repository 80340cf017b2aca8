//! Admin API endpoints for cache maintenance

pub mod cache;

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::state::AppState;

/// Create admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/cache", delete(cache::clear_cache))
        .route("/cache/stats", get(cache::get_cache_stats))
        .route("/cache/sweep", post(cache::sweep_cache))
}
