//! Public v1 API endpoints

pub mod hotels;

use axum::{routing::get, Router};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/hotels/search", get(hotels::search_hotels))
        .route("/hotels/nearest", get(hotels::find_nearest_hotels))
}
