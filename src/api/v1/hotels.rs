//! Hotel search endpoint handlers

use axum::{extract::State, Json};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, NearestHotelsQuery, Query, SearchHotelsQuery};
use crate::domain::hotel::{Hotel, NearestHotelsResponse, PagedResult};

/// GET /v1/hotels/search
pub async fn search_hotels(
    State(state): State<AppState>,
    Query(query): Query<SearchHotelsQuery>,
) -> Result<Json<PagedResult<Hotel>>, ApiError> {
    let params = query.into_params()?;

    debug!(
        city_id = ?params.city_id,
        lat = ?params.lat,
        lng = ?params.lng,
        sort = %params.sort,
        page = params.page,
        "Searching hotels"
    );

    let result = state.hotel_service.search_hotels(params).await?;

    Ok(Json(result))
}

/// GET /v1/hotels/nearest
pub async fn find_nearest_hotels(
    State(state): State<AppState>,
    Query(query): Query<NearestHotelsQuery>,
) -> Result<Json<NearestHotelsResponse>, ApiError> {
    let query = query.into_query();

    debug!(lat = query.lat, lng = query.lng, limit = query.limit, "Finding nearest hotels");

    let response = state.hotel_service.find_nearest_hotels(query).await?;

    Ok(Json(response))
}
