//! Result envelopes returned to callers

use serde::{Deserialize, Serialize};

use crate::domain::geo::GeoPoint;
use crate::domain::pagination::{Page, PageMeta};

use super::ranking::ScoredHotel;

/// Where a result set came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultOrigin {
    /// Name of the provider that produced the items
    pub provider: String,
    /// True when the synthetic generator stood in for the configured provider
    pub fallback: bool,
    /// True when served from the cache
    pub cached: bool,
}

/// One page of a hotel search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
    #[serde(flatten)]
    pub origin: ResultOrigin,
}

impl<T> PagedResult<T> {
    pub fn new(page: Page<T>, origin: ResultOrigin) -> Self {
        Self {
            items: page.items,
            meta: page.meta,
            origin,
        }
    }
}

/// Ranked nearest-hotel results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestHotelsResponse {
    pub items: Vec<ScoredHotel>,
    pub reference_point: GeoPoint,
    /// Radius used for the upstream search, in meters
    pub search_radius: f64,
    /// Largest distance among the returned items, for map bounds
    pub max_distance_meters: f64,
    #[serde(flatten)]
    pub origin: ResultOrigin,
}

impl NearestHotelsResponse {
    pub fn new(
        items: Vec<ScoredHotel>,
        reference_point: GeoPoint,
        search_radius: f64,
        origin: ResultOrigin,
    ) -> Self {
        let max_distance_meters = items
            .iter()
            .map(|s| s.distance.meters)
            .fold(0.0, f64::max);

        Self {
            items,
            reference_point,
            search_radius,
            max_distance_meters,
            origin,
        }
    }
}
