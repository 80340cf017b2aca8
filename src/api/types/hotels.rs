//! Query-string DTOs for the hotel endpoints

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::hotel::{HotelFilters, NearestQuery, SearchParams, SortOrder};
use crate::domain::DomainError;

fn default_guests() -> u32 {
    1
}

/// GET /v1/hotels/search query string
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHotelsQuery {
    #[serde(default)]
    pub city_id: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
    #[serde(default = "default_guests")]
    pub guests: u32,
    #[serde(default)]
    pub sort: Option<String>,
    /// Search radius in meters
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl SearchHotelsQuery {
    pub fn into_params(self) -> Result<SearchParams, DomainError> {
        let city_id = self.city_id.filter(|c| !c.trim().is_empty());

        let mut params = match (self.lat, self.lng, city_id) {
            (None, None, Some(city)) => {
                SearchParams::in_city(city, self.checkin, self.checkout, self.guests)
            }
            (lat, lng, city_id) => SearchParams {
                city_id,
                lat,
                lng,
                ..SearchParams::near(0.0, 0.0, self.checkin, self.checkout, self.guests)
            },
        };

        if let Some(sort) = self.sort.as_deref().filter(|s| !s.is_empty()) {
            params = params.with_sort(sort.parse::<SortOrder>()?);
        }

        if let Some(radius) = self.radius {
            params = params.with_radius(radius);
        }

        if let Some(page) = self.page {
            params = params.with_page(page);
        }

        if let Some(limit) = self.limit {
            params = params.with_limit(limit);
        }

        Ok(params)
    }
}

/// GET /v1/hotels/nearest query string
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestHotelsQuery {
    pub lat: f64,
    pub lng: f64,
    /// Search radius in meters
    #[serde(default)]
    pub radius: Option<f64>,
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
    #[serde(default = "default_guests")]
    pub guests: u32,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub min_rating: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    /// Comma-separated amenity names
    #[serde(default)]
    pub amenities: Option<String>,
}

impl NearestHotelsQuery {
    pub fn into_query(self) -> NearestQuery {
        let amenities = self
            .amenities
            .as_deref()
            .map(split_amenities)
            .unwrap_or_default();

        let mut query = NearestQuery::new(self.lat, self.lng, self.checkin, self.checkout, self.guests)
            .with_filters(HotelFilters {
                min_rating: self.min_rating,
                max_price: self.max_price,
                amenities,
            });

        if let Some(radius) = self.radius {
            query = query.with_radius(radius);
        }

        if let Some(limit) = self.limit {
            query = query.with_limit(limit);
        }

        query
    }
}

fn split_amenities(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|a| a.trim().to_lowercase())
        .filter(|a| !a.is_empty())
        .collect()
}
