//! Search parameter value objects and their validation

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::geo::GeoPoint;
use crate::domain::DomainError;

/// Largest page size a caller may request
pub const MAX_LIMIT: u32 = 100;

/// Result ordering requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Provider order
    #[default]
    Recommended,
    PriceAsc,
    PriceDesc,
    Rating,
    Distance,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Recommended => write!(f, "recommended"),
            Self::PriceAsc => write!(f, "price_asc"),
            Self::PriceDesc => write!(f, "price_desc"),
            Self::Rating => write!(f, "rating"),
            Self::Distance => write!(f, "distance"),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "recommended" | "popularity" => Ok(Self::Recommended),
            "price_asc" | "price" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "rating" => Ok(Self::Rating),
            "distance" => Ok(Self::Distance),
            _ => Err(DomainError::invalid_param(
                "sort",
                format!(
                    "Unknown sort order: {}. Valid values: recommended, price_asc, price_desc, rating, distance",
                    s
                ),
            )),
        }
    }
}

/// A hotel search query
///
/// Undefined optional fields are skipped when serialized so that they never
/// take part in cache fingerprinting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
    pub guests: u32,
    #[serde(default)]
    pub sort: SortOrder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_meters: Option<f64>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

impl SearchParams {
    /// Search around a coordinate
    pub fn near(lat: f64, lng: f64, checkin: NaiveDate, checkout: NaiveDate, guests: u32) -> Self {
        Self {
            city_id: None,
            lat: Some(lat),
            lng: Some(lng),
            checkin,
            checkout,
            guests,
            sort: SortOrder::default(),
            radius_meters: None,
            page: default_page(),
            limit: default_limit(),
        }
    }

    /// Search within a provider city identifier
    pub fn in_city(
        city_id: impl Into<String>,
        checkin: NaiveDate,
        checkout: NaiveDate,
        guests: u32,
    ) -> Self {
        Self {
            city_id: Some(city_id.into()),
            lat: None,
            lng: None,
            checkin,
            checkout,
            guests,
            sort: SortOrder::default(),
            radius_meters: None,
            page: default_page(),
            limit: default_limit(),
        }
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_radius(mut self, radius_meters: f64) -> Self {
        self.radius_meters = Some(radius_meters);
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// The query point, when both coordinates are present
    pub fn origin(&self) -> Option<GeoPoint> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
            _ => None,
        }
    }

    pub fn nights(&self) -> i64 {
        (self.checkout - self.checkin).num_days()
    }

    /// The upstream query whose full result set gets cached
    ///
    /// Every page of one logical query maps to the same cache entry.
    pub fn for_cache(&self, fetch_limit: u32) -> Self {
        Self {
            page: 1,
            limit: fetch_limit,
            ..self.clone()
        }
    }

    /// Checks the query is answerable; never mutates or defaults anything
    pub fn validate(&self) -> Result<(), DomainError> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => {
                GeoPoint::new(lat, lng)?;
            }
            (Some(_), None) => {
                return Err(DomainError::invalid_param("lng", "lng is required when lat is given"));
            }
            (None, Some(_)) => {
                return Err(DomainError::invalid_param("lat", "lat is required when lng is given"));
            }
            (None, None) => {
                let has_city = self
                    .city_id
                    .as_deref()
                    .is_some_and(|c| !c.trim().is_empty());

                if !has_city {
                    return Err(DomainError::invalid_query(
                        "Either cityId or lat/lng coordinates are required",
                    ));
                }
            }
        }

        validate_stay(self.checkin, self.checkout, self.guests)?;

        if let Some(radius) = self.radius_meters {
            validate_radius(radius)?;
        }

        validate_limit(self.limit)
    }
}

/// Optional post-fetch filters for nearest-hotel queries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amenities: Vec<String>,
}

impl HotelFilters {
    pub fn is_empty(&self) -> bool {
        self.min_rating.is_none() && self.max_price.is_none() && self.amenities.is_empty()
    }

    /// Items missing the filtered attribute do not match
    pub fn matches(&self, hotel: &super::Hotel) -> bool {
        if let Some(min) = self.min_rating {
            match hotel.rating {
                Some(rating) if rating >= min => {}
                _ => return false,
            }
        }

        if let Some(max) = self.max_price {
            match hotel.price_amount() {
                Some(amount) if amount <= max => {}
                _ => return false,
            }
        }

        hotel.has_amenities(&self.amenities)
    }
}

/// A "nearest hotels" query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestQuery {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_meters: Option<f64>,
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
    pub guests: u32,
    #[serde(default = "default_nearest_limit")]
    pub limit: u32,
    #[serde(default)]
    pub filters: HotelFilters,
}

fn default_nearest_limit() -> u32 {
    10
}

impl NearestQuery {
    pub fn new(lat: f64, lng: f64, checkin: NaiveDate, checkout: NaiveDate, guests: u32) -> Self {
        Self {
            lat,
            lng,
            radius_meters: None,
            checkin,
            checkout,
            guests,
            limit: default_nearest_limit(),
            filters: HotelFilters::default(),
        }
    }

    pub fn with_radius(mut self, radius_meters: f64) -> Self {
        self.radius_meters = Some(radius_meters);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_filters(mut self, filters: HotelFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn validate(&self) -> Result<GeoPoint, DomainError> {
        let origin = GeoPoint::new(self.lat, self.lng)?;

        validate_stay(self.checkin, self.checkout, self.guests)?;

        if let Some(radius) = self.radius_meters {
            validate_radius(radius)?;
        }

        validate_limit(self.limit)?;

        Ok(origin)
    }

    /// Upstream search issued for this query: distance-sorted within `radius_meters`
    pub fn to_search_params(&self, radius_meters: f64, fetch_limit: u32) -> SearchParams {
        SearchParams {
            city_id: None,
            lat: Some(self.lat),
            lng: Some(self.lng),
            checkin: self.checkin,
            checkout: self.checkout,
            guests: self.guests,
            sort: SortOrder::Distance,
            radius_meters: Some(radius_meters),
            page: 1,
            limit: fetch_limit,
        }
    }
}

fn validate_stay(checkin: NaiveDate, checkout: NaiveDate, guests: u32) -> Result<(), DomainError> {
    if checkout <= checkin {
        return Err(DomainError::invalid_param(
            "checkout",
            format!("checkout ({}) must be after checkin ({})", checkout, checkin),
        ));
    }

    if guests == 0 {
        return Err(DomainError::invalid_param("guests", "guests must be at least 1"));
    }

    Ok(())
}

fn validate_radius(radius: f64) -> Result<(), DomainError> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(DomainError::invalid_param(
            "radius",
            format!("radius must be a positive number of meters, got {}", radius),
        ));
    }

    Ok(())
}

fn validate_limit(limit: u32) -> Result<(), DomainError> {
    if limit == 0 || limit > MAX_LIMIT {
        return Err(DomainError::invalid_param(
            "limit",
            format!("limit must be between 1 and {}, got {}", MAX_LIMIT, limit),
        ));
    }

    Ok(())
}
