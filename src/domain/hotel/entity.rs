//! Normalized hotel result item

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::geo::{haversine_distance, GeoPoint};

/// Source tag carried by synthetic (fallback) results
pub const SYNTHETIC_SOURCE: &str = "mock";

/// Nightly price quoted by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub amount: f64,
    pub currency: String,
}

impl Price {
    pub fn new(amount: f64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    pub fn usd(amount: f64) -> Self {
        Self::new(amount, "USD")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl Photo {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// A hotel as normalized by a provider adapter
///
/// `rating` and `price` are optional because upstreams routinely omit them;
/// ranking treats a missing value as the worst case for that axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    pub location: GeoPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_url: Option<String>,
    pub source: String,
    pub external_id: String,
}

impl Hotel {
    /// Creates a hotel with the required fields; optional data is added with the builder methods
    pub fn new(
        source: impl Into<String>,
        external_id: impl Into<String>,
        name: impl Into<String>,
        location: GeoPoint,
    ) -> Self {
        let source = source.into();
        let external_id = external_id.into();

        Self {
            id: format!("{}:{}", source, external_id),
            name: name.into(),
            rating: None,
            price: None,
            location,
            distance_meters: None,
            address: String::new(),
            amenities: BTreeSet::new(),
            photos: Vec::new(),
            booking_url: None,
            source,
            external_id,
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating.clamp(0.0, 5.0));
        self
    }

    pub fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_distance_meters(mut self, meters: f64) -> Self {
        self.distance_meters = Some(meters);
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_amenity(mut self, amenity: impl Into<String>) -> Self {
        self.amenities.insert(amenity.into().trim().to_lowercase());
        self
    }

    pub fn with_photo(mut self, photo: Photo) -> Self {
        self.photos.push(photo);
        self
    }

    pub fn with_booking_url(mut self, url: impl Into<String>) -> Self {
        self.booking_url = Some(url.into());
        self
    }

    /// Returns true if this item came from the synthetic generator
    pub fn is_synthetic(&self) -> bool {
        self.source == SYNTHETIC_SOURCE
    }

    pub fn price_amount(&self) -> Option<f64> {
        self.price.as_ref().map(|p| p.amount)
    }

    /// Provider-supplied distance, or the haversine distance from `origin`
    pub fn distance_from(&self, origin: &GeoPoint) -> f64 {
        self.distance_meters
            .unwrap_or_else(|| haversine_distance(origin, &self.location))
    }

    pub fn has_amenities<'a>(&self, required: impl IntoIterator<Item = &'a String>) -> bool {
        required
            .into_iter()
            .all(|a| self.amenities.contains(&a.to_lowercase()))
    }
}
