//! Deterministic synthetic hotels used when no live provider can answer

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::domain::cache::fingerprint;
use crate::domain::geo::GeoPoint;
use crate::domain::hotel::{Hotel, Photo, Price, SearchParams, SYNTHETIC_SOURCE};
use crate::domain::DomainError;

const NAME_PREFIXES: &[&str] = &[
    "Grand", "Royal", "City", "Harbor", "Park", "Central", "Riverside", "Garden", "Plaza",
    "Summit", "Metro", "Skyline",
];

const NAME_SUFFIXES: &[&str] = &["Hotel", "Inn", "Suites", "Lodge", "Residences", "House"];

const STREETS: &[&str] = &[
    "Main", "Broadway", "Market", "Church", "Park", "Station", "Bridge", "Elm", "Lake", "Hill",
];

const AMENITIES: &[&str] = &[
    "wifi",
    "pool",
    "gym",
    "spa",
    "parking",
    "breakfast",
    "restaurant",
    "bar",
    "air_conditioning",
    "pet_friendly",
    "airport_shuttle",
    "room_service",
];

/// Keeps jittered points strictly inside the radius despite the flat-earth offset
const RADIUS_MARGIN: f64 = 0.95;

/// Configuration for the synthetic generator
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    /// Items generated per query, before the `limit` cap
    pub count: usize,
    /// Centre used when the query has no coordinates
    pub default_center: GeoPoint,
    pub default_radius_meters: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub min_rating: f64,
    pub max_rating: f64,
    pub currency: String,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            count: 20,
            default_center: GeoPoint {
                lat: 40.7128,
                lng: -74.0060,
            },
            default_radius_meters: 5_000.0,
            min_price: 60.0,
            max_price: 400.0,
            min_rating: 3.0,
            max_rating: 5.0,
            currency: "USD".to_string(),
        }
    }
}

impl SyntheticConfig {
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_default_center(mut self, center: GeoPoint) -> Self {
        self.default_center = center;
        self
    }

    pub fn with_default_radius(mut self, meters: f64) -> Self {
        self.default_radius_meters = meters;
        self
    }
}

/// Produces plausible hotels seeded from the query fingerprint, so the same
/// query always yields the same items
#[derive(Debug, Clone, Default)]
pub struct SyntheticHotelGenerator {
    config: SyntheticConfig,
}

impl SyntheticHotelGenerator {
    pub fn new(config: SyntheticConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SyntheticConfig {
        &self.config
    }

    pub fn generate(&self, params: &SearchParams) -> Result<Vec<Hotel>, DomainError> {
        let key = fingerprint(params)?;
        let mut rng = StdRng::seed_from_u64(seed_from(&key));

        let center = params.origin().unwrap_or(self.config.default_center);
        let radius = params
            .radius_meters
            .unwrap_or(self.config.default_radius_meters);
        let count = self.config.count.min(params.limit as usize);

        let hotels = (0..count)
            .map(|i| self.generate_one(&mut rng, &key, i, &center, radius))
            .collect();

        Ok(hotels)
    }

    fn generate_one(
        &self,
        rng: &mut StdRng,
        key: &str,
        index: usize,
        center: &GeoPoint,
        radius: f64,
    ) -> Hotel {
        // Uniform over the disc
        let r = radius * RADIUS_MARGIN * rng.gen_range(0.0f64..1.0).sqrt();
        let theta = rng.gen_range(0.0..TAU);
        let location = center.offset_by_meters(r * theta.cos(), r * theta.sin());

        let prefix = NAME_PREFIXES[rng.gen_range(0..NAME_PREFIXES.len())];
        let suffix = NAME_SUFFIXES[rng.gen_range(0..NAME_SUFFIXES.len())];
        let street = STREETS[rng.gen_range(0..STREETS.len())];

        let price = round_cents(rng.gen_range(self.config.min_price..=self.config.max_price));
        let rating = (rng.gen_range(self.config.min_rating..=self.config.max_rating) * 10.0).round() / 10.0;

        let external_id = format!("{}-{}", &key[..8], index + 1);

        let mut hotel = Hotel::new(
            SYNTHETIC_SOURCE,
            external_id.clone(),
            format!("{} {} {}", prefix, street, suffix),
            location,
        )
        .with_rating(rating)
        .with_price(Price::new(price, self.config.currency.clone()))
        .with_address(format!("{} {} Street", rng.gen_range(1..999), street))
        .with_photo(
            Photo::new(format!("https://images.example.com/hotels/{}.jpg", external_id))
                .with_caption("Exterior"),
        );

        let amenity_count = rng.gen_range(2..=6);
        for amenity in AMENITIES.choose_multiple(rng, amenity_count) {
            hotel = hotel.with_amenity(*amenity);
        }

        hotel
    }
}

fn seed_from(fingerprint: &str) -> u64 {
    fingerprint
        .get(..16)
        .and_then(|prefix| u64::from_str_radix(prefix, 16).ok())
        .unwrap_or_default()
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
