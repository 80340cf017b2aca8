//! Normalization of price, rating and distance into comparable scores

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

use super::entity::Price;

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Weights and anchors for the composite hotel score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub price_weight: f64,
    pub rating_weight: f64,
    pub distance_weight: f64,
    /// Price at or below which the price score is 1
    pub price_floor: f64,
    /// Price at or above which the price score is 0
    pub price_ceiling: f64,
    /// Distance at or beyond which the distance score is 0
    pub distance_horizon_meters: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            price_weight: 0.4,
            rating_weight: 0.4,
            distance_weight: 0.2,
            price_floor: 50.0,
            price_ceiling: 250.0,
            distance_horizon_meters: 5_000.0,
        }
    }
}

impl ScoringConfig {
    pub fn with_weights(mut self, price: f64, rating: f64, distance: f64) -> Self {
        self.price_weight = price;
        self.rating_weight = rating;
        self.distance_weight = distance;
        self
    }

    pub fn with_price_anchors(mut self, floor: f64, ceiling: f64) -> Self {
        self.price_floor = floor;
        self.price_ceiling = ceiling;
        self
    }

    pub fn with_distance_horizon(mut self, meters: f64) -> Self {
        self.distance_horizon_meters = meters;
        self
    }

    /// Weights must be non-negative and sum to one so the combined score stays in [0, 1]
    pub fn validate(&self) -> Result<(), DomainError> {
        let weights = [self.price_weight, self.rating_weight, self.distance_weight];

        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(DomainError::configuration(
                "Scoring weights must be finite and non-negative",
            ));
        }

        let sum: f64 = weights.iter().sum();

        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(DomainError::configuration(format!(
                "Scoring weights must sum to 1.0, got {}",
                sum
            )));
        }

        if !(self.price_ceiling > self.price_floor) {
            return Err(DomainError::configuration(format!(
                "price_ceiling ({}) must be greater than price_floor ({})",
                self.price_ceiling, self.price_floor
            )));
        }

        if !(self.distance_horizon_meters > 0.0) {
            return Err(DomainError::configuration(
                "distance_horizon_meters must be positive",
            ));
        }

        Ok(())
    }
}

/// Per-axis and combined scores, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelScores {
    pub price_score: f64,
    pub rating_score: f64,
    pub distance_score: f64,
    pub combined_score: f64,
}

/// Maps raw hotel attributes onto [0, 1] scores
#[derive(Debug, Clone)]
pub struct ScoreNormalizer {
    config: ScoringConfig,
}

impl ScoreNormalizer {
    pub fn new(config: ScoringConfig) -> Result<Self, DomainError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Cheaper is better; a missing price scores 0
    pub fn price_score(&self, price: Option<&Price>) -> f64 {
        let Some(price) = price else {
            return 0.0;
        };

        let span = self.config.price_ceiling - self.config.price_floor;
        sanitise(1.0 - (price.amount - self.config.price_floor) / span)
    }

    /// Maps the 1..=5 rating scale onto [0, 1]; a missing rating scores 0
    pub fn rating_score(&self, rating: Option<f64>) -> f64 {
        match rating {
            Some(rating) => sanitise((rating - 1.0) / 4.0),
            None => 0.0,
        }
    }

    pub fn distance_score(&self, distance_meters: f64) -> f64 {
        sanitise(1.0 - distance_meters / self.config.distance_horizon_meters)
    }

    pub fn score(&self, price: Option<&Price>, rating: Option<f64>, distance_meters: f64) -> HotelScores {
        let price_score = self.price_score(price);
        let rating_score = self.rating_score(rating);
        let distance_score = self.distance_score(distance_meters);

        let combined = self.config.price_weight * price_score
            + self.config.rating_weight * rating_score
            + self.config.distance_weight * distance_score;

        HotelScores {
            price_score,
            rating_score,
            distance_score,
            combined_score: sanitise(combined),
        }
    }
}

impl Default for ScoreNormalizer {
    fn default() -> Self {
        Self {
            config: ScoringConfig::default(),
        }
    }
}

/// Non-finite values become 0, everything else is clamped to [0, 1]
fn sanitise(score: f64) -> f64 {
    if !score.is_finite() {
        return 0.0;
    }
    score.clamp(0.0, 1.0)
}
