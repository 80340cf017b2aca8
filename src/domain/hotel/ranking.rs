//! Ordering of hotel result sets

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::geo::{Distance, GeoPoint};

use super::entity::Hotel;
use super::params::SortOrder;
use super::scoring::{HotelScores, ScoreNormalizer};

/// A hotel ranked for a nearest-hotel query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredHotel {
    #[serde(flatten)]
    pub hotel: Hotel,
    pub distance: Distance,
    pub scores: HotelScores,
}

impl ScoredHotel {
    pub fn combined_score(&self) -> f64 {
        self.scores.combined_score
    }
}

/// Scores `hotels` relative to `origin` and keeps the best `limit`
///
/// The sort is stable, so equal scores keep provider order.
pub fn rank_nearest(
    hotels: Vec<Hotel>,
    origin: &GeoPoint,
    normalizer: &ScoreNormalizer,
    limit: usize,
) -> Vec<ScoredHotel> {
    let mut scored: Vec<ScoredHotel> = hotels
        .into_iter()
        .map(|mut hotel| {
            let meters = hotel.distance_from(origin);
            hotel.distance_meters = Some(meters);

            let scores = normalizer.score(hotel.price.as_ref(), hotel.rating, meters);

            ScoredHotel {
                hotel,
                distance: Distance::from_meters(meters),
                scores,
            }
        })
        .collect();

    scored.sort_by(|a, b| b.combined_score().total_cmp(&a.combined_score()));
    scored.truncate(limit);
    scored
}

/// Applies a caller-requested ordering in place
///
/// Items missing the sort key go last. `Distance` needs an origin; without one
/// the provider order is kept.
pub fn apply_sort(hotels: &mut [Hotel], sort: SortOrder, origin: Option<&GeoPoint>) {
    match sort {
        SortOrder::Recommended => {}
        SortOrder::PriceAsc => {
            hotels.sort_by(|a, b| compare_present_first(a.price_amount(), b.price_amount()));
        }
        SortOrder::PriceDesc => {
            hotels.sort_by(|a, b| {
                compare_present_first(a.price_amount().map(|p| -p), b.price_amount().map(|p| -p))
            });
        }
        SortOrder::Rating => {
            hotels.sort_by(|a, b| compare_present_first(a.rating.map(|r| -r), b.rating.map(|r| -r)));
        }
        SortOrder::Distance => {
            if let Some(origin) = origin {
                hotels.sort_by(|a, b| a.distance_from(origin).total_cmp(&b.distance_from(origin)));
            }
        }
    }
}

fn compare_present_first(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
