//! Hotel domain - result items, queries, scoring and ranking

mod entity;
mod params;
mod ranking;
mod response;
mod scoring;

pub use entity::{Hotel, Photo, Price, SYNTHETIC_SOURCE};
pub use params::{HotelFilters, NearestQuery, SearchParams, SortOrder, MAX_LIMIT};
pub use ranking::{apply_sort, rank_nearest, ScoredHotel};
pub use response::{NearestHotelsResponse, PagedResult, ResultOrigin};
pub use scoring::{HotelScores, ScoreNormalizer, ScoringConfig};
