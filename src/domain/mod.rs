//! Domain layer - Core business logic and entities

pub mod cache;
pub mod clock;
pub mod error;
pub mod geo;
pub mod hotel;
pub mod pagination;
pub mod provider;

pub use cache::{fingerprint, CacheEntry, CacheStats, HotelCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::DomainError;
pub use geo::{haversine_distance, Distance, GeoPoint, EARTH_RADIUS_METERS};
pub use hotel::{
    apply_sort, rank_nearest, Hotel, HotelFilters, HotelScores, NearestHotelsResponse,
    NearestQuery, PagedResult, Photo, Price, ResultOrigin, ScoreNormalizer, ScoredHotel,
    ScoringConfig, SearchParams, SortOrder, MAX_LIMIT, SYNTHETIC_SOURCE,
};
pub use pagination::{paginate, Page, PageMeta};
pub use provider::{GatewayResult, HotelProvider, ProviderError, ProviderPage};
