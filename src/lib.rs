//! Hotel Discovery Engine
//!
//! A cache-and-rank layer over external hotel inventories:
//! - Canonical query fingerprints keying a TTL cache (in-memory or Redis)
//! - One configured provider per search with a deterministic synthetic fallback
//! - Haversine distances and weighted price/rating/distance scoring
//! - Paginated search and ranked "nearest hotels" results

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use domain::clock::{Clock, SystemClock};
use domain::hotel::ScoreNormalizer;
use infrastructure::cache::CacheFactory;
use infrastructure::provider::ProviderFactory;
use infrastructure::services::{HotelSearchConfig, HotelSearchService};

/// Wire the search service from configuration using the system clock
pub async fn build_hotel_service(config: &AppConfig) -> anyhow::Result<HotelSearchService> {
    build_hotel_service_with_clock(config, Arc::new(SystemClock)).await
}

/// Wire the search service from configuration
pub async fn build_hotel_service_with_clock(
    config: &AppConfig,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<HotelSearchService> {
    config.validate()?;

    let cache_config = config.cache.to_cache_config()?;
    let cache = CacheFactory::new().create(&cache_config, clock).await?;
    info!(backend = cache.backend_name(), "Hotel cache ready");

    let gateway = ProviderFactory::create_gateway(&config.hotels)?;
    info!(
        provider = gateway.configured_provider(),
        adapters = ?gateway.adapter_names(),
        "Provider gateway ready"
    );

    let normalizer = ScoreNormalizer::new(config.scoring.clone())?;

    Ok(HotelSearchService::with_config(
        cache,
        Arc::new(gateway),
        normalizer,
        HotelSearchConfig::from(&config.hotels),
    ))
}

/// Create the application state for the HTTP server
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let service = build_hotel_service(config).await?;
    Ok(AppState::new(Arc::new(service)))
}
