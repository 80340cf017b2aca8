//! Cache-backed hotel search and nearest-hotel ranking

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::HotelsConfig;
use crate::domain::cache::{CacheStats, HotelCache};
use crate::domain::hotel::{
    apply_sort, rank_nearest, Hotel, NearestHotelsResponse, NearestQuery, PagedResult,
    ResultOrigin, ScoreNormalizer, SearchParams,
};
use crate::domain::pagination::paginate;
use crate::domain::provider::GatewayResult;
use crate::domain::DomainError;
use crate::infrastructure::observability::record_cache_lookup;
use crate::infrastructure::provider::ProviderGateway;

/// Tunables for the search service
#[derive(Debug, Clone)]
pub struct HotelSearchConfig {
    /// TTL for live provider results
    pub ttl: Duration,
    /// TTL for synthetic results, so a recovered provider is retried sooner
    pub fallback_ttl: Duration,
    /// Radius used by nearest queries that omit one
    pub default_radius_meters: f64,
    /// Items requested upstream and cached per logical query
    pub fetch_limit: u32,
}

impl Default for HotelSearchConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600),
            fallback_ttl: Duration::from_secs(300),
            default_radius_meters: 5_000.0,
            fetch_limit: 100,
        }
    }
}

impl HotelSearchConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_fallback_ttl(mut self, ttl: Duration) -> Self {
        self.fallback_ttl = ttl;
        self
    }

    pub fn with_default_radius(mut self, meters: f64) -> Self {
        self.default_radius_meters = meters;
        self
    }

    pub fn with_fetch_limit(mut self, limit: u32) -> Self {
        self.fetch_limit = limit;
        self
    }
}

impl From<&HotelsConfig> for HotelSearchConfig {
    fn from(config: &HotelsConfig) -> Self {
        Self {
            ttl: config.ttl(),
            fallback_ttl: config.fallback_ttl(),
            default_radius_meters: config.default_radius_meters,
            fetch_limit: config.fetch_limit,
        }
    }
}

/// Ranking and pagination layer over the cache and the provider gateway
#[derive(Debug)]
pub struct HotelSearchService {
    cache: Arc<dyn HotelCache>,
    gateway: Arc<ProviderGateway>,
    normalizer: ScoreNormalizer,
    config: HotelSearchConfig,
}

impl HotelSearchService {
    pub fn new(
        cache: Arc<dyn HotelCache>,
        gateway: Arc<ProviderGateway>,
        normalizer: ScoreNormalizer,
    ) -> Self {
        Self::with_config(cache, gateway, normalizer, HotelSearchConfig::default())
    }

    pub fn with_config(
        cache: Arc<dyn HotelCache>,
        gateway: Arc<ProviderGateway>,
        normalizer: ScoreNormalizer,
        config: HotelSearchConfig,
    ) -> Self {
        Self {
            cache,
            gateway,
            normalizer,
            config,
        }
    }

    pub fn config(&self) -> &HotelSearchConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<dyn HotelCache> {
        &self.cache
    }

    /// One page of hotels for `params`, sorted as requested
    pub async fn search_hotels(&self, params: SearchParams) -> Result<PagedResult<Hotel>, DomainError> {
        params.validate()?;

        let (mut result, cached) = self.fetch(&params).await?;

        apply_sort(&mut result.items, params.sort, params.origin().as_ref());
        let page = paginate(&result.items, params.page, params.limit);

        Ok(PagedResult::new(
            page,
            ResultOrigin {
                provider: result.provider,
                fallback: result.fallback,
                cached,
            },
        ))
    }

    /// The best `limit` hotels around a point by combined score
    pub async fn find_nearest_hotels(
        &self,
        query: NearestQuery,
    ) -> Result<NearestHotelsResponse, DomainError> {
        let origin = query.validate()?;
        let radius = query
            .radius_meters
            .unwrap_or(self.config.default_radius_meters);

        let params = query.to_search_params(radius, self.config.fetch_limit);
        let (result, cached) = self.fetch(&params).await?;

        let candidates: Vec<Hotel> = if query.filters.is_empty() {
            result.items
        } else {
            result
                .items
                .into_iter()
                .filter(|hotel| query.filters.matches(hotel))
                .collect()
        };

        let items = rank_nearest(candidates, &origin, &self.normalizer, query.limit as usize);

        debug!(
            lat = origin.lat,
            lng = origin.lng,
            radius = radius,
            returned = items.len(),
            "Ranked nearest hotels"
        );

        Ok(NearestHotelsResponse::new(
            items,
            origin,
            radius,
            ResultOrigin {
                provider: result.provider,
                fallback: result.fallback,
                cached,
            },
        ))
    }

    pub async fn cache_stats(&self) -> Result<CacheStats, DomainError> {
        self.cache.stats().await
    }

    pub async fn sweep_expired(&self) -> Result<usize, DomainError> {
        self.cache.sweep_expired().await
    }

    /// Drops the cached result set shared by every page of `params`
    pub async fn invalidate(&self, params: &SearchParams) -> Result<bool, DomainError> {
        self.cache
            .invalidate(&params.for_cache(self.config.fetch_limit))
            .await
    }

    pub async fn clear_cache(&self) -> Result<(), DomainError> {
        self.cache.clear().await
    }

    /// Full upstream result set for `params`, and whether it came from the cache
    async fn fetch(&self, params: &SearchParams) -> Result<(GatewayResult, bool), DomainError> {
        let cache_params = params.for_cache(self.config.fetch_limit);

        match self.cache.find(&cache_params).await {
            Ok(Some(entry)) => {
                record_cache_lookup(true);
                debug!(
                    fingerprint = %entry.fingerprint,
                    items = entry.items.len(),
                    access_count = entry.access_count,
                    "Hotel cache hit"
                );
                return Ok((entry.to_result(), true));
            }
            Ok(None) => {
                record_cache_lookup(false);
                debug!("Hotel cache miss");
            }
            Err(e) => {
                record_cache_lookup(false);
                warn!(
                    backend = self.cache.backend_name(),
                    error = %e,
                    "Hotel cache read failed, treating as miss"
                );
            }
        }

        let result = self.gateway.search(&cache_params).await?;

        let ttl = if result.fallback {
            self.config.fallback_ttl
        } else {
            self.config.ttl
        };

        if let Err(e) = self.cache.upsert(&cache_params, &result, ttl).await {
            warn!(
                backend = self.cache.backend_name(),
                error = %e,
                "Hotel cache write failed"
            );
        }

        Ok((result, false))
    }
}
