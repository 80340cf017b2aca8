use std::time::Duration;

use serde::Deserialize;

use crate::domain::geo::GeoPoint;
use crate::domain::hotel::{ScoringConfig, MAX_LIMIT};
use crate::domain::DomainError;
use crate::infrastructure::cache::{CacheConfig, CacheType};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub hotels: HotelsConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Cache backend selection and housekeeping
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// `in_memory` or `redis`
    pub backend: String,
    pub redis_url: Option<String>,
    pub key_prefix: String,
    pub max_capacity: u64,
    /// Seconds between expiry sweeps; 0 disables the sweeper
    pub sweep_interval_secs: u64,
}

/// Provider, TTL and fallback settings for hotel search
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HotelsConfig {
    /// Name of the live adapter: `mock`, `booking` or `amadeus`
    pub provider: String,
    pub ttl_hours: u64,
    /// TTL for synthetic results, kept short so live data replaces them soon
    pub fallback_ttl_secs: u64,
    pub default_radius_meters: f64,
    pub timeout_secs: u64,
    /// Number of items requested upstream and cached per query
    pub fetch_limit: u32,
    pub synthetic_count: usize,
    pub default_center: CenterConfig,
    pub booking: BookingConfig,
    pub amadeus: AmadeusConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CenterConfig {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    pub api_key: String,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AmadeusConfig {
    pub api_token: String,
    pub base_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

/// Prometheus exporter settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Route serving the text exposition format
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: "in_memory".to_string(),
            redis_url: None,
            key_prefix: "hotels:search".to_string(),
            max_capacity: 10_000,
            sweep_interval_secs: 300,
        }
    }
}

impl Default for HotelsConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            ttl_hours: 1,
            fallback_ttl_secs: 300,
            default_radius_meters: 5_000.0,
            timeout_secs: 30,
            fetch_limit: 100,
            synthetic_count: 20,
            default_center: CenterConfig::default(),
            booking: BookingConfig::default(),
            amadeus: AmadeusConfig::default(),
        }
    }
}

impl Default for CenterConfig {
    fn default() -> Self {
        // New York City
        Self {
            lat: 40.7128,
            lng: -74.0060,
        }
    }
}

impl CacheSettings {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn to_cache_config(&self) -> Result<CacheConfig, DomainError> {
        let cache_type: CacheType = self.backend.parse()?;

        Ok(CacheConfig {
            cache_type,
            redis_url: self.redis_url.clone(),
            key_prefix: Some(self.key_prefix.clone()),
            max_capacity: Some(self.max_capacity),
        })
    }
}

impl HotelsConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_hours.saturating_mul(3600))
    }

    pub fn fallback_ttl(&self) -> Duration {
        Duration::from_secs(self.fallback_ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Rejects settings the search pipeline cannot run with
    pub fn validate(&self) -> Result<(), DomainError> {
        self.scoring.validate()?;
        self.cache.backend.parse::<CacheType>()?;

        let hotels = &self.hotels;

        if hotels.fetch_limit == 0 || hotels.fetch_limit > MAX_LIMIT {
            return Err(DomainError::configuration(format!(
                "hotels.fetch_limit must be between 1 and {}, got {}",
                MAX_LIMIT, hotels.fetch_limit
            )));
        }

        if !hotels.default_radius_meters.is_finite() || hotels.default_radius_meters <= 0.0 {
            return Err(DomainError::configuration(
                "hotels.default_radius_meters must be positive",
            ));
        }

        if hotels.timeout_secs == 0 {
            return Err(DomainError::configuration("hotels.timeout_secs must be positive"));
        }

        GeoPoint::new(hotels.default_center.lat, hotels.default_center.lng).map_err(|e| {
            DomainError::configuration(format!("hotels.default_center is invalid: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.hotels.provider, "mock");
        assert_eq!(config.hotels.ttl(), Duration::from_secs(3600));
        assert_eq!(config.hotels.fallback_ttl(), Duration::from_secs(300));
        assert_eq!(config.hotels.timeout(), Duration::from_secs(30));
        assert_eq!(config.hotels.fetch_limit, 100);
        assert_eq!(config.hotels.synthetic_count, 20);
        assert_eq!(config.cache.backend, "in_memory");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "hotels": {"provider": "booking", "booking": {"api_key": "k"}},
            "logging": {"level": "debug", "format": "json"}
        }))
        .unwrap();

        assert_eq!(config.hotels.provider, "booking");
        assert_eq!(config.hotels.booking.api_key, "k");
        assert_eq!(config.hotels.ttl_hours, 1);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.scoring, ScoringConfig::default());
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_metrics_section_keeps_default_path() {
        let metrics: MetricsConfig =
            serde_json::from_value(serde_json::json!({"enabled": false})).unwrap();

        assert!(!metrics.enabled);
        assert_eq!(metrics.path, "/metrics");
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut config = AppConfig::default();
        config.hotels.fetch_limit = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.cache.backend = "memcached".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.scoring = ScoringConfig::default().with_weights(1.0, 1.0, 1.0);
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.hotels.default_center = CenterConfig { lat: 100.0, lng: 0.0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cache_settings_to_cache_config() {
        let settings = CacheSettings {
            backend: "redis".to_string(),
            redis_url: Some("redis://localhost".to_string()),
            ..Default::default()
        };

        let config = settings.to_cache_config().unwrap();
        assert_eq!(config.cache_type, CacheType::Redis);
        assert_eq!(config.key_prefix.as_deref(), Some("hotels:search"));
    }
}
