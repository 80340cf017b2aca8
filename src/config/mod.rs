//! Application configuration

mod app_config;

pub use app_config::{
    AmadeusConfig, AppConfig, BookingConfig, CacheSettings, CenterConfig, HotelsConfig,
    LogFormat, LoggingConfig, MetricsConfig, ServerConfig,
};
