use std::sync::Arc;

use super::amadeus::AmadeusProvider;
use super::booking::BookingProvider;
use super::gateway::ProviderGateway;
use super::http_client::HttpClient;
use super::synthetic::{SyntheticConfig, SyntheticHotelGenerator};
use crate::config::HotelsConfig;
use crate::domain::geo::GeoPoint;
use crate::domain::DomainError;

/// Factory for the provider gateway
#[derive(Debug)]
pub struct ProviderFactory;

impl ProviderFactory {
    /// Builds a gateway with every known adapter registered
    ///
    /// Adapters without credentials are still registered; selecting one
    /// yields an authentication failure and therefore synthetic results.
    pub fn create_gateway(config: &HotelsConfig) -> Result<ProviderGateway, DomainError> {
        let http_client = HttpClient::with_timeout(config.timeout())
            .map_err(|e| DomainError::configuration(e.to_string()))?;

        let booking = match &config.booking.base_url {
            Some(url) => BookingProvider::with_base_url(http_client.clone(), &config.booking.api_key, url),
            None => BookingProvider::new(http_client.clone(), &config.booking.api_key),
        };

        let amadeus = match &config.amadeus.base_url {
            Some(url) => AmadeusProvider::with_base_url(http_client, &config.amadeus.api_token, url),
            None => AmadeusProvider::new(http_client, &config.amadeus.api_token),
        };

        let gateway = ProviderGateway::new(
            config.provider.trim().to_lowercase(),
            Self::create_synthetic(config)?,
        )
        .with_adapter(Arc::new(booking))
        .with_adapter(Arc::new(amadeus))
        .with_timeout(config.timeout());

        Ok(gateway)
    }

    pub fn create_synthetic(config: &HotelsConfig) -> Result<SyntheticHotelGenerator, DomainError> {
        let center = GeoPoint::new(config.default_center.lat, config.default_center.lng)
            .map_err(|e| DomainError::configuration(format!("Invalid default center: {}", e)))?;

        Ok(SyntheticHotelGenerator::new(
            SyntheticConfig::default()
                .with_count(config.synthetic_count)
                .with_default_center(center)
                .with_default_radius(config.default_radius_meters),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CenterConfig;

    #[test]
    fn test_gateway_registers_adapters() {
        let config = HotelsConfig {
            provider: " Booking ".to_string(),
            ..Default::default()
        };

        let gateway = ProviderFactory::create_gateway(&config).unwrap();

        assert_eq!(gateway.configured_provider(), "booking");
        assert_eq!(gateway.adapter_names(), vec!["booking", "amadeus"]);
    }

    #[test]
    fn test_synthetic_uses_configured_count() {
        let config = HotelsConfig {
            synthetic_count: 7,
            ..Default::default()
        };

        let generator = ProviderFactory::create_synthetic(&config).unwrap();
        assert_eq!(generator.config().count, 7);
    }

    #[test]
    fn test_invalid_center_rejected() {
        let config = HotelsConfig {
            default_center: CenterConfig { lat: 0.0, lng: 200.0 },
            ..Default::default()
        };

        assert!(ProviderFactory::create_gateway(&config).is_err());
    }

    #[tokio::test]
    async fn test_unconfigured_booking_falls_back() {
        let config = HotelsConfig {
            provider: "booking".to_string(),
            ..Default::default()
        };
        let gateway = ProviderFactory::create_gateway(&config).unwrap();

        let params = crate::domain::hotel::SearchParams::in_city(
            "NYC",
            "2026-03-01".parse().unwrap(),
            "2026-03-02".parse().unwrap(),
            1,
        );

        // Empty api key fails before any network call
        let result = gateway.search(&params).await.unwrap();
        assert!(result.fallback);
    }
}
