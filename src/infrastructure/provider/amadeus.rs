//! Amadeus hotel list adapter
//!
//! The hotel list endpoints return inventory without offers, so items carry
//! neither price nor rating.

use async_trait::async_trait;
use serde::Deserialize;

use super::http_client::HttpClientTrait;
use crate::domain::geo::GeoPoint;
use crate::domain::hotel::{Hotel, SearchParams};
use crate::domain::provider::{HotelProvider, ProviderError, ProviderPage};

const DEFAULT_AMADEUS_BASE_URL: &str = "https://test.api.amadeus.com";
const PROVIDER_NAME: &str = "amadeus";
const MIN_RADIUS_KM: u32 = 1;
const MAX_RADIUS_KM: u32 = 300;

#[derive(Debug)]
pub struct AmadeusProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
}

impl<C: HttpClientTrait> AmadeusProvider<C> {
    pub fn new(client: C, api_token: impl Into<String>) -> Self {
        Self::with_base_url(client, api_token, DEFAULT_AMADEUS_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let api_token = api_token.into();
        let auth_header = if api_token.is_empty() {
            String::new()
        } else {
            format!("Bearer {}", api_token)
        };

        Self {
            client,
            auth_header,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn by_geocode_url(&self) -> String {
        format!("{}/v1/reference-data/locations/hotels/by-geocode", self.base_url)
    }

    fn by_city_url(&self) -> String {
        format!("{}/v1/reference-data/locations/hotels/by-city", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Accept", "application/vnd.amadeus+json"),
        ]
    }

    /// Picks the endpoint and query for `params`
    fn build_request(&self, params: &SearchParams) -> Result<(String, Vec<(&'static str, String)>), ProviderError> {
        let mut query = Vec::new();

        if let Some(radius) = params.radius_meters {
            query.push(("radius", radius_km(radius).to_string()));
            query.push(("radiusUnit", "KM".to_string()));
        }

        if let Some(origin) = params.origin() {
            query.push(("latitude", origin.lat.to_string()));
            query.push(("longitude", origin.lng.to_string()));
            return Ok((self.by_geocode_url(), query));
        }

        match params.city_id.as_deref() {
            Some(city) => {
                query.push(("cityCode", city.to_uppercase()));
                Ok((self.by_city_url(), query))
            }
            None => Err(ProviderError::unimplemented(
                "Amadeus search requires coordinates or a city code",
            )),
        }
    }

    fn parse_response(
        &self,
        json: serde_json::Value,
        params: &SearchParams,
    ) -> Result<ProviderPage, ProviderError> {
        let response: AmadeusResponse = serde_json::from_value(json)
            .map_err(|e| ProviderError::malformed(format!("Failed to parse response: {}", e)))?;

        let upstream_total = response
            .meta
            .and_then(|m| m.count)
            .unwrap_or(response.data.len());

        // The upstream radius is whole kilometres, so trim back to the exact one
        let bounds = params.origin().zip(params.radius_meters);

        let mut items: Vec<Hotel> = response
            .data
            .into_iter()
            .filter_map(AmadeusHotel::into_domain)
            .filter(|hotel| match &bounds {
                Some((origin, radius)) => hotel.distance_from(origin) <= *radius,
                None => true,
            })
            .collect();

        items.truncate(params.limit as usize);

        Ok(ProviderPage::new(items).with_total(upstream_total))
    }
}

/// Amadeus takes an integral kilometre radius in 1..=300
fn radius_km(meters: f64) -> u32 {
    ((meters / 1_000.0).ceil() as u32).clamp(MIN_RADIUS_KM, MAX_RADIUS_KM)
}

#[async_trait]
impl<C: HttpClientTrait> HotelProvider for AmadeusProvider<C> {
    async fn search(&self, params: &SearchParams) -> Result<ProviderPage, ProviderError> {
        if self.auth_header.is_empty() {
            return Err(ProviderError::authentication("Amadeus API token is not configured"));
        }

        let (url, query) = self.build_request(params)?;
        let response = self.client.get_json(&url, self.headers(), &query).await?;

        self.parse_response(response, params)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

// Amadeus API types

#[derive(Debug, Deserialize)]
struct AmadeusResponse {
    data: Vec<AmadeusHotel>,
    #[serde(default)]
    meta: Option<AmadeusMeta>,
}

#[derive(Debug, Deserialize)]
struct AmadeusMeta {
    #[serde(default)]
    count: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AmadeusHotel {
    hotel_id: String,
    name: String,
    geo_code: AmadeusGeoCode,
    #[serde(default)]
    distance: Option<AmadeusDistance>,
    #[serde(default)]
    address: Option<AmadeusAddress>,
}

#[derive(Debug, Deserialize)]
struct AmadeusGeoCode {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct AmadeusDistance {
    value: f64,
    unit: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AmadeusAddress {
    #[serde(default)]
    lines: Vec<String>,
    #[serde(default)]
    city_name: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
}

impl AmadeusHotel {
    fn into_domain(self) -> Option<Hotel> {
        let location = GeoPoint::new(self.geo_code.latitude, self.geo_code.longitude).ok()?;

        let mut hotel = Hotel::new(PROVIDER_NAME, self.hotel_id, title_case(&self.name), location);

        if let Some(address) = self.address {
            let parts: Vec<String> = address
                .lines
                .into_iter()
                .chain(address.city_name)
                .chain(address.country_code)
                .filter(|p| !p.trim().is_empty())
                .collect();
            hotel = hotel.with_address(parts.join(", "));
        }

        if let Some(distance) = self.distance {
            let meters = match distance.unit.to_uppercase().as_str() {
                "KM" => Some(distance.value * 1_000.0),
                "MI" => Some(distance.value * 1_609.344),
                "M" => Some(distance.value),
                _ => None,
            };

            if let Some(meters) = meters {
                hotel = hotel.with_distance_meters(meters);
            }
        }

        Some(hotel)
    }
}

/// Amadeus names arrive upper-cased
fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::provider::http_client::mock::MockHttpClient;

    const GEOCODE_URL: &str =
        "https://test.api.amadeus.com/v1/reference-data/locations/hotels/by-geocode";
    const CITY_URL: &str = "https://test.api.amadeus.com/v1/reference-data/locations/hotels/by-city";

    fn params() -> SearchParams {
        SearchParams::near(
            48.8566,
            2.3522,
            "2026-03-01".parse().unwrap(),
            "2026-03-04".parse().unwrap(),
            2,
        )
        .with_radius(2_500.0)
    }

    fn sample_response() -> serde_json::Value {
        serde_json::json!({
            "data": [
                {
                    "hotelId": "HLPAR266",
                    "name": "HOTEL DU LOUVRE",
                    "geoCode": {"latitude": 48.8629, "longitude": 2.3364},
                    "distance": {"value": 1.3, "unit": "KM"},
                    "address": {"countryCode": "FR", "cityName": "PARIS", "lines": ["1 PLACE ANDRE MALRAUX"]}
                },
                {
                    "hotelId": "BWPAR001",
                    "name": "BEST WESTERN OPERA",
                    "geoCode": {"latitude": 48.8720, "longitude": 2.3320}
                }
            ],
            "meta": {"count": 2}
        })
    }

    #[tokio::test]
    async fn test_amadeus_geocode_search() {
        let client = MockHttpClient::new().with_response(GEOCODE_URL, sample_response());
        let provider = AmadeusProvider::new(client, "token");

        let page = provider.search(&params()).await.unwrap();

        assert_eq!(page.items.len(), 2);
        assert!(!page.has_more);

        let first = &page.items[0];
        assert_eq!(first.id, "amadeus:HLPAR266");
        assert_eq!(first.name, "Hotel Du Louvre");
        assert_eq!(first.distance_meters, Some(1_300.0));
        assert_eq!(first.address, "1 PLACE ANDRE MALRAUX, PARIS, FR");
        assert!(first.price.is_none());
        assert!(first.rating.is_none());

        let (_, query) = &provider.client.requests()[0];
        assert!(query.contains(&("radius".to_string(), "3".to_string())));
        assert!(query.contains(&("radiusUnit".to_string(), "KM".to_string())));
    }

    #[tokio::test]
    async fn test_amadeus_city_search() {
        let client = MockHttpClient::new().with_response(CITY_URL, serde_json::json!({"data": []}));
        let provider = AmadeusProvider::new(client, "token");

        let query = SearchParams::in_city(
            "par",
            "2026-03-01".parse().unwrap(),
            "2026-03-02".parse().unwrap(),
            1,
        );
        let page = provider.search(&query).await.unwrap();

        assert!(page.items.is_empty());
        let (url, sent) = &provider.client.requests()[0];
        assert_eq!(url, CITY_URL);
        assert!(sent.contains(&("cityCode".to_string(), "PAR".to_string())));
    }

    #[tokio::test]
    async fn test_amadeus_missing_token() {
        let provider = AmadeusProvider::new(MockHttpClient::new(), "");

        let err = provider.search(&params()).await.unwrap_err();
        assert_eq!(err.kind(), "authentication");
    }

    #[tokio::test]
    async fn test_amadeus_auth_error_passes_through() {
        let client = MockHttpClient::new()
            .with_error(GEOCODE_URL, ProviderError::authentication("expired token"));
        let provider = AmadeusProvider::new(client, "token");

        let err = provider.search(&params()).await.unwrap_err();
        assert_eq!(err, ProviderError::authentication("expired token"));
    }

    #[tokio::test]
    async fn test_amadeus_trims_to_exact_radius() {
        // Louvre is 1.3 km and Opera ~2.3 km from the query centre
        let client = MockHttpClient::new().with_response(GEOCODE_URL, sample_response());
        let provider = AmadeusProvider::new(client, "token");

        let page = provider.search(&params().with_radius(1_500.0)).await.unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].external_id, "HLPAR266");
        let (_, query) = &provider.client.requests()[0];
        assert!(query.contains(&("radius".to_string(), "2".to_string())));

        let page = provider.search(&params().with_radius(500.0)).await.unwrap();
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_radius_km_bounds() {
        assert_eq!(radius_km(10.0), 1);
        assert_eq!(radius_km(5_000.0), 5);
        assert_eq!(radius_km(5_001.0), 6);
        assert_eq!(radius_km(1_000_000.0), 300);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("HOTEL  DU LOUVRE"), "Hotel Du Louvre");
        assert_eq!(title_case(""), "");
    }
}
