//! Booking.com adapter (RapidAPI)

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

use super::http_client::HttpClientTrait;
use crate::domain::geo::GeoPoint;
use crate::domain::hotel::{Hotel, Photo, Price, SearchParams, SortOrder};
use crate::domain::provider::{HotelProvider, ProviderError, ProviderPage};

const DEFAULT_BOOKING_BASE_URL: &str = "https://booking-com.p.rapidapi.com";
const RAPIDAPI_HOST: &str = "booking-com.p.rapidapi.com";
const PROVIDER_NAME: &str = "booking";

/// Booking.com hotel search through RapidAPI
#[derive(Debug)]
pub struct BookingProvider<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
}

impl<C: HttpClientTrait> BookingProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_BOOKING_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn by_coordinates_url(&self) -> String {
        format!("{}/v1/hotels/search-by-coordinates", self.base_url)
    }

    fn by_destination_url(&self) -> String {
        format!("{}/v1/hotels/search", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("X-RapidAPI-Key", self.api_key.as_str()),
            ("X-RapidAPI-Host", RAPIDAPI_HOST),
        ]
    }

    fn build_query(&self, params: &SearchParams) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("checkin_date", params.checkin.to_string()),
            ("checkout_date", params.checkout.to_string()),
            ("adults_number", params.guests.to_string()),
            ("room_number", "1".to_string()),
            ("units", "metric".to_string()),
            ("locale", "en-gb".to_string()),
            ("filter_by_currency", "USD".to_string()),
            ("order_by", order_by(params.sort).to_string()),
            // Upstream pages are 0-indexed
            ("page_number", params.page.saturating_sub(1).to_string()),
        ];

        match (params.lat, params.lng, params.city_id.as_deref()) {
            (Some(lat), Some(lng), _) => {
                query.push(("latitude", lat.to_string()));
                query.push(("longitude", lng.to_string()));
            }
            (_, _, Some(city)) => {
                query.push(("dest_id", city.to_string()));
                query.push(("dest_type", "city".to_string()));
            }
            _ => {}
        }

        query
    }

    fn parse_response(
        &self,
        json: serde_json::Value,
        params: &SearchParams,
    ) -> Result<ProviderPage, ProviderError> {
        let response: BookingResponse = serde_json::from_value(json)
            .map_err(|e| ProviderError::malformed(format!("Failed to parse response: {}", e)))?;

        let upstream_total = response.count.unwrap_or(response.result.len());
        let nights = params.nights().max(1);

        let mut items: Vec<Hotel> = response
            .result
            .into_iter()
            .filter_map(|hotel| hotel.into_domain(nights))
            .filter(|hotel| match (params.radius_meters, hotel.distance_meters) {
                (Some(radius), Some(distance)) => distance <= radius,
                _ => true,
            })
            .collect();

        items.truncate(params.limit as usize);

        Ok(ProviderPage::new(items).with_total(upstream_total))
    }
}

fn order_by(sort: SortOrder) -> &'static str {
    match sort {
        SortOrder::Recommended => "popularity",
        SortOrder::PriceAsc | SortOrder::PriceDesc => "price",
        SortOrder::Rating => "review_score",
        SortOrder::Distance => "distance",
    }
}

#[async_trait]
impl<C: HttpClientTrait> HotelProvider for BookingProvider<C> {
    async fn search(&self, params: &SearchParams) -> Result<ProviderPage, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::authentication("Booking API key is not configured"));
        }

        let url = if params.origin().is_some() {
            self.by_coordinates_url()
        } else {
            self.by_destination_url()
        };

        let query = self.build_query(params);
        let response = self.client.get_json(&url, self.headers(), &query).await?;

        self.parse_response(response, params)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

// Booking API types

#[derive(Debug, Deserialize)]
struct BookingResponse {
    #[serde(default)]
    result: Vec<BookingHotel>,
    #[serde(default)]
    count: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct BookingHotel {
    #[serde(deserialize_with = "string_or_number")]
    hotel_id: String,
    hotel_name: String,
    latitude: f64,
    longitude: f64,
    /// 0-10 scale
    #[serde(default, deserialize_with = "optional_f64")]
    review_score: Option<f64>,
    /// Whole stay, not per night
    #[serde(default, deserialize_with = "optional_f64")]
    min_total_price: Option<f64>,
    #[serde(default)]
    currency_code: Option<String>,
    /// Kilometres from the search point
    #[serde(default, deserialize_with = "optional_f64")]
    distance: Option<f64>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    main_photo_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    hotel_facilities: Option<String>,
}

impl BookingHotel {
    /// Drops items whose coordinates are out of range
    fn into_domain(self, nights: i64) -> Option<Hotel> {
        let location = GeoPoint::new(self.latitude, self.longitude).ok()?;

        let address = match (self.address, self.city) {
            (Some(address), Some(city)) => format!("{}, {}", address, city),
            (Some(address), None) => address,
            (None, Some(city)) => city,
            (None, None) => String::new(),
        };

        let mut hotel = Hotel::new(PROVIDER_NAME, self.hotel_id, self.hotel_name, location)
            .with_address(address);

        if let Some(score) = self.review_score {
            hotel = hotel.with_rating(score / 2.0);
        }

        if let Some(total) = self.min_total_price {
            let currency = self.currency_code.unwrap_or_else(|| "USD".to_string());
            hotel = hotel.with_price(Price::new(nightly(total, nights), currency));
        }

        if let Some(km) = self.distance {
            hotel = hotel.with_distance_meters(km * 1_000.0);
        }

        if let Some(url) = self.main_photo_url {
            hotel = hotel.with_photo(Photo::new(url));
        }

        if let Some(url) = self.url {
            hotel = hotel.with_booking_url(url);
        }

        for facility in self
            .hotel_facilities
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
        {
            hotel = hotel.with_amenity(facility);
        }

        Some(hotel)
    }
}

/// Per-night amount of a stay total, rounded to cents
fn nightly(total: f64, nights: i64) -> f64 {
    (total / nights as f64 * 100.0).round() / 100.0
}

/// Upstream sends numbers and numeric strings interchangeably
fn optional_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::provider::http_client::mock::MockHttpClient;

    const TEST_URL: &str = "https://booking-com.p.rapidapi.com/v1/hotels/search-by-coordinates";

    fn params() -> SearchParams {
        SearchParams::near(
            40.7128,
            -74.0060,
            "2026-03-01".parse().unwrap(),
            "2026-03-04".parse().unwrap(),
            2,
        )
    }

    fn sample_response() -> serde_json::Value {
        serde_json::json!({
            "count": 57,
            "result": [
                {
                    "hotel_id": 101,
                    "hotel_name": "Hudson Yards Hotel",
                    "latitude": 40.7540,
                    "longitude": -74.0020,
                    "review_score": 8.6,
                    "min_total_price": "189.50",
                    "currency_code": "USD",
                    "distance": "1.2",
                    "address": "10 Hudson Yards",
                    "city": "New York",
                    "main_photo_url": "https://cf.bstatic.com/101.jpg",
                    "url": "https://www.booking.com/hotel/us/101.html",
                    "hotel_facilities": "WiFi, Pool ,gym"
                },
                {
                    "hotel_id": "102",
                    "hotel_name": "No Score Lodge",
                    "latitude": 40.70,
                    "longitude": -74.01,
                    "review_score": null,
                    "distance": 9.5
                },
                {
                    "hotel_id": "103",
                    "hotel_name": "Broken Coordinates",
                    "latitude": 123.0,
                    "longitude": 0.0
                }
            ]
        })
    }

    #[tokio::test]
    async fn test_booking_search() {
        let client = MockHttpClient::new().with_response(TEST_URL, sample_response());
        let provider = BookingProvider::new(client, "test-key");

        let page = provider.search(&params()).await.unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 57);
        assert!(page.has_more);

        let first = &page.items[0];
        assert_eq!(first.id, "booking:101");
        assert_eq!(first.rating, Some(4.3));
        // 189.50 for three nights
        assert_eq!(first.price, Some(Price::usd(63.17)));
        assert_eq!(first.distance_meters, Some(1_200.0));
        assert_eq!(first.address, "10 Hudson Yards, New York");
        assert!(first.amenities.contains("wifi"));
        assert!(first.amenities.contains("pool"));
        assert!(first.booking_url.is_some());

        let second = &page.items[1];
        assert!(second.rating.is_none());
        assert!(second.price.is_none());
    }

    #[tokio::test]
    async fn test_booking_stay_total_becomes_nightly_price() {
        let response = serde_json::json!({
            "result": [{
                "hotel_id": 7,
                "hotel_name": "Three Night Inn",
                "latitude": 40.72,
                "longitude": -74.0,
                "min_total_price": 300,
                "currency_code": "EUR"
            }]
        });
        let client = MockHttpClient::new().with_response(TEST_URL, response);
        let provider = BookingProvider::new(client, "test-key");

        let query = params();
        assert_eq!(query.nights(), 3);

        let page = provider.search(&query).await.unwrap();
        let price = page.items[0].price.as_ref().unwrap();
        assert_eq!(price.amount, 100.0);
        assert_eq!(price.currency, "EUR");
    }

    #[test]
    fn test_nightly_rounds_to_cents() {
        assert_eq!(nightly(300.0, 3), 100.0);
        assert_eq!(nightly(100.0, 3), 33.33);
        assert_eq!(nightly(80.0, 1), 80.0);
    }

    #[tokio::test]
    async fn test_booking_radius_filters_far_items() {
        let client = MockHttpClient::new().with_response(TEST_URL, sample_response());
        let provider = BookingProvider::new(client, "test-key");

        let page = provider.search(&params().with_radius(5_000.0)).await.unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].external_id, "101");
    }

    #[tokio::test]
    async fn test_booking_query_parameters() {
        let client = MockHttpClient::new().with_response(TEST_URL, sample_response());
        let provider = BookingProvider::new(client, "test-key");

        provider
            .search(&params().with_sort(SortOrder::Distance).with_page(3))
            .await
            .unwrap();

        let (url, query) = &provider.client.requests()[0];
        assert_eq!(url, TEST_URL);
        assert!(query.contains(&("order_by".to_string(), "distance".to_string())));
        assert!(query.contains(&("page_number".to_string(), "2".to_string())));
        assert!(query.contains(&("adults_number".to_string(), "2".to_string())));
        assert!(query.contains(&("latitude".to_string(), "40.7128".to_string())));
    }

    #[tokio::test]
    async fn test_booking_city_search_uses_destination_endpoint() {
        let url = "https://booking-com.p.rapidapi.com/v1/hotels/search";
        let client = MockHttpClient::new().with_response(url, serde_json::json!({"result": []}));
        let provider = BookingProvider::new(client, "test-key");

        let query = SearchParams::in_city(
            "-2601889",
            "2026-03-01".parse().unwrap(),
            "2026-03-02".parse().unwrap(),
            1,
        );
        let page = provider.search(&query).await.unwrap();

        assert!(page.items.is_empty());
        assert!(!page.has_more);
        let (_, sent) = &provider.client.requests()[0];
        assert!(sent.contains(&("dest_id".to_string(), "-2601889".to_string())));
    }

    #[tokio::test]
    async fn test_booking_missing_key() {
        let provider = BookingProvider::new(MockHttpClient::new(), "");

        let err = provider.search(&params()).await.unwrap_err();
        assert_eq!(err.kind(), "authentication");
    }

    #[tokio::test]
    async fn test_booking_upstream_error() {
        let client = MockHttpClient::new()
            .with_error(TEST_URL, ProviderError::upstream(503, "Service Unavailable"));
        let provider = BookingProvider::new(client, "test-key");

        let err = provider.search(&params()).await.unwrap_err();
        assert_eq!(err, ProviderError::upstream(503, "Service Unavailable"));
    }

    #[tokio::test]
    async fn test_booking_malformed_response() {
        let client = MockHttpClient::new()
            .with_response(TEST_URL, serde_json::json!({"result": "not a list"}));
        let provider = BookingProvider::new(client, "test-key");

        let err = provider.search(&params()).await.unwrap_err();
        assert_eq!(err.kind(), "malformed_response");
    }
}
