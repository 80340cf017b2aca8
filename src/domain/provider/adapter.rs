//! The upstream adapter contract and the pages it returns

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ProviderError;
use crate::domain::hotel::{Hotel, SearchParams};

/// One page of normalized results from an upstream
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderPage {
    pub items: Vec<Hotel>,
    /// Upstream's own total, which may exceed `items.len()`
    pub total: usize,
    pub has_more: bool,
}

impl ProviderPage {
    pub fn new(items: Vec<Hotel>) -> Self {
        let total = items.len();
        Self {
            items,
            total,
            has_more: false,
        }
    }

    pub fn with_total(mut self, total: usize) -> Self {
        self.total = total;
        self.has_more = total > self.items.len();
        self
    }
}

/// What the gateway hands back for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResult {
    pub items: Vec<Hotel>,
    pub total: usize,
    pub has_more: bool,
    /// Name of the adapter that produced the items, `mock` for synthetic results
    pub provider: String,
    pub fallback: bool,
}

impl GatewayResult {
    pub fn live(provider: impl Into<String>, page: ProviderPage) -> Self {
        Self {
            items: page.items,
            total: page.total,
            has_more: page.has_more,
            provider: provider.into(),
            fallback: false,
        }
    }

    pub fn synthetic(items: Vec<Hotel>) -> Self {
        Self {
            total: items.len(),
            items,
            has_more: false,
            provider: crate::domain::hotel::SYNTHETIC_SOURCE.to_string(),
            fallback: true,
        }
    }
}

/// An upstream hotel inventory
#[async_trait]
pub trait HotelProvider: Send + Sync + Debug {
    async fn search(&self, params: &SearchParams) -> Result<ProviderPage, ProviderError>;

    /// Adapter name, matched against the configured provider
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Debug)]
    pub struct MockHotelProvider {
        name: &'static str,
        page: ProviderPage,
        error: Option<ProviderError>,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl MockHotelProvider {
        pub fn new(name: &'static str) -> Self {
            Self {
                name,
                page: ProviderPage::default(),
                error: None,
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn with_items(mut self, items: Vec<Hotel>) -> Self {
            self.page = ProviderPage::new(items);
            self
        }

        pub fn with_page(mut self, page: ProviderPage) -> Self {
            self.page = page;
            self
        }

        pub fn with_error(mut self, error: ProviderError) -> Self {
            self.error = Some(error);
            self
        }

        /// Sleeps before answering, for timeout tests
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HotelProvider for MockHotelProvider {
        async fn search(&self, _params: &SearchParams) -> Result<ProviderPage, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if let Some(ref error) = self.error {
                return Err(error.clone());
            }

            Ok(self.page.clone())
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geo::GeoPoint;

    fn hotel(id: &str) -> Hotel {
        Hotel::new("booking", id, "Hotel", GeoPoint { lat: 0.0, lng: 0.0 })
    }

    #[test]
    fn test_page_with_total_sets_has_more() {
        let page = ProviderPage::new(vec![hotel("1"), hotel("2")]).with_total(40);
        assert_eq!(page.total, 40);
        assert!(page.has_more);

        let page = ProviderPage::new(vec![hotel("1")]);
        assert_eq!(page.total, 1);
        assert!(!page.has_more);
    }

    #[test]
    fn test_synthetic_result_is_flagged() {
        let result = GatewayResult::synthetic(vec![hotel("1")]);

        assert!(result.fallback);
        assert_eq!(result.provider, "mock");
        assert_eq!(result.total, 1);
    }

    #[tokio::test]
    async fn test_mock_provider_counts_calls() {
        use mock::MockHotelProvider;

        let provider = MockHotelProvider::new("booking").with_items(vec![hotel("1")]);
        let params = SearchParams::in_city(
            "NYC",
            "2026-03-01".parse().unwrap(),
            "2026-03-02".parse().unwrap(),
            1,
        );

        let page = provider.search(&params).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(provider.calls(), 1);

        let failing = MockHotelProvider::new("booking").with_error(ProviderError::network("down"));
        assert!(failing.search(&params).await.is_err());
    }
}
