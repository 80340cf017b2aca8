//! Provider gateway: one configured adapter with a synthetic safety net

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::synthetic::SyntheticHotelGenerator;
use crate::domain::hotel::SearchParams;
use crate::domain::provider::{GatewayResult, HotelProvider, ProviderError};
use crate::domain::DomainError;
use crate::infrastructure::observability::{record_provider_fallback, record_provider_request};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Routes searches to the configured adapter
///
/// Calls exactly one adapter per search with no retries. Any adapter error,
/// a timeout, or an unknown adapter name yields synthetic results instead.
#[derive(Debug)]
pub struct ProviderGateway {
    adapters: Vec<Arc<dyn HotelProvider>>,
    configured: String,
    timeout: Duration,
    synthetic: SyntheticHotelGenerator,
}

impl ProviderGateway {
    pub fn new(configured: impl Into<String>, synthetic: SyntheticHotelGenerator) -> Self {
        Self {
            adapters: Vec::new(),
            configured: configured.into(),
            timeout: DEFAULT_TIMEOUT,
            synthetic,
        }
    }

    pub fn with_adapter(mut self, adapter: Arc<dyn HotelProvider>) -> Self {
        self.adapters.push(adapter);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn configured_provider(&self) -> &str {
        &self.configured
    }

    pub fn adapter_names(&self) -> Vec<&'static str> {
        self.adapters.iter().map(|a| a.provider_name()).collect()
    }

    fn adapter(&self) -> Option<&Arc<dyn HotelProvider>> {
        self.adapters
            .iter()
            .find(|a| a.provider_name() == self.configured)
    }

    /// Searches the configured adapter, falling back to synthetic results
    ///
    /// Only `ExhaustedFallback` (the generator produced nothing) or an
    /// internal error escapes; provider failures never do.
    pub async fn search(&self, params: &SearchParams) -> Result<GatewayResult, DomainError> {
        let Some(adapter) = self.adapter() else {
            if self.configured != crate::domain::hotel::SYNTHETIC_SOURCE {
                warn!(
                    provider = %self.configured,
                    available = ?self.adapter_names(),
                    "Configured hotel provider is not registered, using synthetic results"
                );
                record_provider_fallback(&self.configured, "unknown_provider");
            }
            return self.fallback(params);
        };

        let name = adapter.provider_name();
        let started = Instant::now();

        let outcome = match tokio::time::timeout(self.timeout, adapter.search(params)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.timeout)),
        };

        match outcome {
            Ok(page) => {
                record_provider_request(name, "success", started.elapsed());
                debug!(
                    provider = name,
                    items = page.items.len(),
                    total = page.total,
                    "Hotel provider answered"
                );
                Ok(GatewayResult::live(name, page))
            }
            Err(e) => {
                record_provider_request(name, e.kind(), started.elapsed());
                record_provider_fallback(name, e.kind());
                warn!(
                    provider = name,
                    error = %e,
                    kind = e.kind(),
                    "Hotel provider failed, using synthetic results"
                );
                self.fallback(params)
            }
        }
    }

    fn fallback(&self, params: &SearchParams) -> Result<GatewayResult, DomainError> {
        let items = self.synthetic.generate(params)?;

        if items.is_empty() {
            return Err(DomainError::exhausted_fallback(
                "Synthetic generator produced no hotels",
            ));
        }

        Ok(GatewayResult::synthetic(items))
    }
}
