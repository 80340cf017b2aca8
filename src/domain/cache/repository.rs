//! Hotel cache store trait definition

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use super::entry::{CacheEntry, CacheStats};
use crate::domain::hotel::SearchParams;
use crate::domain::provider::GatewayResult;
use crate::domain::DomainError;

/// Keyed store of upstream result sets
///
/// Entries are addressed by the fingerprint of the params passed in. An entry
/// whose `expires_at` is not in the future is never returned.
#[async_trait]
pub trait HotelCache: Send + Sync + Debug {
    /// Returns the live entry for `params`, recording the access
    async fn find(&self, params: &SearchParams) -> Result<Option<CacheEntry>, DomainError>;

    /// Replaces the entry for `params` with `result`, live for `ttl`
    async fn upsert(
        &self,
        params: &SearchParams,
        result: &GatewayResult,
        ttl: Duration,
    ) -> Result<CacheEntry, DomainError>;

    /// Drops the entry for `params`, returning whether one existed
    async fn invalidate(&self, params: &SearchParams) -> Result<bool, DomainError>;

    /// Removes every expired entry, returning how many were removed
    async fn sweep_expired(&self) -> Result<usize, DomainError>;

    /// Aggregates over live entries
    async fn stats(&self) -> Result<CacheStats, DomainError>;

    /// Drops every entry
    async fn clear(&self) -> Result<(), DomainError>;

    /// Backend name for logs and health output
    fn backend_name(&self) -> &'static str;
}
