//! In-memory hotel cache using moka

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moka::future::Cache as MokaCache;
use moka::ops::compute::{CompResult, Op};

use crate::domain::cache::{fingerprint, CacheEntry, CacheStats, HotelCache};
use crate::domain::clock::{Clock, SystemClock};
use crate::domain::hotel::SearchParams;
use crate::domain::provider::GatewayResult;
use crate::domain::DomainError;

/// Configuration for in-memory cache
#[derive(Debug, Clone)]
pub struct InMemoryCacheConfig {
    /// Maximum number of entries
    pub max_capacity: u64,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

impl InMemoryCacheConfig {
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }
}

/// Stored value; access bookkeeping is updated in place so that a read
/// never re-inserts and so never races a concurrent upsert
#[derive(Debug)]
struct StoredEntry {
    entry: CacheEntry,
    access_count: AtomicU64,
    last_accessed_at: Mutex<DateTime<Utc>>,
}

impl StoredEntry {
    fn new(entry: CacheEntry) -> Self {
        Self {
            access_count: AtomicU64::new(entry.access_count),
            last_accessed_at: Mutex::new(entry.last_accessed_at),
            entry,
        }
    }

    fn record_access(&self, now: DateTime<Utc>) {
        self.access_count.fetch_add(1, Ordering::SeqCst);
        *self.last_accessed_at.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    fn snapshot(&self) -> CacheEntry {
        let mut entry = self.entry.clone();
        entry.access_count = self.access_count.load(Ordering::SeqCst);
        entry.last_accessed_at = *self.last_accessed_at.lock().unwrap_or_else(|e| e.into_inner());
        entry
    }
}

/// Thread-safe in-memory hotel cache
///
/// moka bounds the entry count; expiry is decided against the injected clock
/// rather than moka's own TTL so tests can drive it deterministically.
#[derive(Debug)]
pub struct InMemoryHotelCache {
    cache: MokaCache<String, Arc<StoredEntry>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryHotelCache {
    pub fn new(config: InMemoryCacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            cache: MokaCache::builder().max_capacity(config.max_capacity).build(),
            clock,
        }
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::new(InMemoryCacheConfig::default(), clock)
    }

    /// Removes `key` only if the value present at removal time is expired
    ///
    /// The check and the removal run under moka's per-key lock, so an upsert
    /// landing between a stale read and this call is never discarded.
    async fn remove_if_expired(&self, key: &str, now: DateTime<Utc>) -> bool {
        let outcome = self
            .cache
            .entry_by_ref(key)
            .and_compute_with(|current| {
                let op = match current {
                    Some(stored) if stored.value().entry.is_expired(now) => Op::Remove,
                    _ => Op::Nop,
                };
                std::future::ready(op)
            })
            .await;

        matches!(outcome, CompResult::Removed(_))
    }

    async fn entries(&self) -> Vec<(Arc<String>, Arc<StoredEntry>)> {
        self.cache.run_pending_tasks().await;
        self.cache.iter().collect()
    }
}

impl Default for InMemoryHotelCache {
    fn default() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }
}

#[async_trait]
impl HotelCache for InMemoryHotelCache {
    async fn find(&self, params: &SearchParams) -> Result<Option<CacheEntry>, DomainError> {
        let key = fingerprint(params)?;
        let now = self.clock.now();

        match self.cache.get(&key).await {
            Some(stored) if stored.entry.is_live(now) => {
                stored.record_access(now);
                Ok(Some(stored.snapshot()))
            }
            Some(_) => {
                self.remove_if_expired(&key, now).await;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn upsert(
        &self,
        params: &SearchParams,
        result: &GatewayResult,
        ttl: Duration,
    ) -> Result<CacheEntry, DomainError> {
        let key = fingerprint(params)?;
        let now = self.clock.now();

        let mut written = None;

        self.cache
            .entry_by_ref(key.as_str())
            .and_compute_with(|current| {
                let previous = current.map(|stored| stored.value().snapshot());
                let entry = CacheEntry::upserted(previous.as_ref(), key.clone(), params, result, now, ttl);
                let stored = Arc::new(StoredEntry::new(entry.clone()));
                written = Some(entry);
                std::future::ready(Op::Put(stored))
            })
            .await;

        written.ok_or_else(|| DomainError::internal("Cache upsert produced no entry"))
    }

    async fn invalidate(&self, params: &SearchParams) -> Result<bool, DomainError> {
        let key = fingerprint(params)?;
        Ok(self.cache.remove(&key).await.is_some())
    }

    async fn sweep_expired(&self) -> Result<usize, DomainError> {
        let now = self.clock.now();
        let mut removed = 0;

        for (key, stored) in self.entries().await {
            if stored.entry.is_expired(now) && self.remove_if_expired(&key, now).await {
                removed += 1;
            }
        }

        Ok(removed)
    }

    async fn stats(&self) -> Result<CacheStats, DomainError> {
        let now = self.clock.now();
        let live: Vec<CacheEntry> = self
            .entries()
            .await
            .into_iter()
            .filter(|(_, stored)| stored.entry.is_live(now))
            .map(|(_, stored)| stored.snapshot())
            .collect();

        Ok(CacheStats::from_entries(&live))
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "in_memory"
    }
}
