//! Redis-backed hotel cache

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use chrono::{DateTime, Utc};
use redis::{AsyncCommands, Client, Script};
use tracing::warn;

use crate::domain::cache::{fingerprint, namespaced_key, CacheEntry, CacheStats, HotelCache};
use crate::domain::clock::{Clock, SystemClock};
use crate::domain::hotel::SearchParams;
use crate::domain::provider::GatewayResult;
use crate::domain::DomainError;

const SCAN_BATCH: usize = 100;

/// Configuration for Redis cache
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Namespace prepended to every fingerprint
    pub key_prefix: String,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: "hotels:search".to_string(),
        }
    }
}

impl RedisCacheConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }
}

/// Deletes an entry and its access stats only if the payload still matches
/// the value that was judged expired
const REMOVE_IF_UNCHANGED: &str = r"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    redis.call('DEL', KEYS[1], KEYS[2])
    return 1
end
return 0
";

const ACCESS_COUNT_FIELD: &str = "access_count";
const LAST_ACCESSED_FIELD: &str = "last_accessed_at";

/// Redis hotel cache
///
/// Each entry is one JSON value with a native `EX` expiry. Access bookkeeping
/// lives in a sibling hash under `<prefix>-stats`, so a hit only increments
/// counters and never rewrites the payload an upsert may have just replaced.
/// The stored `expires_at` is still checked on read so expiry follows the
/// injected clock.
#[derive(Clone)]
pub struct RedisHotelCache {
    connection: ConnectionManager,
    config: RedisCacheConfig,
    clock: Arc<dyn Clock>,
    remove_if_unchanged: Script,
}

impl fmt::Debug for RedisHotelCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisHotelCache")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

/// A decoded entry plus the raw payload it came from
struct StoredEntry {
    key: String,
    raw: String,
    entry: CacheEntry,
}

impl RedisHotelCache {
    pub async fn new(config: RedisCacheConfig, clock: Arc<dyn Clock>) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| DomainError::cache(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self {
            connection,
            config,
            clock,
            remove_if_unchanged: Script::new(REMOVE_IF_UNCHANGED),
        })
    }

    pub async fn with_url(url: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(RedisCacheConfig::new(url), Arc::new(SystemClock)).await
    }

    fn key_for(&self, params: &SearchParams) -> Result<String, DomainError> {
        Ok(namespaced_key(&self.config.key_prefix, &fingerprint(params)?))
    }

    fn pattern(&self) -> String {
        namespaced_key(&self.config.key_prefix, "*")
    }

    fn stats_pattern(&self) -> String {
        namespaced_key(&stats_namespace(&self.config.key_prefix), "*")
    }

    /// Hash holding the access stats of the entry stored at `key`
    fn stats_key(&self, key: &str) -> String {
        stats_key_for(&self.config.key_prefix, key)
    }

    async fn read(&self, key: &str) -> Result<Option<StoredEntry>, DomainError> {
        let mut conn = self.connection.clone();

        let (raw, stats): (Option<String>, HashMap<String, String>) = redis::pipe()
            .get(key)
            .hgetall(self.stats_key(key))
            .query_async(&mut conn)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to get key '{}': {}", key, e)))?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        let mut entry: CacheEntry = serde_json::from_str(&raw).map_err(|e| {
            DomainError::cache(format!("Failed to deserialize cache entry '{}': {}", key, e))
        })?;
        apply_access_stats(&mut entry, &stats);

        Ok(Some(StoredEntry {
            key: key.to_string(),
            raw,
            entry,
        }))
    }

    /// Bumps the access stats of a hit without touching its payload
    async fn record_access(&self, key: &str, entry: &CacheEntry) -> Result<u64, DomainError> {
        let stats_key = self.stats_key(key);
        let mut conn = self.connection.clone();

        let (count,): (u64,) = redis::pipe()
            .atomic()
            .hincr(&stats_key, ACCESS_COUNT_FIELD, 1u64)
            .hset(&stats_key, LAST_ACCESSED_FIELD, entry.last_accessed_at.to_rfc3339())
            .ignore()
            .expire(&stats_key, self.ttl_secs(entry) as i64)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to record access on '{}': {}", key, e)))?;

        Ok(count)
    }

    /// Writes the payload and its access stats in one transaction, returning
    /// the resulting access count
    async fn write(&self, key: &str, entry: &CacheEntry, fresh: bool) -> Result<u64, DomainError> {
        let data = serde_json::to_string(entry)
            .map_err(|e| DomainError::cache(format!("Failed to serialize cache entry: {}", e)))?;

        let ttl_secs = self.ttl_secs(entry);
        let stats_key = self.stats_key(key);

        let mut pipe = redis::pipe();
        pipe.atomic().set_ex(key, data, ttl_secs).ignore();

        // A brand new entry must not inherit counts from leftover stats
        if fresh {
            pipe.del(&stats_key).ignore();
        }

        pipe.hincr(&stats_key, ACCESS_COUNT_FIELD, 1u64)
            .hset(&stats_key, LAST_ACCESSED_FIELD, entry.last_accessed_at.to_rfc3339())
            .ignore()
            .expire(&stats_key, ttl_secs as i64)
            .ignore();

        let mut conn = self.connection.clone();
        let (count,): (u64,) = pipe
            .query_async(&mut conn)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to set key '{}': {}", key, e)))?;

        Ok(count)
    }

    fn ttl_secs(&self, entry: &CacheEntry) -> u64 {
        entry
            .ttl_remaining(self.clock.now())
            .as_secs_f64()
            .ceil()
            .max(1.0) as u64
    }

    /// Removes `stored` unless an upsert replaced it since it was read
    async fn remove_if_unchanged(&self, stored: &StoredEntry) -> Result<bool, DomainError> {
        let mut conn = self.connection.clone();

        let removed: i64 = self
            .remove_if_unchanged
            .key(&stored.key)
            .key(self.stats_key(&stored.key))
            .arg(&stored.raw)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to remove key '{}': {}", stored.key, e)))?;

        Ok(removed > 0)
    }

    async fn delete(&self, keys: &[String]) -> Result<usize, DomainError> {
        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.connection.clone();
        let deleted: usize = conn
            .del(keys)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to delete keys: {}", e)))?;

        Ok(deleted)
    }

    /// Every key matching `pattern`, via SCAN
    async fn scan_keys(&self, pattern: &str) -> Result<Vec<String>, DomainError> {
        let mut conn = self.connection.clone();
        let mut cursor = 0u64;
        let mut all = Vec::new();

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| {
                    DomainError::cache(format!("Failed to scan keys with pattern '{}': {}", pattern, e))
                })?;

            all.extend(keys);
            cursor = next;

            if cursor == 0 {
                break;
            }
        }

        Ok(all)
    }

    /// Loads every entry in the namespace; undecodable values are skipped
    async fn load_all(&self) -> Result<Vec<StoredEntry>, DomainError> {
        let mut loaded = Vec::new();

        for key in self.scan_keys(&self.pattern()).await? {
            match self.read(&key).await {
                Ok(Some(stored)) => loaded.push(stored),
                Ok(None) => {}
                Err(e) => warn!(key = %key, error = %e, "Skipping unreadable cache entry"),
            }
        }

        Ok(loaded)
    }
}

fn stats_namespace(prefix: &str) -> String {
    format!("{}-stats", prefix)
}

/// Maps `<prefix>:<fingerprint>` to `<prefix>-stats:<fingerprint>`
fn stats_key_for(prefix: &str, key: &str) -> String {
    let fingerprint = key
        .strip_prefix(prefix)
        .map_or(key, |rest| rest.trim_start_matches(':'));
    namespaced_key(&stats_namespace(prefix), fingerprint)
}

/// Overlays the counters kept in the stats hash onto a decoded payload
fn apply_access_stats(entry: &mut CacheEntry, stats: &HashMap<String, String>) {
    if let Some(count) = stats.get(ACCESS_COUNT_FIELD).and_then(|v| v.parse().ok()) {
        entry.access_count = count;
    }

    if let Some(at) = stats
        .get(LAST_ACCESSED_FIELD)
        .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
    {
        entry.last_accessed_at = at.with_timezone(&Utc);
    }
}

#[async_trait]
impl HotelCache for RedisHotelCache {
    async fn find(&self, params: &SearchParams) -> Result<Option<CacheEntry>, DomainError> {
        let key = self.key_for(params)?;
        let now = self.clock.now();

        let Some(stored) = self.read(&key).await? else {
            return Ok(None);
        };

        if stored.entry.is_expired(now) {
            if let Err(e) = self.remove_if_unchanged(&stored).await {
                warn!(key = %key, error = %e, "Failed to remove expired cache entry");
            }
            return Ok(None);
        }

        let mut entry = stored.entry;
        entry.record_access(now);

        match self.record_access(&key, &entry).await {
            Ok(count) => entry.access_count = count,
            Err(e) => warn!(key = %key, error = %e, "Failed to record cache access"),
        }

        Ok(Some(entry))
    }

    async fn upsert(
        &self,
        params: &SearchParams,
        result: &GatewayResult,
        ttl: Duration,
    ) -> Result<CacheEntry, DomainError> {
        let fingerprint = fingerprint(params)?;
        let key = namespaced_key(&self.config.key_prefix, &fingerprint);

        let previous = self.read(&key).await.unwrap_or_else(|e| {
            warn!(key = %key, error = %e, "Ignoring unreadable previous cache entry");
            None
        });
        let previous = previous.map(|stored| stored.entry);

        let mut entry = CacheEntry::upserted(previous.as_ref(), fingerprint, params, result, self.clock.now(), ttl);
        entry.access_count = self.write(&key, &entry, previous.is_none()).await?;

        Ok(entry)
    }

    async fn invalidate(&self, params: &SearchParams) -> Result<bool, DomainError> {
        let key = self.key_for(params)?;
        let stats_key = self.stats_key(&key);
        let existed = self.delete(std::slice::from_ref(&key)).await? > 0;
        self.delete(&[stats_key]).await?;
        Ok(existed)
    }

    async fn sweep_expired(&self) -> Result<usize, DomainError> {
        let now = self.clock.now();
        let mut removed = 0;

        for stored in self.load_all().await? {
            if stored.entry.is_expired(now) && self.remove_if_unchanged(&stored).await? {
                removed += 1;
            }
        }

        Ok(removed)
    }

    async fn stats(&self) -> Result<CacheStats, DomainError> {
        let now = self.clock.now();
        let entries = self.load_all().await?;

        Ok(CacheStats::from_entries(
            entries
                .iter()
                .map(|stored| &stored.entry)
                .filter(|entry| entry.is_live(now)),
        ))
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut keys = self.scan_keys(&self.pattern()).await?;
        keys.extend(self.scan_keys(&self.stats_pattern()).await?);
        self.delete(&keys).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geo::GeoPoint;
    use crate::domain::hotel::Hotel;
    use crate::domain::provider::ProviderPage;

    // These tests require a running Redis instance

    fn get_test_config() -> RedisCacheConfig {
        RedisCacheConfig::new("redis://127.0.0.1:6379").with_key_prefix("test:hotels")
    }

    fn params() -> SearchParams {
        SearchParams::in_city(
            "NYC",
            "2026-03-01".parse().unwrap(),
            "2026-03-02".parse().unwrap(),
            2,
        )
    }

    fn result() -> GatewayResult {
        let hotel = Hotel::new("booking", "1", "Redis Inn", GeoPoint { lat: 0.0, lng: 0.0 });
        GatewayResult::live("booking", ProviderPage::new(vec![hotel]))
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_upsert_and_find() {
        let cache = RedisHotelCache::new(get_test_config(), Arc::new(SystemClock))
            .await
            .unwrap();

        cache.upsert(&params(), &result(), Duration::from_secs(60)).await.unwrap();

        let entry = cache.find(&params()).await.unwrap().unwrap();
        assert_eq!(entry.items.len(), 1);
        assert_eq!(entry.access_count, 2);

        // Cleanup
        cache.clear().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_expiry_follows_clock() {
        use crate::domain::clock::ManualClock;

        let clock = Arc::new(ManualClock::default());
        let cache = RedisHotelCache::new(get_test_config(), clock.clone())
            .await
            .unwrap();

        cache.upsert(&params(), &result(), Duration::from_secs(60)).await.unwrap();
        clock.advance(chrono::Duration::seconds(61));

        assert!(cache.find(&params()).await.unwrap().is_none());

        cache.clear().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_invalidate() {
        let cache = RedisHotelCache::new(get_test_config(), Arc::new(SystemClock))
            .await
            .unwrap();

        cache.upsert(&params(), &result(), Duration::from_secs(60)).await.unwrap();

        assert!(cache.invalidate(&params()).await.unwrap());
        assert!(cache.find(&params()).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_hit_keeps_newer_upsert() {
        let cache = RedisHotelCache::new(get_test_config(), Arc::new(SystemClock))
            .await
            .unwrap();

        cache.upsert(&params(), &result(), Duration::from_secs(60)).await.unwrap();
        cache.find(&params()).await.unwrap();
        cache
            .upsert(&params(), &GatewayResult::synthetic(Vec::new()), Duration::from_secs(60))
            .await
            .unwrap();

        let entry = cache.find(&params()).await.unwrap().unwrap();
        assert!(entry.items.is_empty());
        assert!(entry.fallback);
        assert_eq!(entry.access_count, 4);

        cache.clear().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_sweep_skips_replaced_entry() {
        use crate::domain::clock::ManualClock;

        let clock = Arc::new(ManualClock::default());
        let cache = RedisHotelCache::new(get_test_config(), clock.clone())
            .await
            .unwrap();

        cache.upsert(&params(), &result(), Duration::from_secs(60)).await.unwrap();
        clock.advance(chrono::Duration::seconds(61));

        let key = cache.key_for(&params()).unwrap();
        let expired = cache.read(&key).await.unwrap().unwrap();
        cache.upsert(&params(), &result(), Duration::from_secs(60)).await.unwrap();

        assert!(!cache.remove_if_unchanged(&expired).await.unwrap());
        assert!(cache.find(&params()).await.unwrap().is_some());

        cache.clear().await.unwrap();
    }

    #[test]
    fn test_stats_key_outside_entry_namespace() {
        let key = namespaced_key("hotels:search", "abc123");

        assert_eq!(stats_key_for("hotels:search", &key), "hotels:search-stats:abc123");
        assert!(!stats_key_for("hotels:search", &key).starts_with("hotels:search:"));
        assert_eq!(stats_key_for("", "abc123"), "-stats:abc123");
    }

    #[test]
    fn test_apply_access_stats_overrides_payload() {
        let mut entry = CacheEntry::upserted(
            None,
            "abc123",
            &params(),
            &result(),
            Utc::now(),
            Duration::from_secs(60),
        );
        let accessed = entry.last_accessed_at + chrono::Duration::minutes(3);

        let stats = HashMap::from([
            (ACCESS_COUNT_FIELD.to_string(), "7".to_string()),
            (LAST_ACCESSED_FIELD.to_string(), accessed.to_rfc3339()),
        ]);
        apply_access_stats(&mut entry, &stats);

        assert_eq!(entry.access_count, 7);
        assert_eq!(entry.last_accessed_at, accessed);
    }

    #[test]
    fn test_apply_access_stats_ignores_missing_or_bad_fields() {
        let mut entry = CacheEntry::upserted(
            None,
            "abc123",
            &params(),
            &result(),
            Utc::now(),
            Duration::from_secs(60),
        );
        let before = entry.clone();

        apply_access_stats(&mut entry, &HashMap::new());
        assert_eq!(entry, before);

        let stats = HashMap::from([(ACCESS_COUNT_FIELD.to_string(), "many".to_string())]);
        apply_access_stats(&mut entry, &stats);
        assert_eq!(entry, before);
    }

    #[test]
    fn test_default_prefix() {
        let config = RedisCacheConfig::new("redis://localhost");
        assert_eq!(config.key_prefix, "hotels:search");

        let config = config.with_key_prefix("myapp");
        assert_eq!(config.key_prefix, "myapp");
    }
}
