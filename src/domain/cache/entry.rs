//! Cached result sets and their lifecycle rules

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::hotel::{Hotel, SearchParams};
use crate::domain::provider::GatewayResult;

/// One cached upstream result set, keyed by the query fingerprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub fingerprint: String,
    pub search_params: SearchParams,
    pub items: Vec<Hotel>,
    pub provider: String,
    pub fallback: bool,
    pub total_results: usize,
    pub has_more: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    pub access_count: u64,
}

impl CacheEntry {
    /// Builds the entry that replaces `previous` for the same fingerprint
    ///
    /// `created_at` survives only if the previous entry is still live, and
    /// the access count carries over from it.
    pub fn upserted(
        previous: Option<&CacheEntry>,
        fingerprint: impl Into<String>,
        params: &SearchParams,
        result: &GatewayResult,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let live_previous = previous.filter(|p| p.is_live(now));

        Self {
            fingerprint: fingerprint.into(),
            search_params: params.clone(),
            items: result.items.clone(),
            provider: result.provider.clone(),
            fallback: result.fallback,
            total_results: result.total,
            has_more: result.has_more,
            expires_at: expiry(now, ttl),
            created_at: live_previous.map_or(now, |p| p.created_at),
            updated_at: now,
            last_accessed_at: now,
            access_count: previous.map_or(0, |p| p.access_count) + 1,
        }
    }

    /// Live strictly before `expires_at`
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        !self.is_live(now)
    }

    pub fn record_access(&mut self, now: DateTime<Utc>) {
        self.access_count += 1;
        self.last_accessed_at = now;
    }

    /// Remaining lifetime, zero once expired
    pub fn ttl_remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).to_std().unwrap_or(Duration::ZERO)
    }

    pub fn to_result(&self) -> GatewayResult {
        GatewayResult {
            items: self.items.clone(),
            total: self.total_results,
            has_more: self.has_more,
            provider: self.provider.clone(),
            fallback: self.fallback,
        }
    }
}

fn expiry(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Aggregate view over the live entries of a store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub total_entries: usize,
    pub total_items: usize,
    pub avg_access_count: f64,
    pub oldest_entry: Option<DateTime<Utc>>,
    pub newest_entry: Option<DateTime<Utc>>,
}

impl CacheStats {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a CacheEntry>) -> Self {
        let mut stats = Self::default();
        let mut accesses: u64 = 0;

        for entry in entries {
            stats.total_entries += 1;
            stats.total_items += entry.items.len();
            accesses += entry.access_count;

            stats.oldest_entry = Some(match stats.oldest_entry {
                Some(oldest) => oldest.min(entry.created_at),
                None => entry.created_at,
            });
            stats.newest_entry = Some(match stats.newest_entry {
                Some(newest) => newest.max(entry.created_at),
                None => entry.created_at,
            });
        }

        if stats.total_entries > 0 {
            stats.avg_access_count = accesses as f64 / stats.total_entries as f64;
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geo::GeoPoint;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn params() -> SearchParams {
        SearchParams::in_city(
            "NYC",
            "2026-03-01".parse().unwrap(),
            "2026-03-02".parse().unwrap(),
            2,
        )
    }

    fn result(n: usize) -> GatewayResult {
        let items = (0..n)
            .map(|i| Hotel::new("booking", i.to_string(), "Hotel", GeoPoint { lat: 0.0, lng: 0.0 }))
            .collect();
        GatewayResult::live("booking", crate::domain::provider::ProviderPage::new(items))
    }

    #[test]
    fn test_new_entry() {
        let entry = CacheEntry::upserted(None, "fp", &params(), &result(3), now(), Duration::from_secs(3600));

        assert_eq!(entry.access_count, 1);
        assert_eq!(entry.created_at, now());
        assert_eq!(entry.expires_at, now() + chrono::Duration::hours(1));
        assert_eq!(entry.total_results, 3);
        assert!(!entry.fallback);
    }

    #[test]
    fn test_upsert_keeps_created_at_of_live_entry() {
        let first = CacheEntry::upserted(None, "fp", &params(), &result(3), now(), Duration::from_secs(3600));
        let later = now() + chrono::Duration::minutes(10);
        let second = CacheEntry::upserted(Some(&first), "fp", &params(), &result(5), later, Duration::from_secs(3600));

        assert_eq!(second.created_at, now());
        assert_eq!(second.updated_at, later);
        assert_eq!(second.access_count, 2);
        assert_eq!(second.items.len(), 5);
    }

    #[test]
    fn test_upsert_over_expired_entry_resets_created_at() {
        let first = CacheEntry::upserted(None, "fp", &params(), &result(1), now(), Duration::from_secs(60));
        let later = now() + chrono::Duration::minutes(5);
        let second = CacheEntry::upserted(Some(&first), "fp", &params(), &result(1), later, Duration::from_secs(60));

        assert_eq!(second.created_at, later);
    }

    #[test]
    fn test_expiry_boundary() {
        let entry = CacheEntry::upserted(None, "fp", &params(), &result(1), now(), Duration::from_secs(60));
        let expires = now() + chrono::Duration::seconds(60);

        assert!(entry.is_live(expires - chrono::Duration::seconds(1)));
        assert!(entry.is_expired(expires));
        assert!(entry.is_expired(expires + chrono::Duration::seconds(1)));
        assert_eq!(entry.ttl_remaining(expires + chrono::Duration::seconds(1)), Duration::ZERO);
        assert_eq!(entry.ttl_remaining(now()), Duration::from_secs(60));
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let entry = CacheEntry::upserted(None, "fp", &params(), &result(1), now(), Duration::MAX);
        assert_eq!(entry.expires_at, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_stats_from_entries() {
        let a = CacheEntry::upserted(None, "a", &params(), &result(2), now(), Duration::from_secs(60));
        let later = now() + chrono::Duration::seconds(10);
        let mut b = CacheEntry::upserted(None, "b", &params(), &result(4), later, Duration::from_secs(60));
        b.record_access(later);
        b.record_access(later);

        let stats = CacheStats::from_entries([&a, &b]);

        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.total_items, 6);
        assert_eq!(stats.avg_access_count, 2.0);
        assert_eq!(stats.oldest_entry, Some(now()));
        assert_eq!(stats.newest_entry, Some(later));
    }

    #[test]
    fn test_empty_stats() {
        let stats = CacheStats::from_entries(std::iter::empty());
        assert_eq!(stats, CacheStats::default());
    }
}
