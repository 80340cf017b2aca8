//! Cache domain - fingerprinted storage of upstream result sets

mod entry;
mod fingerprint;
mod repository;

pub use entry::{CacheEntry, CacheStats};
pub use fingerprint::{canonical_json, fingerprint, fingerprint_value, namespaced_key};
pub use repository::HotelCache;

#[cfg(test)]
pub use repository::mock::MockHotelCache;
