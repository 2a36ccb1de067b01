//! TTL cache for reverse-geocode results.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::model::Address;

/// Default lifetime of a cached address.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 3600);

/// Exact-coordinate cache key: the bit patterns of (lat, lon).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey(u64, u64);

impl CacheKey {
    fn new(lat: f64, lon: f64) -> Self {
        Self(lat.to_bits(), lon.to_bits())
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    stored_at: Instant,
    address: Address,
}

/// Shared address cache with per-entry time-to-live.
///
/// Cloning is cheap and shares the underlying map, so one cache can
/// serve every pipeline run in a process. Reads evict expired entries;
/// a lookup after expiry falls through to the geocoder again. The
/// exclusive lock keeps concurrent fan-out reads and writes from
/// observing torn entries.
#[derive(Debug, Clone)]
pub struct AddressCache {
    entries: Arc<Mutex<HashMap<CacheKey, CacheEntry>>>,
    ttl: Duration,
}

impl Default for AddressCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl AddressCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Fetch a live entry, evicting it first if the TTL has lapsed.
    pub fn get(&self, lat: f64, lon: f64) -> Option<Address> {
        let key = CacheKey::new(lat, lon);
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(&key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.address.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, lat: f64, lon: f64, address: Address) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            CacheKey::new(lat, lon),
            CacheEntry {
                stored_at: Instant::now(),
                address,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
