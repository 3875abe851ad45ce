//! Extraction result cache with LRU eviction and TTL expiry.
//!
//! Keys are content fingerprints, not URLs: the same page body fetched
//! twice hits the cache even when tracking parameters differ. Recency is
//! stamped from a global logical clock held in an atomic, so `get` only
//! needs the read half of the lock and concurrent readers never serialize
//! on bookkeeping.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Bytes of input hashed into a fingerprint. Pages differing only beyond
/// this prefix are disambiguated by the length suffix.
const FINGERPRINT_PREFIX_LEN: usize = 4096;

/// Fingerprint a document for use as a cache key: SHA-256 over the first
/// 4 KiB plus the total byte length.
#[must_use]
pub fn fingerprint(html: &str) -> String {
    let bytes = html.as_bytes();
    let prefix = &bytes[..bytes.len().min(FINGERPRINT_PREFIX_LEN)];
    let mut hasher = Sha256::new();
    hasher.update(prefix);
    hasher.update(u64::try_from(bytes.len()).unwrap_or(u64::MAX).to_le_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(64);
    for byte in digest {
        use std::fmt::Write;
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

/// Counters and occupancy snapshot, serializable for dashboards.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
}

impl CacheStats {
    /// Fraction of lookups served from the cache; 0.0 before any lookup.
    #[must_use]
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }
}

struct Entry {
    value: String,
    expires: Instant,
    last_access: AtomicU64,
}

struct Shared {
    map: RwLock<HashMap<String, Entry>>,
    capacity: usize,
    default_ttl: Duration,
    clock: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
}

impl Shared {
    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    /// Remove every expired entry. Called by the sweeper and cheap enough
    /// to call inline from `put`.
    fn sweep(&self) {
        let now = Instant::now();
        let mut map = self.map.write().unwrap_or_else(PoisonError::into_inner);
        let before = map.len();
        map.retain(|_, entry| now < entry.expires);
        let removed = before - map.len();
        if removed > 0 {
            self.expirations
                .fetch_add(removed as u64, Ordering::Relaxed);
        }
    }
}

/// A bounded cache combining LRU eviction with per-entry TTL expiry.
///
/// Each entry carries its own expiration; `put` applies the constructor
/// TTL as a default and `put_with_ttl` overrides it per insert. Expiry is
/// lazy on `get` and batched in an optional background sweeper; an entry
/// past its TTL is never returned either way. Eviction on insert removes
/// the least recently accessed entry once `capacity` is exceeded.
pub struct LruTtlCache {
    shared: Arc<Shared>,
    stop: Option<mpsc::Sender<()>>,
    sweeper: Option<JoinHandle<()>>,
}

impl LruTtlCache {
    /// A cache without a background sweeper: expiry happens on access.
    #[must_use]
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                map: RwLock::new(HashMap::new()),
                capacity: capacity.max(1),
                default_ttl: ttl,
                clock: AtomicU64::new(0),
                hits: AtomicU64::new(0),
                misses: AtomicU64::new(0),
                evictions: AtomicU64::new(0),
                expirations: AtomicU64::new(0),
            }),
            stop: None,
            sweeper: None,
        }
    }

    /// A cache that additionally sweeps expired entries every `interval`
    /// on a background thread. The thread stops when the cache is dropped.
    #[must_use]
    pub fn with_sweeper(capacity: usize, ttl: Duration, interval: Duration) -> Self {
        let mut cache = Self::new(capacity, ttl);
        let shared = Arc::clone(&cache.shared);
        let (tx, rx) = mpsc::channel::<()>();
        let handle = thread::spawn(move || loop {
            match rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => shared.sweep(),
                // Stop requested or the cache was leaked and the sender
                // dropped; either way the sweeper is done.
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });
        cache.stop = Some(tx);
        cache.sweeper = Some(handle);
        cache
    }

    /// Look up a fingerprint. Refreshes recency on a hit; an expired entry
    /// counts as a miss and is dropped.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let expired = {
            let map = self.shared.map.read().unwrap_or_else(PoisonError::into_inner);
            match map.get(key) {
                Some(entry) if Instant::now() < entry.expires => {
                    entry
                        .last_access
                        .store(self.shared.tick(), Ordering::Relaxed);
                    self.shared.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(entry.value.clone());
                }
                Some(_) => true,
                None => false,
            }
        };
        if expired {
            let mut map = self.shared.map.write().unwrap_or_else(PoisonError::into_inner);
            // Re-check under the write lock: a concurrent put may have
            // replaced the entry with a fresh one.
            if map
                .get(key)
                .is_some_and(|e| Instant::now() >= e.expires)
            {
                map.remove(key);
                self.shared.expirations.fetch_add(1, Ordering::Relaxed);
            }
        }
        self.shared.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Insert a value with the default TTL, evicting the least recently
    /// used entry if full.
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) {
        self.put_with_ttl(key, value, self.shared.default_ttl);
    }

    /// Insert a value with an explicit TTL overriding the default.
    pub fn put_with_ttl(&self, key: impl Into<String>, value: impl Into<String>, ttl: Duration) {
        let now = Instant::now();
        // A TTL too large to represent never expires in practice.
        let expires = now
            .checked_add(ttl)
            .unwrap_or_else(|| now + Duration::from_secs(60 * 60 * 24 * 365));
        let stamp = self.shared.tick();
        let mut map = self.shared.map.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(
            key.into(),
            Entry {
                value: value.into(),
                expires,
                last_access: AtomicU64::new(stamp),
            },
        );
        while map.len() > self.shared.capacity {
            let oldest = map
                .iter()
                .min_by_key(|(_, e)| e.last_access.load(Ordering::Relaxed))
                .map(|(k, _)| k.clone());
            match oldest {
                Some(k) => {
                    map.remove(&k);
                    self.shared.evictions.fetch_add(1, Ordering::Relaxed);
                }
                None => break,
            }
        }
    }

    /// Current counters and occupancy.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let size = self
            .shared
            .map
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        CacheStats {
            size,
            capacity: self.shared.capacity,
            hits: self.shared.hits.load(Ordering::Relaxed),
            misses: self.shared.misses.load(Ordering::Relaxed),
            evictions: self.shared.evictions.load(Ordering::Relaxed),
            expirations: self.shared.expirations.load(Ordering::Relaxed),
        }
    }

    /// Drop all entries, keeping counters.
    pub fn clear(&self) {
        self.shared
            .map
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Drop for LruTtlCache {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.sweeper.take() {
            let _ = handle.join();
        }
    }
}
