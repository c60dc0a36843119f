/*!
 * Bounded, time-limited result caching.
 *
 * This module provides the cache that memoizes final pipeline results so
 * identical prompts are not processed twice within the TTL window.
 *
 * Entries expire lazily: an expired entry is only removed when it is next
 * looked up, so it keeps occupying capacity until then. When the store is
 * full, any insert evicts the entry that has been resident longest, even
 * when the insert overwrites an existing key.
 */

use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::errors::ConfigError;
use crate::pipeline::ValidationResult;

/// Cache of final pipeline results keyed by `validator::cache_key`
pub type ResultCache = TtlCache<ValidationResult>;

/// A stored value and when it was inserted
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    /// Monotonic insertion counter, breaks ties between equal timestamps
    sequence: u64,
}

/// Cache usage counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
}

impl CacheStats {
    /// Ratio of hits over all lookups, 0.0 when nothing was looked up
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

struct CacheState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    next_sequence: u64,
    stats: CacheStats,
}

/// Key-agnostic cache with a capacity bound and a uniform TTL.
///
/// Every operation takes the internal lock for its whole duration, so
/// concurrent `set` calls racing at capacity cannot overfill the store.
pub struct TtlCache<V> {
    state: Mutex<CacheState<V>>,
    max_size: usize,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache holding at most `max_size` entries, each valid for `ttl`.
    pub fn new(max_size: usize, ttl: Duration) -> Result<Self, ConfigError> {
        if max_size == 0 {
            return Err(ConfigError::InvalidCacheSize(max_size));
        }
        if ttl.is_zero() {
            return Err(ConfigError::InvalidTtl);
        }

        debug!("Initialized cache with max_size={}, ttl={:?}", max_size, ttl);

        Ok(Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                next_sequence: 0,
                stats: CacheStats::default(),
            }),
            max_size,
            ttl,
        })
    }

    /// Create a cache with a TTL given in whole seconds.
    pub fn with_ttl_secs(max_size: usize, ttl_secs: u64) -> Result<Self, ConfigError> {
        Self::new(max_size, Duration::from_secs(ttl_secs))
    }

    /// Look up a value. Expired entries are removed and reported as absent.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let expired = match state.entries.get(key) {
            None => {
                state.stats.misses += 1;
                return None;
            }
            Some(entry) => entry.inserted_at.elapsed() > self.ttl,
        };

        if expired {
            state.entries.remove(key);
            state.stats.expirations += 1;
            state.stats.misses += 1;
            debug!("Cache entry expired: {}", key);
            return None;
        }

        state.stats.hits += 1;
        state.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Insert or overwrite a value. At capacity the oldest entry is evicted
    /// first, which may be `key` itself. No TTL check happens here.
    pub fn set(&self, key: &str, value: V) {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        if state.entries.len() >= self.max_size {
            let oldest = state
                .entries
                .iter()
                .min_by_key(|(_, entry)| (entry.inserted_at, entry.sequence))
                .map(|(k, _)| k.clone());

            if let Some(oldest) = oldest {
                state.entries.remove(&oldest);
                state.stats.evictions += 1;
                debug!("Cache full, evicted oldest entry: {}", oldest);
            }
        }

        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                inserted_at: Instant::now(),
                sequence,
            },
        );
    }

    /// Number of resident entries, expired ones included
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn stats(&self) -> CacheStats {
        self.state.lock().stats
    }

    /// Drop every entry and reset the counters
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.stats = CacheStats::default();
        debug!("Result cache cleared");
    }
}
