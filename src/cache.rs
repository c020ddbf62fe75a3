// Component F: adaptive cache.
//
// Heap-bounded memoisation of per-fragment walk results. Cost is
// tracked in (item, score) entries rather than raw bytes (an
// empirical ~60-byte-per-entry estimate converts a byte budget into
// an entry budget). Under sustained memory pressure the cache shrinks
// the fragment length it is willing to admit and, if that still isn't
// enough, disables itself outright — monotonic degradation rather
// than thrashing.
//
// The access-ordered backing store is `lru::LruCache` used purely for
// its recency bookkeeping (`get`/`put` bump-to-MRU, `pop_lru` pops the
// least-recently-used entry); *how much* it holds is governed by our
// own entry-count accounting, not by the crate's own capacity limit,
// so it is constructed unbounded.

use crate::walk::ScoreMap;
use lru::LruCache;
use std::sync::Mutex;

/// Empirical bytes-per-(item, score)-entry used to convert a byte
/// budget into an entry budget.
const BYTES_PER_ENTRY: u64 = 60;

/// Starting admission threshold: keys longer than this bypass the cache.
const DEFAULT_KEY_LENGTH_LIMIT: i64 = 10;

/// A point-in-time snapshot of cache counters.
///
/// Reads are best-effort: nothing here is required to be linearisable
/// with concurrent updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub uncacheable: u64,
    pub current_entries: u64,
    pub key_length_limit: i64,
    pub enabled: bool,
}

struct Body<T> {
    store: LruCache<Box<str>, std::sync::Arc<ScoreMap<T>>, rustc_hash::FxBuildHasher>,
    current_entries: u64,
    max_entries: u64,
    key_length_limit: i64,
    /// Disabled by sustained pressure; reset on the next `invalidate`.
    pressure_disabled: bool,
    hits: u64,
    misses: u64,
    evictions: u64,
    uncacheable: u64,
}

/// Memoises per-fragment walk results, keyed by the walk's root fragment.
pub struct AdaptiveCache<T> {
    body: Mutex<Body<T>>,
    /// Permanently off because the configured byte budget was 0; unlike
    /// `pressure_disabled`, `invalidate` never lifts this.
    config_disabled: bool,
}

impl<T> AdaptiveCache<T> {
    /// Builds a cache from a configured byte budget.
    ///
    /// `0` disables caching outright; a negative value is treated as
    /// an effectively unlimited budget.
    #[must_use]
    pub fn with_byte_budget(byte_budget: i64) -> Self {
        let config_disabled = byte_budget == 0;
        let max_entries = if byte_budget < 0 {
            u64::MAX
        } else {
            (byte_budget as u64) / BYTES_PER_ENTRY
        };

        Self {
            body: Mutex::new(Body {
                store: LruCache::unbounded_with_hasher(rustc_hash::FxBuildHasher::default()),
                current_entries: 0,
                max_entries,
                key_length_limit: DEFAULT_KEY_LENGTH_LIMIT,
                pressure_disabled: false,
                hits: 0,
                misses: 0,
                evictions: 0,
                uncacheable: 0,
            }),
            config_disabled,
        }
    }

    /// Returns the cached result for `fragment`, computing and storing
    /// it via `compute` on a miss. Bypasses storage (without erroring)
    /// when the cache is disabled or `fragment` is inadmissible.
    pub fn get_or_compute<F>(&self, fragment: &str, compute: F) -> ScoreMap<T>
    where
        F: FnOnce() -> ScoreMap<T>,
    {
        if self.config_disabled {
            return compute();
        }

        let mut guard = self.body.lock().expect("cache lock poisoned");

        if guard.pressure_disabled {
            return compute();
        }

        if (fragment.chars().count() as i64) > guard.key_length_limit {
            guard.uncacheable += 1;
            drop(guard);
            return compute();
        }

        if let Some(hit) = guard.store.get(fragment) {
            guard.hits += 1;
            return (**hit).clone();
        }

        guard.misses += 1;
        drop(guard);

        let computed = compute();
        let to_store = std::sync::Arc::new(computed.clone());

        let mut guard = self.body.lock().expect("cache lock poisoned");
        guard.insert(fragment, to_store);

        computed
    }

    /// Drops all stored entries and lifts any pressure-induced
    /// disablement, restoring the default admission threshold.
    ///
    /// Called by the coordinator on every graph mutation, since a
    /// stale cached result must never survive a write.
    pub fn invalidate(&self) {
        if self.config_disabled {
            return;
        }
        let mut guard = self.body.lock().expect("cache lock poisoned");
        guard.store.clear();
        guard.current_entries = 0;
        guard.key_length_limit = DEFAULT_KEY_LENGTH_LIMIT;
        guard.pressure_disabled = false;
    }

    /// Takes a best-effort snapshot of the cache's counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let guard = self.body.lock().expect("cache lock poisoned");
        CacheStats {
            hits: guard.hits,
            misses: guard.misses,
            evictions: guard.evictions,
            uncacheable: guard.uncacheable,
            current_entries: guard.current_entries,
            key_length_limit: guard.key_length_limit,
            enabled: !self.config_disabled && !guard.pressure_disabled,
        }
    }
}

impl<T> Body<T> {
    /// Inserts a freshly-computed value and runs the eviction protocol
    /// if the write pushed entry accounting over budget.
    fn insert(&mut self, fragment: &str, value: std::sync::Arc<ScoreMap<T>>) {
        // Re-check admissibility: another thread may have shrunk the
        // limit, or disabled the cache, while we were computing.
        if self.pressure_disabled || (fragment.chars().count() as i64) > self.key_length_limit {
            return;
        }

        let cost = value.len() as u64;
        if let Some(evicted) = self.store.put(fragment.into(), value) {
            self.current_entries = self.current_entries.saturating_sub(evicted.len() as u64);
        }
        self.current_entries += cost;

        self.maybe_evict();
    }

    fn maybe_evict(&mut self) {
        if self.current_entries <= self.max_entries {
            return;
        }

        self.key_length_limit -= 1;
        log::trace!(
            "cache over budget ({} > {}), shrinking admission limit to {}",
            self.current_entries,
            self.max_entries,
            self.key_length_limit
        );
        if self.key_length_limit < 1 {
            self.store.clear();
            self.current_entries = 0;
            self.pressure_disabled = true;
            log::warn!("cache disabled by sustained memory pressure");
            return;
        }

        while self.current_entries > self.max_entries {
            match self.store.pop_lru() {
                Some((_, value)) => {
                    self.current_entries = self.current_entries.saturating_sub(value.len() as u64);
                    self.evictions += 1;
                }
                None => break,
            }
        }

        let limit = self.key_length_limit;
        let stale: Vec<Box<str>> = self
            .store
            .iter()
            .filter(|(key, _)| key.chars().count() as i64 > limit)
            .map(|(key, _)| key.clone())
            .collect();

        for key in stale {
            if let Some(value) = self.store.pop(&key) {
                self.current_entries = self.current_entries.saturating_sub(value.len() as u64);
                self.evictions += 1;
            }
        }
    }
}
