//! Time-bounded memoization of generated artifacts.
//!
//! Entries are keyed by [`Fingerprint`] and considered fresh while
//! `now - generated_at < ttl`. The cache is process-local and unbounded:
//! expired entries are overwritten on the next request for the same
//! fingerprint, never evicted in the background.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use nicebrick_core::Fingerprint;

/// Source of the current time.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A stored artifact and when it was generated.
#[derive(Debug, Clone)]
pub struct CachedArtifact<V> {
    pub artifact: V,
    pub generated_at: DateTime<Utc>,
}

impl<V> CachedArtifact<V> {
    fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match chrono::Duration::from_std(ttl) {
            Ok(ttl) => now.signed_duration_since(self.generated_at) < ttl,
            // Larger than chrono can represent: never expires.
            Err(_) => true,
        }
    }
}

/// Result of [`ArtifactCache::get_or_generate`].
#[derive(Debug, Clone)]
pub struct ArtifactRead<V> {
    value: V,
    generated_at: DateTime<Utc>,
    was_cache_hit: bool,
}

impl<V> ArtifactRead<V> {
    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_value(self) -> V {
        self.value
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn was_cache_hit(&self) -> bool {
        self.was_cache_hit
    }
}

/// Hit/miss counters for an [`ArtifactCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Generator calls that returned an error.
    pub failures: u64,
    pub entry_count: u64,
}

impl CacheStats {
    /// Hit rate in `0.0..=1.0`.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    failures: AtomicU64,
}

/// Fingerprint-keyed artifact cache.
///
/// Cloning shares the underlying map.
#[derive(Clone)]
pub struct ArtifactCache<V> {
    entries: Arc<DashMap<Fingerprint, CachedArtifact<V>>>,
    clock: Arc<dyn Clock>,
    counters: Arc<Counters>,
}

impl<V: Clone> ArtifactCache<V> {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            clock,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Return the cached artifact for `fingerprint` if it is younger than
    /// `ttl`, otherwise call `generate`, store its output and return it.
    ///
    /// A failing generator leaves the cache untouched (a stale entry, if
    /// any, is kept but not served) and its error is returned.
    pub fn get_or_generate<E, F>(
        &self,
        fingerprint: &Fingerprint,
        ttl: Duration,
        generate: F,
    ) -> Result<ArtifactRead<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let now = self.clock.now();

        if let Some(entry) = self.entries.get(fingerprint) {
            if entry.is_fresh(now, ttl) {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(ArtifactRead {
                    value: entry.artifact.clone(),
                    generated_at: entry.generated_at,
                    was_cache_hit: true,
                });
            }
        }

        // The map guard is released before generating; concurrent misses
        // on one fingerprint may both generate, the last store wins.
        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        let artifact = generate().map_err(|e| {
            self.counters.failures.fetch_add(1, Ordering::Relaxed);
            e
        })?;

        let generated_at = self.clock.now();
        self.entries.insert(
            fingerprint.clone(),
            CachedArtifact {
                artifact: artifact.clone(),
                generated_at,
            },
        );

        Ok(ArtifactRead {
            value: artifact,
            generated_at,
            was_cache_hit: false,
        })
    }

    /// Peek at an entry regardless of age.
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<CachedArtifact<V>> {
        self.entries.get(fingerprint).map(|entry| entry.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
            entry_count: self.entries.len() as u64,
        }
    }
}

impl<V: Clone> Default for ArtifactCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for ArtifactCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactCache")
            .field("entries", &self.entries.len())
            .field("clock", &self.clock)
            .finish()
    }
}
