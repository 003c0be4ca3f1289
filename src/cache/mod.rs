//! Kernel value cache
//!
//! Provides an LRU cache for kernel values so repeated (i, j) requests skip the
//! sequence merge. When both sides of the kernel are the same sequence set the
//! kernel is symmetric and K(i,j) is stored once under i <= j.

use lru::LruCache;
use std::num::NonZeroUsize;

/// Cache key for kernel values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    i: usize,
    j: usize,
}

impl CacheKey {
    /// Create a key, ordered so that i <= j when the kernel is symmetric
    fn new(i: usize, j: usize, symmetric: bool) -> Self {
        if symmetric && i > j {
            Self { i: j, j: i }
        } else {
            Self { i, j }
        }
    }
}

/// LRU cache for kernel values
pub struct ScoreCache {
    cache: LruCache<CacheKey, f64>,
    symmetric: bool,
    hits: u64,
    misses: u64,
}

impl ScoreCache {
    /// Create a new cache holding at most `capacity` values
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            cache: LruCache::new(capacity),
            symmetric: false,
            hits: 0,
            misses: 0,
        }
    }

    /// Get a kernel value from cache
    pub fn get(&mut self, i: usize, j: usize) -> Option<f64> {
        let key = CacheKey::new(i, j, self.symmetric);
        if let Some(&value) = self.cache.get(&key) {
            self.hits += 1;
            Some(value)
        } else {
            self.misses += 1;
            None
        }
    }

    /// Put a kernel value into cache
    pub fn put(&mut self, i: usize, j: usize, value: f64) {
        let key = CacheKey::new(i, j, self.symmetric);
        self.cache.put(key, value);
    }

    /// Drop all values and statistics, switching key symmetry for the next binding
    pub fn reset(&mut self, symmetric: bool) {
        self.cache.clear();
        self.symmetric = symmetric;
        self.hits = 0;
        self.misses = 0;
    }

    /// Whether K(i,j) and K(j,i) share an entry
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Get cache hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            capacity: self.cache.cap().get(),
            size: self.cache.len(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub capacity: usize,
    pub size: usize,
}
