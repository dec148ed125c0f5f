//! In-memory request cache
//!
//! LRU eviction with optional per-entry TTL. Nothing is persisted; the cache
//! lives as long as the [`crate::QueryClient`] that owns it.

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cache entry with metadata
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    /// When the entry expires (None = end of session)
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn new(value: V, ttl: Option<Duration>) -> Self {
        Self {
            value,
            expires_at: ttl.map(|d| Instant::now() + d),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries
    pub max_entries: usize,
    /// TTL applied when a put does not specify one
    pub default_ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            default_ttl: None,
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum entries
    pub fn max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Set default TTL
    pub fn default_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.default_ttl = ttl;
        self
    }
}

/// In-memory LRU cache
pub struct MemoryCache<V> {
    cache: Arc<Mutex<LruCache<String, CacheEntry<V>>>>,
    config: CacheConfig,
}

impl<V: Clone> MemoryCache<V> {
    /// Create a new memory cache
    pub fn new(config: CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_entries).unwrap_or(NonZeroUsize::MIN);

        Self {
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
            config,
        }
    }

    /// Get a live value; expired entries are dropped on access
    pub fn get(&self, key: &str) -> Option<V> {
        let mut cache = self.cache.lock();

        if cache.peek(key).is_some_and(|e| e.is_expired()) {
            cache.pop(key);
            return None;
        }

        cache.get(key).map(|entry| entry.value.clone())
    }

    /// Put a value, replacing any previous entry for the key
    pub fn put(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let entry = CacheEntry::new(value, ttl.or(self.config.default_ttl));
        self.cache.lock().put(key.into(), entry);
    }

    /// Remove a value; returns whether it was present
    pub fn remove(&self, key: &str) -> bool {
        self.cache.lock().pop(key).is_some()
    }

    /// Clear all entries
    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    /// Check if key exists and is not expired
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of entries, including expired ones not yet evicted
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Keys currently held (most recently used first)
    pub fn keys(&self) -> Vec<String> {
        self.cache.lock().iter().map(|(k, _)| k.clone()).collect()
    }

    /// Remove expired entries
    pub fn evict_expired(&self) -> usize {
        let mut cache = self.cache.lock();

        let expired_keys: Vec<String> = cache
            .iter()
            .filter(|(_, v)| v.is_expired())
            .map(|(k, _)| k.clone())
            .collect();

        for key in &expired_keys {
            cache.pop(key);
        }

        expired_keys.len()
    }
}

impl<V> Clone for MemoryCache<V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            config: self.config.clone(),
        }
    }
}
