//! Query management
//!
//! This module provides a query system similar to TanStack Query for managing
//! server state. Every card talks to the backend through a shared [`QueryClient`]
//! which guarantees that a query key maps to at most one in-flight request:
//! concurrent consumers of the same key share the single underlying fetch and
//! its result.

use crate::cache::{CacheConfig, MemoryCache};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use thiserror::Error;
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, warn};

/// Query errors
///
/// Cloned to every consumer that shared the failed request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Query fetch failed
    #[error("Query fetch failed: {0}")]
    FetchError(String),

    /// Query is disabled until its inputs are available
    #[error("Query disabled: {0}")]
    Disabled(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl QueryError {
    /// Message without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            QueryError::FetchError(msg)
            | QueryError::Disabled(msg)
            | QueryError::SerializationError(msg) => msg,
        }
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::SerializationError(err.to_string())
    }
}

/// Result type for query operations
pub type Result<T> = std::result::Result<T, QueryError>;

/// Query key for identifying and caching queries
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    /// Scope of the query (e.g., "location", "weather", "astro")
    pub scope: String,

    /// Identifier within the scope
    pub id: String,

    /// Parameters, kept sorted so equal keys render identically
    pub params: BTreeMap<String, String>,
}

impl QueryKey {
    /// Create a new query key
    pub fn new(scope: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            id: id.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter to the query key
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// Convert to cache key string
    pub fn to_cache_key(&self) -> String {
        format!("query:{}", self)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scope, self.id)?;
        if !self.params.is_empty() {
            write!(f, "?")?;
            let mut first = true;
            for (k, v) in &self.params {
                if !first {
                    write!(f, "&")?;
                }
                write!(f, "{}={}", k, v)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Query state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    /// Query is idle (never fetched, or invalidated)
    Idle,

    /// Query is fetching data
    Fetching,

    /// Query fetch succeeded
    Success,

    /// Query fetch failed
    Error,
}

/// Query metadata
#[derive(Debug, Clone)]
struct QueryMeta {
    state: QueryState,

    /// When the data was last fetched
    fetched_at: Option<SystemTime>,

    /// Number of fetch attempts, retries included
    fetch_count: u32,

    /// Last error if any
    last_error: Option<String>,
}

impl QueryMeta {
    fn new() -> Self {
        Self {
            state: QueryState::Idle,
            fetched_at: None,
            fetch_count: 0,
            last_error: None,
        }
    }
}

/// Query configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    /// How long a result stays cached (None = for the session)
    pub cache_time: Option<Duration>,

    /// Extra attempts after the first failure
    pub retry_count: u32,

    /// Delay between attempts
    pub retry_delay: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            cache_time: None,
            retry_count: 0,
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl QueryConfig {
    /// Retry a failed fetch `count` more times
    pub fn with_retry(mut self, count: u32) -> Self {
        self.retry_count = count;
        self
    }

    /// Set the delay between attempts
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Expire cached results after `ttl`
    pub fn with_cache_time(mut self, ttl: Duration) -> Self {
        self.cache_time = Some(ttl);
        self
    }
}

/// Query trait for defining data fetching logic
#[async_trait]
pub trait Query: Send + Sync {
    /// The type of data this query returns
    type Data: Serialize + DeserializeOwned + Send + Sync;

    /// Fetch the data
    async fn fetch(&self) -> Result<Self::Data>;

    /// Get the query key
    fn key(&self) -> QueryKey;

    /// Get the query configuration
    fn config(&self) -> QueryConfig {
        QueryConfig::default()
    }

    /// Whether the query may run yet
    fn enabled(&self) -> bool {
        true
    }
}

type Flight = Arc<OnceCell<Result<String>>>;

/// Query client for managing queries
///
/// Results are cached as serialized JSON. Cloning the client shares the cache.
pub struct QueryClient {
    cache: MemoryCache<String>,
    meta: Arc<RwLock<HashMap<String, QueryMeta>>>,
    in_flight: Arc<Mutex<HashMap<String, Flight>>>,
}

impl QueryClient {
    /// Create a new query client
    pub fn new(cache_config: CacheConfig) -> Self {
        Self {
            cache: MemoryCache::new(cache_config),
            meta: Arc::new(RwLock::new(HashMap::new())),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Get query data: cached if present, else joined onto (or starting) the
    /// key's single in-flight request
    pub async fn get<Q: Query>(&self, query: &Q) -> Result<Q::Data> {
        let key = query.key();
        if !query.enabled() {
            return Err(QueryError::Disabled(key.to_string()));
        }

        let cache_key = key.to_cache_key();
        let flight = {
            let mut in_flight = self.in_flight.lock();
            match in_flight.get(&cache_key) {
                Some(flight) => Arc::clone(flight),
                None => {
                    // Checked under the in-flight lock: a finishing flight writes the
                    // cache before it deregisters.
                    if let Some(cached) = self.cache.get(&cache_key) {
                        debug!("Query {} served from cache", key);
                        return Ok(serde_json::from_str(&cached)?);
                    }
                    let flight = Flight::default();
                    in_flight.insert(cache_key.clone(), Arc::clone(&flight));
                    flight
                }
            }
        };

        self.join_flight(query, &cache_key, flight).await
    }

    /// Fetch query data, ignoring the cache (still shares an in-flight request)
    pub async fn fetch<Q: Query>(&self, query: &Q) -> Result<Q::Data> {
        let key = query.key();
        if !query.enabled() {
            return Err(QueryError::Disabled(key.to_string()));
        }

        let cache_key = key.to_cache_key();
        let flight = {
            let mut in_flight = self.in_flight.lock();
            Arc::clone(in_flight.entry(cache_key.clone()).or_default())
        };

        self.join_flight(query, &cache_key, flight).await
    }

    async fn join_flight<Q: Query>(
        &self,
        query: &Q,
        cache_key: &str,
        flight: Flight,
    ) -> Result<Q::Data> {
        // If the consumer driving the fetch goes away, the next waiter takes over.
        let outcome = flight.get_or_init(|| self.run(query, cache_key)).await.clone();

        {
            let mut in_flight = self.in_flight.lock();
            if in_flight
                .get(cache_key)
                .is_some_and(|current| Arc::ptr_eq(current, &flight))
            {
                in_flight.remove(cache_key);
            }
        }

        let serialized = outcome?;
        Ok(serde_json::from_str(&serialized)?)
    }

    async fn run<Q: Query>(&self, query: &Q, cache_key: &str) -> Result<String> {
        let config = query.config();

        {
            let mut meta = self.meta.write().await;
            let query_meta = meta
                .entry(cache_key.to_string())
                .or_insert_with(QueryMeta::new);
            query_meta.state = QueryState::Fetching;
        }

        let mut last_error = None;
        for attempt in 0..=config.retry_count {
            if attempt > 0 {
                debug!(
                    "Retrying {} (attempt {}/{})",
                    cache_key,
                    attempt + 1,
                    config.retry_count + 1
                );
                tokio::time::sleep(config.retry_delay).await;
            }

            {
                let mut meta = self.meta.write().await;
                if let Some(query_meta) = meta.get_mut(cache_key) {
                    query_meta.fetch_count += 1;
                }
            }

            match query.fetch().await {
                Ok(data) => {
                    let serialized = serde_json::to_string(&data)?;
                    self.cache
                        .put(cache_key, serialized.clone(), config.cache_time);

                    let mut meta = self.meta.write().await;
                    if let Some(query_meta) = meta.get_mut(cache_key) {
                        query_meta.state = QueryState::Success;
                        query_meta.fetched_at = Some(SystemTime::now());
                        query_meta.last_error = None;
                    }

                    return Ok(serialized);
                }
                Err(e) => {
                    warn!("Query {} failed: {}", cache_key, e);
                    last_error = Some(e);
                }
            }
        }

        let error = last_error
            .unwrap_or_else(|| QueryError::FetchError("no fetch attempted".to_string()));

        let mut meta = self.meta.write().await;
        if let Some(query_meta) = meta.get_mut(cache_key) {
            query_meta.state = QueryState::Error;
            query_meta.last_error = Some(error.to_string());
        }

        Err(error)
    }

    /// Invalidate cached query data
    pub async fn invalidate(&self, key: &QueryKey) {
        let cache_key = key.to_cache_key();
        self.cache.remove(&cache_key);
        self.meta.write().await.remove(&cache_key);
    }

    /// Invalidate all queries matching a scope
    pub async fn invalidate_scope(&self, scope: &str) {
        let prefix = format!("query:{}:", scope);
        let mut meta = self.meta.write().await;

        let keys_to_remove: Vec<String> = meta
            .keys()
            .filter(|k| k.starts_with(&prefix))
            .cloned()
            .collect();

        for cache_key in keys_to_remove {
            meta.remove(&cache_key);
        }
        for cache_key in self.cache.keys() {
            if cache_key.starts_with(&prefix) {
                self.cache.remove(&cache_key);
            }
        }
    }

    /// Drop cached data whose cache time has passed
    pub fn evict_expired(&self) -> usize {
        self.cache.evict_expired()
    }

    /// Get query state
    pub async fn state(&self, key: &QueryKey) -> QueryState {
        let meta = self.meta.read().await;
        meta.get(&key.to_cache_key())
            .map(|m| m.state)
            .unwrap_or(QueryState::Idle)
    }

    /// Number of fetch attempts made for a key
    pub async fn fetch_count(&self, key: &QueryKey) -> u32 {
        let meta = self.meta.read().await;
        meta.get(&key.to_cache_key())
            .map(|m| m.fetch_count)
            .unwrap_or(0)
    }

    /// Last error message recorded for a key
    pub async fn last_error(&self, key: &QueryKey) -> Option<String> {
        let meta = self.meta.read().await;
        meta.get(&key.to_cache_key())
            .and_then(|m| m.last_error.clone())
    }

    /// When a key was last fetched successfully
    pub async fn fetched_at(&self, key: &QueryKey) -> Option<SystemTime> {
        let meta = self.meta.read().await;
        meta.get(&key.to_cache_key()).and_then(|m| m.fetched_at)
    }

    /// Number of keys with a request currently in flight
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.lock().len()
    }

    /// Clear all cached queries
    pub async fn clear(&self) {
        self.cache.clear();
        self.meta.write().await.clear();
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl Clone for QueryClient {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            meta: Arc::clone(&self.meta),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}
