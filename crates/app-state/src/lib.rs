//! Application state management for Zenith Dashboard
//!
//! This crate provides the request cache shared by every display card: an
//! in-memory LRU cache and a query client with per-key single-flight fetching.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod query;

pub use cache::{CacheConfig, MemoryCache};
pub use query::{Query, QueryClient, QueryConfig, QueryError, QueryKey, QueryState};
