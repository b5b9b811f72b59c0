//! Cache module for storing normalized API results locally
//!
//! This module provides an expiring, namespaced cache over a pluggable
//! key-value storage backend. The cache is best-effort: a failed read is a
//! miss and a failed write is a no-op, so no feature depends on it.

mod manager;
pub mod storage;

pub use manager::{CacheInfo, CacheStore, DEFAULT_NAMESPACE, DEFAULT_TTL_MINUTES};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
