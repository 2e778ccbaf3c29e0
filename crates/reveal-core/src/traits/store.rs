//! Atomic key-value store trait
//!
//! The domain layer defines the primitives it needs; the cache layer provides
//! the Redis implementation and an in-process one for development and tests.
//!
//! Every mutation is a single-key atomic operation. Correctness under
//! concurrent writers from many horizontally-scaled instances rests entirely
//! on these primitives; nothing in the product may split a read-modify-write
//! across two round trips.

use async_trait::async_trait;
use std::collections::HashMap;

/// Error type for backing-store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store command failed: {0}")]
    Backend(String),
}

/// Result type for backing-store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Atomic single-key primitives against the shared store
#[async_trait]
pub trait AtomicKv: Send + Sync {
    /// Round-trip liveness check
    async fn ping(&self) -> StoreResult<()>;

    /// Whether a key exists (expired keys count as absent)
    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Read a scalar value
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a scalar value with a TTL, unconditionally
    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> StoreResult<()>;

    /// Write a scalar value with a TTL only if the key is absent.
    ///
    /// Returns `true` when this call created the key. The write and the
    /// absence check are one atomic step; under concurrent callers exactly
    /// one observes `true`.
    async fn set_nx_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> StoreResult<bool>;

    /// Increment an integer counter by one, creating it at zero first.
    /// Returns the post-increment value.
    async fn incr(&self, key: &str) -> StoreResult<i64>;

    /// Attach a TTL to an existing key. Returns `false` if the key is absent.
    async fn expire(&self, key: &str, ttl_seconds: u64) -> StoreResult<bool>;

    /// Remaining TTL in seconds: `None` if the key is absent, `Some(-1)` if
    /// it exists without an expiry.
    async fn ttl(&self, key: &str) -> StoreResult<Option<i64>>;

    /// Create or overwrite integer hash fields in one step
    async fn hash_set(&self, key: &str, fields: &[(&str, i64)]) -> StoreResult<()>;

    /// Atomically add `by` to one hash field, returning the new value
    async fn hash_incr(&self, key: &str, field: &str, by: i64) -> StoreResult<i64>;

    /// Read all fields of a hash (empty map if the key is absent)
    async fn hash_get_all(&self, key: &str) -> StoreResult<HashMap<String, String>>;
}
