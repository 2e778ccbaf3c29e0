//! # reveal-cache
//!
//! Backing-store layer over the `AtomicKv` trait from `reveal-core`.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **KV Implementations**: `RedisKv` for production, `MemoryKv` as the
//!   development fallback and test double
//! - **Vote Ledger**: per-reservation counters, voter dedup records, revealed
//!   flag, all with TTLs tied to the scheduled instant
//! - **Rate Limiter**: fixed-window per-IP counters that fail open

pub mod keys;
pub mod kv;
pub mod ledger;
pub mod pool;
pub mod ratelimit;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig};

// Re-export KV implementations
pub use kv::{MemoryKv, RedisKv};

// Re-export ledger types
pub use ledger::{VoteCounts, VoteLedgerStore};

// Re-export rate limiting types
pub use ratelimit::{RateLimitClass, RateLimiter};
