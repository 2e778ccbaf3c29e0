//! Integration test support
//!
//! Boots the real router over the in-memory store so the whole HTTP surface
//! can be exercised without external services.

pub mod fixtures;
pub mod helpers;

pub use helpers::TestServer;
