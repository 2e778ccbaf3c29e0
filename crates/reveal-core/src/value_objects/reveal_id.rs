//! Reveal ID - short random identifier for one scheduled reveal
//!
//! An 8-character alphanumeric identifier. Uniqueness among live reservations
//! is enforced by the allocation loop in the reservation service, which checks
//! the backing store and retries on collision; the generator itself only has
//! to produce well-distributed candidates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a reveal identifier
pub const REVEAL_ID_LENGTH: usize = 8;

/// Identifier for one scheduled reveal event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevealId(String);

impl RevealId {
    /// Create a RevealId from an existing string (e.g. a request field)
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RevealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RevealId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for RevealId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Source of candidate reveal identifiers
///
/// Injected into the reservation service so tests can force collisions with a
/// deterministic sequence.
pub trait IdGenerator: Send + Sync {
    /// Produce one candidate identifier
    fn generate(&self) -> RevealId;
}

/// Default generator drawing uniformly from `[A-Za-z0-9]`
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> RevealId {
        use rand::Rng;

        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

        let mut rng = rand::thread_rng();
        let id: String = (0..REVEAL_ID_LENGTH)
            .map(|_| {
                let idx = rng.gen_range(0..CHARSET.len());
                CHARSET[idx] as char
            })
            .collect();
        RevealId(id)
    }
}
