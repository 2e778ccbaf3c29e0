//! Backing-store key namespace
//!
//! Single source of truth for key construction so the ledger, limiter, and
//! tests can never drift apart.

use reveal_core::RevealId;

/// Vote counter hash for one reservation
#[must_use]
pub fn vote(reveal_id: &RevealId) -> String {
    format!("vote:{reveal_id}")
}

/// Dedup record for one (reservation, device) pair
#[must_use]
pub fn voter(reveal_id: &RevealId, device_id: &str) -> String {
    format!("voter:{reveal_id}:{device_id}")
}

/// Revealed flag for one reservation
#[must_use]
pub fn revealed(reveal_id: &RevealId) -> String {
    format!("reveal:{reveal_id}:revealed")
}

/// Fixed-window counter for one (action class, client IP) pair
#[must_use]
pub fn rate_limit(class_segment: &str, ip: &str) -> String {
    format!("ratelimit:{class_segment}:{ip}")
}
