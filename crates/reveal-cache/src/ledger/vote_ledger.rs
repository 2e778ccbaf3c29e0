//! Vote ledger storage in the shared store.
//!
//! One ledger per reservation: a hash of two counters, one dedup record per
//! voting device, and a revealed flag. The ledger and its reservation share
//! one TTL (scheduled instant + 30 days) and die together; voter records
//! inherit the ledger's remaining TTL at write time.
//!
//! All mutations are single-key atomic primitives. The dedup record is
//! written with set-if-absent before the counter increment, so a counter
//! increment never happens without a durable, unique voter record behind it.

use reveal_core::{AtomicKv, RevealId, StoreResult, VoteSide};
use serde::Serialize;
use std::sync::Arc;

use crate::keys;

/// Fallback voter-record TTL when the ledger TTL cannot be read (30 days)
const FALLBACK_VOTER_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Floor for the ledger TTL when the scheduled instant is already almost past
const MIN_LEDGER_TTL_SECS: u64 = 60;

/// Counter snapshot for one reservation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VoteCounts {
    pub prince: i64,
    pub princess: i64,
}

impl VoteCounts {
    #[must_use]
    pub fn total(&self) -> i64 {
        self.prince + self.princess
    }
}

/// Vote ledger store over the shared atomic KV
#[derive(Clone)]
pub struct VoteLedgerStore {
    kv: Arc<dyn AtomicKv>,
}

impl VoteLedgerStore {
    /// Create a ledger store over the shared KV
    #[must_use]
    pub fn new(kv: Arc<dyn AtomicKv>) -> Self {
        Self { kv }
    }

    /// Initialize the ledger for a new reservation with zeroed counters.
    ///
    /// `ttl_seconds` is the precomputed reservation lifetime. A non-positive
    /// value (a race where the scheduled instant is already nearly past) is
    /// clamped to a small positive floor instead of failing the creation.
    pub async fn init(&self, reveal_id: &RevealId, ttl_seconds: i64) -> StoreResult<()> {
        let key = keys::vote(reveal_id);
        let ttl = if ttl_seconds > 0 {
            ttl_seconds as u64
        } else {
            tracing::warn!(reveal_id = %reveal_id, ttl_seconds, "non-positive ledger TTL, clamping");
            MIN_LEDGER_TTL_SECS
        };

        self.kv.hash_set(&key, &[("prince", 0), ("princess", 0)]).await?;
        self.kv.expire(&key, ttl).await?;
        Ok(())
    }

    /// Whether a live ledger exists for this reservation
    pub async fn exists(&self, reveal_id: &RevealId) -> StoreResult<bool> {
        self.kv.exists(&keys::vote(reveal_id)).await
    }

    /// Remaining ledger TTL in seconds, if the ledger exists and has one
    pub async fn remaining_ttl(&self, reveal_id: &RevealId) -> StoreResult<Option<i64>> {
        self.kv.ttl(&keys::vote(reveal_id)).await
    }

    /// Read both counters. Missing or unparseable fields count as zero.
    pub async fn counts(&self, reveal_id: &RevealId) -> StoreResult<VoteCounts> {
        let fields = self.kv.hash_get_all(&keys::vote(reveal_id)).await?;
        let parse = |side: VoteSide| {
            fields
                .get(side.as_str())
                .and_then(|v| v.parse().ok())
                .unwrap_or(0)
        };
        Ok(VoteCounts {
            prince: parse(VoteSide::Prince),
            princess: parse(VoteSide::Princess),
        })
    }

    /// The side this device already voted for, if any
    pub async fn voter_side(
        &self,
        reveal_id: &RevealId,
        device_id: &str,
    ) -> StoreResult<Option<VoteSide>> {
        let stored = self.kv.get(&keys::voter(reveal_id, device_id)).await?;
        Ok(stored.and_then(|s| match s.parse() {
            Ok(side) => Some(side),
            Err(_) => {
                tracing::warn!(reveal_id = %reveal_id, "unparseable voter record");
                None
            }
        }))
    }

    /// Atomically record this device's vote with set-if-absent.
    ///
    /// Returns `true` when this call created the record; `false` means a
    /// concurrent request for the same device won the race. The record's TTL
    /// is the ledger's remaining TTL, falling back to 30 days when the TTL
    /// read fails or reports no expiry.
    pub async fn record_voter(
        &self,
        reveal_id: &RevealId,
        device_id: &str,
        side: VoteSide,
    ) -> StoreResult<bool> {
        let ttl = match self.remaining_ttl(reveal_id).await {
            Ok(Some(ttl)) if ttl > 0 => ttl as u64,
            Ok(_) => FALLBACK_VOTER_TTL_SECS,
            Err(e) => {
                tracing::warn!(reveal_id = %reveal_id, error = %e, "ledger TTL read failed, using fallback");
                FALLBACK_VOTER_TTL_SECS
            }
        };

        self.kv
            .set_nx_ex(&keys::voter(reveal_id, device_id), side.as_str(), ttl)
            .await
    }

    /// Atomically add one vote to a side, returning the new count
    pub async fn increment(&self, reveal_id: &RevealId, side: VoteSide) -> StoreResult<i64> {
        self.kv
            .hash_incr(&keys::vote(reveal_id), side.as_str(), 1)
            .await
    }

    /// Whether the owner has performed the reveal
    pub async fn is_revealed(&self, reveal_id: &RevealId) -> StoreResult<bool> {
        let flag = self.kv.get(&keys::revealed(reveal_id)).await?;
        Ok(flag.as_deref() == Some("true"))
    }

    /// Set the revealed flag.
    ///
    /// The reveal presentation itself is a collaborator; this is the
    /// primitive it calls, aligned to the ledger's remaining lifetime.
    pub async fn mark_revealed(&self, reveal_id: &RevealId) -> StoreResult<()> {
        let ttl = match self.remaining_ttl(reveal_id).await {
            Ok(Some(ttl)) if ttl > 0 => ttl as u64,
            _ => FALLBACK_VOTER_TTL_SECS,
        };
        self.kv
            .set_ex(&keys::revealed(reveal_id), "true", ttl)
            .await
    }
}

impl std::fmt::Debug for VoteLedgerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoteLedgerStore").finish_non_exhaustive()
    }
}
