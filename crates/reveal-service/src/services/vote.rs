//! Vote service
//!
//! Dedup-checked, rate-limited, atomically-counted vote submission plus the
//! high-frequency status read.
//!
//! Ordering on the submit path: the voter record lands first (set-if-absent),
//! the counter increment second. A crash between the two leaves the record as
//! the source of truth and undercounts by one; it can never overcount or
//! double-count.

use chrono::Utc;
use reveal_cache::{RateLimitClass, VoteCounts};
use reveal_common::{AppError, AppResult};
use reveal_core::RevealId;
use tracing::{debug, info, instrument};

use crate::dto::{SubmitVoteRequest, VoteStatusResponse};

use super::context::ServiceContext;

/// Vote service
pub struct VoteService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> VoteService<'a> {
    /// Create a new VoteService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Submit one vote for a device
    #[instrument(skip(self, request))]
    pub async fn submit(&self, ip: &str, request: SubmitVoteRequest) -> AppResult<VoteCounts> {
        if !self
            .ctx
            .rate_limiter()
            .allow(RateLimitClass::SubmitVote, ip)
            .await
        {
            return Err(AppError::RateLimitExceeded);
        }

        let reveal_id = RevealId::from(request.reveal_id);
        let ledger = self.ctx.ledger();

        if !ledger.exists(&reveal_id).await? {
            return Err(AppError::not_found(format!("vote {reveal_id}")));
        }

        // Fast-path dedup check before attempting the write
        if let Some(previous) = ledger.voter_side(&reveal_id, &request.device_id).await? {
            return Err(AppError::AlreadyVoted { previous });
        }

        // Set-if-absent settles any race between concurrent requests for the
        // same device: exactly one creates the record
        if !ledger
            .record_voter(&reveal_id, &request.device_id, request.vote)
            .await?
        {
            let previous = ledger
                .voter_side(&reveal_id, &request.device_id)
                .await?
                .unwrap_or(request.vote);
            return Err(AppError::AlreadyVoted { previous });
        }

        let new_count = ledger.increment(&reveal_id, request.vote).await?;
        let snapshot = ledger.counts(&reveal_id).await?;

        // Compose from the increment's own return value so this response
        // reflects at least this vote even if the snapshot raced
        let counts = match request.vote {
            reveal_core::VoteSide::Prince => VoteCounts {
                prince: new_count.max(snapshot.prince),
                princess: snapshot.princess,
            },
            reveal_core::VoteSide::Princess => VoteCounts {
                prince: snapshot.prince,
                princess: new_count.max(snapshot.princess),
            },
        };

        let device_prefix = request.device_id.get(..8).unwrap_or(&request.device_id);
        info!(
            reveal_id = %reveal_id,
            vote = %request.vote,
            device = %device_prefix,
            "Vote accepted"
        );

        Ok(counts)
    }

    /// Read the current counts and revealed flag.
    ///
    /// Called every few seconds by every open client; reads only, no writes.
    #[instrument(skip(self))]
    pub async fn status(&self, reveal_id: &str) -> AppResult<VoteStatusResponse> {
        let reveal_id = RevealId::from(reveal_id);
        let ledger = self.ctx.ledger();

        if !ledger.exists(&reveal_id).await? {
            return Err(AppError::not_found(format!("vote {reveal_id}")));
        }

        let counts = ledger.counts(&reveal_id).await?;
        let is_revealed = ledger.is_revealed(&reveal_id).await?;

        debug!(
            reveal_id = %reveal_id,
            prince = counts.prince,
            princess = counts.princess,
            is_revealed,
            "Vote status read"
        );

        Ok(VoteStatusResponse {
            prince: counts.prince,
            princess: counts.princess,
            total: counts.total(),
            is_revealed,
            server_time: Utc::now().timestamp_millis(),
        })
    }
}
