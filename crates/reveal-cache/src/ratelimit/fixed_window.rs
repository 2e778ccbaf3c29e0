//! Fixed-window rate limiter keyed by (action class, client IP).
//!
//! The counter is incremented first and the window TTL attached on the
//! increment that created the key, so a key can never outlive its window.
//! The increment happens even for requests past the limit; the window must
//! not sit frozen just below the threshold.
//!
//! Store failures are swallowed and the request allowed: abuse prevention is
//! secondary to availability here, unlike the ledger writes which propagate
//! their errors.

use reveal_core::AtomicKv;
use std::sync::Arc;

use crate::keys;

/// Action classes with independent windows and limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitClass {
    CreateReservation,
    SubmitVote,
    SubmitFeedback,
}

impl RateLimitClass {
    /// Key segment for this class
    #[must_use]
    pub fn key_segment(&self) -> &'static str {
        match self {
            Self::CreateReservation => "create",
            Self::SubmitVote => "vote",
            Self::SubmitFeedback => "feedback",
        }
    }

    /// Window length in seconds
    #[must_use]
    pub fn window_seconds(&self) -> u64 {
        match self {
            Self::CreateReservation | Self::SubmitVote => 60,
            Self::SubmitFeedback => 60 * 60,
        }
    }

    /// Maximum requests per window
    #[must_use]
    pub fn max_requests(&self) -> i64 {
        match self {
            Self::CreateReservation | Self::SubmitFeedback => 5,
            Self::SubmitVote => 10,
        }
    }
}

/// Fixed-window counter over the shared store
#[derive(Clone)]
pub struct RateLimiter {
    kv: Option<Arc<dyn AtomicKv>>,
}

impl RateLimiter {
    /// Create a limiter over the shared KV
    #[must_use]
    pub fn new(kv: Arc<dyn AtomicKv>) -> Self {
        Self { kv: Some(kv) }
    }

    /// A limiter with no store: every request is allowed
    #[must_use]
    pub fn disabled() -> Self {
        Self { kv: None }
    }

    /// Whether this request is within the class's window limit.
    ///
    /// Fails open: an unconfigured or unreachable store allows the request.
    pub async fn allow(&self, class: RateLimitClass, ip: &str) -> bool {
        let Some(kv) = &self.kv else {
            tracing::warn!(class = ?class, ip = %ip, "rate limiter has no store, allowing");
            return true;
        };

        let key = keys::rate_limit(class.key_segment(), ip);

        let count = match kv.incr(&key).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(class = ?class, ip = %ip, error = %e, "rate limit check failed, allowing");
                return true;
            }
        };

        // First increment of a window: attach the TTL in the same logical
        // step so the key cannot live forever
        if count == 1 {
            if let Err(e) = kv.expire(&key, class.window_seconds()).await {
                tracing::warn!(class = ?class, ip = %ip, error = %e, "failed to set rate limit window");
            }
        }

        let allowed = count <= class.max_requests();
        if !allowed {
            tracing::warn!(class = ?class, ip = %ip, count, "rate limit exceeded");
        }
        allowed
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("configured", &self.kv.is_some())
            .finish()
    }
}
