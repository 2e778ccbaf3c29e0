//! Service context - dependency container for services
//!
//! Constructed once at process start and passed by reference into every
//! service, so the store dependency stays visible and swappable (the tests
//! hand it the in-memory KV).

use std::sync::Arc;

use reveal_cache::{RateLimiter, VoteLedgerStore};
use reveal_common::auth::TokenService;
use reveal_core::{AtomicKv, IdGenerator};

use super::feedback::FeedbackSink;

/// Dependency container shared by all services
#[derive(Clone)]
pub struct ServiceContext {
    kv: Arc<dyn AtomicKv>,
    ledger: VoteLedgerStore,
    rate_limiter: RateLimiter,
    tokens: Arc<TokenService>,
    id_generator: Arc<dyn IdGenerator>,
    feedback_sink: Arc<dyn FeedbackSink>,
}

impl ServiceContext {
    /// Create a service context over a shared store connection
    pub fn new(
        kv: Arc<dyn AtomicKv>,
        tokens: Arc<TokenService>,
        id_generator: Arc<dyn IdGenerator>,
        feedback_sink: Arc<dyn FeedbackSink>,
    ) -> Self {
        let ledger = VoteLedgerStore::new(Arc::clone(&kv));
        let rate_limiter = RateLimiter::new(Arc::clone(&kv));

        Self {
            kv,
            ledger,
            rate_limiter,
            tokens,
            id_generator,
            feedback_sink,
        }
    }

    /// Get the raw store connection
    pub fn kv(&self) -> &Arc<dyn AtomicKv> {
        &self.kv
    }

    /// Get the vote ledger store
    pub fn ledger(&self) -> &VoteLedgerStore {
        &self.ledger
    }

    /// Get the rate limiter
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Get the token codec
    pub fn tokens(&self) -> &TokenService {
        self.tokens.as_ref()
    }

    /// Get the reveal-id generator
    pub fn id_generator(&self) -> &dyn IdGenerator {
        self.id_generator.as_ref()
    }

    /// Get the feedback delivery sink
    pub fn feedback_sink(&self) -> &dyn FeedbackSink {
        self.feedback_sink.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("kv", &"AtomicKv")
            .field("ledger", &"VoteLedgerStore")
            .field("rate_limiter", &self.rate_limiter)
            .finish_non_exhaustive()
    }
}
