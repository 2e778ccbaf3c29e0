//! Feedback service
//!
//! Accepts rate-limited product feedback and hands it to a delivery sink.
//! Outbound delivery (spreadsheet append, email) is a collaborator concern
//! behind the `FeedbackSink` trait; the default sink records to the log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reveal_cache::RateLimitClass;
use reveal_common::{AppError, AppResult};
use tracing::{info, instrument};

use crate::dto::SubmitFeedbackRequest;

use super::context::ServiceContext;

/// Accepted feedback handed to the sink
#[derive(Debug, Clone)]
pub struct FeedbackRecord {
    pub rating: u8,
    pub comment: Option<String>,
    pub user_agent: Option<String>,
    pub page_url: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Delivery target for accepted feedback
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    async fn deliver(&self, record: &FeedbackRecord) -> AppResult<()>;
}

/// Sink that records feedback to the application log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFeedbackSink;

#[async_trait]
impl FeedbackSink for LogFeedbackSink {
    async fn deliver(&self, record: &FeedbackRecord) -> AppResult<()> {
        info!(
            rating = record.rating,
            comment = record.comment.as_deref().unwrap_or(""),
            page_url = record.page_url.as_deref().unwrap_or(""),
            "Feedback received"
        );
        Ok(())
    }
}

/// Feedback service
pub struct FeedbackService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FeedbackService<'a> {
    /// Create a new FeedbackService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Accept one feedback submission
    #[instrument(skip(self, request))]
    pub async fn submit(&self, ip: &str, request: SubmitFeedbackRequest) -> AppResult<()> {
        if !self
            .ctx
            .rate_limiter()
            .allow(RateLimitClass::SubmitFeedback, ip)
            .await
        {
            return Err(AppError::RateLimitExceeded);
        }

        let record = FeedbackRecord {
            rating: request.rating,
            comment: request.comment.filter(|c| !c.is_empty()),
            user_agent: request.user_agent,
            page_url: request.page_url,
            submitted_at: Utc::now(),
        };

        self.ctx.feedback_sink().deliver(&record).await
    }
}
