//! Feedback handler

use axum::extract::State;
use reveal_service::{FeedbackService, SubmitFeedbackRequest};

use crate::extractors::{ClientIp, ValidatedJson};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Accept one feedback submission
///
/// POST /feedback
pub async fn submit_feedback(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    ValidatedJson(request): ValidatedJson<SubmitFeedbackRequest>,
) -> ApiResult<NoContent> {
    let service = FeedbackService::new(state.context());
    service.submit(&ip, request).await?;
    Ok(NoContent)
}
