//! Vote handlers
//!
//! Status reads are the hot path: every open countdown page polls this every
//! few seconds.

use axum::{
    extract::{Query, State},
    Json,
};
use reveal_cache::VoteCounts;
use reveal_service::{SubmitVoteRequest, VoteService, VoteStatusQuery, VoteStatusResponse};
use validator::Validate;

use crate::extractors::{ClientIp, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Read the current vote counts and revealed flag
///
/// GET /votes?revealId=
pub async fn vote_status(
    State(state): State<AppState>,
    Query(query): Query<VoteStatusQuery>,
) -> ApiResult<Json<VoteStatusResponse>> {
    query.validate()?;

    let service = VoteService::new(state.context());
    let response = service.status(&query.reveal_id).await?;
    Ok(Json(response))
}

/// Submit one vote for a device
///
/// POST /votes
pub async fn submit_vote(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    ValidatedJson(request): ValidatedJson<SubmitVoteRequest>,
) -> ApiResult<Json<VoteCounts>> {
    let service = VoteService::new(state.context());
    let counts = service.submit(&ip, request).await?;
    Ok(Json(counts))
}
