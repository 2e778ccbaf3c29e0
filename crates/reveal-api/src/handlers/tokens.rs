//! Token verification handler

use axum::{extract::State, Json};
use reveal_service::{VerifyTokenRequest, VerifyTokenResponse};

use crate::extractors::ValidatedJson;
use crate::response::ApiResult;
use crate::state::AppState;

/// Verify a token of either variant and return its payload
///
/// POST /tokens/verify
pub async fn verify_token(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<VerifyTokenRequest>,
) -> ApiResult<Json<VerifyTokenResponse>> {
    let claims = state.context().tokens().verify(&request.token)?;
    Ok(Json(VerifyTokenResponse {
        variant: claims.variant_name(),
        payload: claims.payload().clone(),
    }))
}
