//! Reservation handlers
//!
//! Endpoint for creating a scheduled reveal and receiving both tokens.

use axum::{extract::State, Json};
use reveal_service::{CreateReservationRequest, CreateReservationResponse, ReservationService};

use crate::extractors::{ClientIp, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Create a reservation and issue the countdown and reveal tokens
///
/// POST /reservations
pub async fn create_reservation(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> ApiResult<Created<Json<CreateReservationResponse>>> {
    let service = ReservationService::new(state.context());
    let response = service.create(&ip, request).await?;
    Ok(Created(Json(response)))
}
