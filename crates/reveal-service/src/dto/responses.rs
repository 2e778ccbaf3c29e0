//! Response DTOs

use reveal_core::{RevealId, RevealPayload};
use serde::Serialize;

/// Result of creating a reservation: the id plus both token variants
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationResponse {
    pub reveal_id: RevealId,
    pub countdown_token: String,
    pub reveal_token: String,
}

/// Vote status snapshot, plus the server clock for client reconciliation
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStatusResponse {
    pub prince: i64,
    pub princess: i64,
    pub total: i64,
    pub is_revealed: bool,
    /// Server time in epoch milliseconds
    pub server_time: i64,
}

/// Verified token contents
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyTokenResponse {
    pub payload: RevealPayload,
    /// `"countdown"` or `"reveal"`
    pub variant: &'static str,
}
