//! Request body fixtures

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};

/// A valid reservation body scheduled two hours out
pub fn reservation_body() -> Value {
    reservation_body_at(Utc::now() + Duration::hours(2))
}

/// A valid reservation body with an explicit scheduled instant
pub fn reservation_body_at(scheduled_at: DateTime<Utc>) -> Value {
    json!({
        "motherName": "Mina",
        "fatherName": "Jun",
        "babyName": "Bean",
        "gender": "girl",
        "animationType": "confetti",
        "message": "Guess before the big day!",
        "scheduledAt": scheduled_at.to_rfc3339(),
    })
}

/// A vote body for a fresh random device
pub fn vote_body(reveal_id: &str, side: &str) -> Value {
    vote_body_for_device(reveal_id, side, &uuid::Uuid::new_v4().to_string())
}

/// A vote body for a specific device
pub fn vote_body_for_device(reveal_id: &str, side: &str, device_id: &str) -> Value {
    json!({
        "revealId": reveal_id,
        "vote": side,
        "deviceId": device_id,
    })
}
