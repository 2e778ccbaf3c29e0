//! Request DTOs
//!
//! Shape validation lives here via `validator` derives; rules that need a
//! clock or the store (the one-hour lead time, dedup) live in the services.

use reveal_core::{BabyInfo, Gender, RevealId, RevealPayload, RevealStyle, VoteSide};
use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Create a scheduled reveal reservation
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[validate(length(min = 1, message = "mother name is required"))]
    pub mother_name: String,

    #[validate(length(min = 1, message = "father name is required"))]
    pub father_name: String,

    #[validate(length(min = 1, message = "baby name is required"))]
    pub baby_name: String,

    pub gender: Gender,

    #[serde(default)]
    pub due_date: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    pub animation_type: RevealStyle,

    #[validate(range(min = 3, max = 10, message = "countdown must be 3-10 seconds"))]
    #[serde(default = "default_countdown_time")]
    pub countdown_time: u8,

    #[serde(default)]
    pub is_multiple: bool,

    #[serde(default)]
    pub babies_info: Option<Vec<BabyInfo>>,

    /// Scheduled reveal instant, RFC 3339
    #[validate(length(min = 1, message = "scheduledAt is required"))]
    pub scheduled_at: String,
}

fn default_countdown_time() -> u8 {
    5
}

impl CreateReservationRequest {
    /// Attach the allocated id, producing the payload embedded in both tokens
    #[must_use]
    pub fn into_payload(self, reveal_id: RevealId) -> RevealPayload {
        RevealPayload {
            mother_name: self.mother_name,
            father_name: self.father_name,
            baby_name: self.baby_name,
            gender: self.gender,
            due_date: self.due_date,
            message: self.message,
            animation_type: self.animation_type,
            countdown_time: self.countdown_time,
            is_multiple: self.is_multiple,
            babies_info: self.babies_info,
            scheduled_at: self.scheduled_at,
            reveal_id,
        }
    }
}

/// Submit one vote for a reservation
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitVoteRequest {
    #[validate(length(min = 1, message = "revealId is required"))]
    pub reveal_id: String,

    pub vote: VoteSide,

    #[validate(custom(function = validate_device_id))]
    pub device_id: String,
}

fn validate_device_id(device_id: &str) -> Result<(), ValidationError> {
    uuid::Uuid::parse_str(device_id)
        .map(|_| ())
        .map_err(|_| ValidationError::new("device_id_not_uuid"))
}

/// Query half of the vote status read
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VoteStatusQuery {
    #[validate(length(min = 1, message = "revealId is required"))]
    pub reveal_id: String,
}

/// Verify a token of either variant
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyTokenRequest {
    #[validate(length(min = 1, message = "token is required"))]
    pub token: String,
}

/// Submit product feedback
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    #[validate(range(min = 1, max = 5, message = "rating must be 1-5"))]
    pub rating: u8,

    #[validate(length(max = 200, message = "comment is limited to 200 characters"))]
    #[serde(default)]
    pub comment: Option<String>,

    #[serde(default)]
    pub user_agent: Option<String>,

    #[serde(default)]
    pub page_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateReservationRequest {
        serde_json::from_value(serde_json::json!({
            "motherName": "Mina",
            "fatherName": "Jun",
            "babyName": "Bean",
            "gender": "girl",
            "animationType": "confetti",
            "scheduledAt": "2026-09-01T12:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_create_request_defaults_and_validates() {
        let request = create_request();
        assert!(request.validate().is_ok());
        assert_eq!(request.countdown_time, 5);
        assert!(!request.is_multiple);
    }

    #[test]
    fn test_empty_names_rejected() {
        let mut request = create_request();
        request.mother_name = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_countdown_time_range() {
        let mut request = create_request();
        request.countdown_time = 2;
        assert!(request.validate().is_err());
        request.countdown_time = 11;
        assert!(request.validate().is_err());
        request.countdown_time = 10;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_into_payload_carries_everything() {
        let request = create_request();
        let payload = request.into_payload(RevealId::from("aB3dEf9h"));
        assert_eq!(payload.mother_name, "Mina");
        assert_eq!(payload.reveal_id.as_str(), "aB3dEf9h");
        assert_eq!(payload.scheduled_at, "2026-09-01T12:00:00Z");
    }

    #[test]
    fn test_vote_request_requires_uuid_device() {
        let valid: SubmitVoteRequest = serde_json::from_value(serde_json::json!({
            "revealId": "aB3dEf9h",
            "vote": "prince",
            "deviceId": "550e8400-e29b-41d4-a716-446655440000"
        }))
        .unwrap();
        assert!(valid.validate().is_ok());

        let invalid: SubmitVoteRequest = serde_json::from_value(serde_json::json!({
            "revealId": "aB3dEf9h",
            "vote": "prince",
            "deviceId": "not-a-uuid"
        }))
        .unwrap();
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_feedback_rating_bounds() {
        let ok: SubmitFeedbackRequest =
            serde_json::from_value(serde_json::json!({ "rating": 5 })).unwrap();
        assert!(ok.validate().is_ok());

        let zero: SubmitFeedbackRequest =
            serde_json::from_value(serde_json::json!({ "rating": 0 })).unwrap();
        assert!(zero.validate().is_err());

        let long_comment: SubmitFeedbackRequest = serde_json::from_value(serde_json::json!({
            "rating": 4,
            "comment": "x".repeat(201)
        }))
        .unwrap();
        assert!(long_comment.validate().is_err());
    }
}
