//! Reveal payload - owner-supplied descriptive fields for one reservation
//!
//! The payload is opaque to the counting core: it is validated at the API
//! boundary, embedded verbatim into both token variants, and handed back to
//! clients on verification. Wire format is camelCase JSON.

use serde::{Deserialize, Serialize};

use crate::value_objects::RevealId;

/// Announced gender of a baby
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Boy,
    Girl,
}

/// Reveal animation style chosen by the owner
///
/// Rendering is a collaborator concern; the core only carries the choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealStyle {
    Confetti,
    Balloons,
    Fireworks,
    Falling,
    Reveal,
}

/// Per-baby entry for multi-subject reveals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BabyInfo {
    pub name: String,
    pub gender: Gender,
}

/// Owner-supplied data for one scheduled reveal, plus the allocated id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealPayload {
    pub mother_name: String,
    pub father_name: String,
    pub baby_name: String,
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub animation_type: RevealStyle,
    #[serde(default = "default_countdown_time")]
    pub countdown_time: u8,
    #[serde(default)]
    pub is_multiple: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub babies_info: Option<Vec<BabyInfo>>,
    /// Scheduled reveal instant, RFC 3339
    pub scheduled_at: String,
    pub reveal_id: RevealId,
}

fn default_countdown_time() -> u8 {
    5
}
