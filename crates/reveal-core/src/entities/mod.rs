//! Payload entities embedded in reveal tokens

mod payload;

pub use payload::{BabyInfo, Gender, RevealPayload, RevealStyle};
