//! Device-scoped persistence
//!
//! The server dedups votes by device id; the client keeps the same id and the
//! recorded choice in device-local storage so a returning guest sees "you
//! already voted for X" instead of a vote button. Browser hosts back this
//! with local storage; the in-memory implementation serves native hosts and
//! tests.

use parking_lot::Mutex;
use reveal_core::VoteSide;
use std::collections::HashMap;

/// Device-local persistence for the device id and recorded votes
pub trait DeviceStore: Send + Sync {
    /// Stable identifier for this device
    fn device_id(&self) -> String;

    /// The side recorded locally for a reservation, if any
    fn recorded_vote(&self, reveal_id: &str) -> Option<VoteSide>;

    /// Persist the side the server accepted (or reported) for a reservation
    fn record_vote(&self, reveal_id: &str, side: VoteSide);
}

/// In-memory device store with a random UUID device id
#[derive(Debug)]
pub struct MemoryDeviceStore {
    device_id: String,
    votes: Mutex<HashMap<String, VoteSide>>,
}

impl Default for MemoryDeviceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDeviceStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            device_id: uuid::Uuid::new_v4().to_string(),
            votes: Mutex::new(HashMap::new()),
        }
    }

    /// Use a fixed device id (tests, or an id restored from host storage)
    #[must_use]
    pub fn with_device_id(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            votes: Mutex::new(HashMap::new()),
        }
    }
}

impl DeviceStore for MemoryDeviceStore {
    fn device_id(&self) -> String {
        self.device_id.clone()
    }

    fn recorded_vote(&self, reveal_id: &str) -> Option<VoteSide> {
        self.votes.lock().get(reveal_id).copied()
    }

    fn record_vote(&self, reveal_id: &str, side: VoteSide) {
        self.votes.lock().insert(reveal_id.to_string(), side);
    }
}
