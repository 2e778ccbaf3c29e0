//! Observable client state

use reveal_core::{RevealPayload, TimeRemaining, VoteSide};

use crate::api::VoteStatus;

/// UI phase of the countdown page
///
/// `Countdown → Waiting → Revealed` is the normal path; `Countdown →
/// Revealed` happens directly when a poll observes the reveal before the
/// local countdown expires. `Failed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Countdown,
    Waiting,
    Revealed,
    Failed,
}

/// Snapshot published to the UI after every transition
#[derive(Debug, Clone, PartialEq)]
pub struct ClientState {
    pub phase: Phase,
    /// Verified token payload (label, names, style), present once verified
    pub payload: Option<RevealPayload>,
    /// Rounded countdown remainder, present once verified
    pub remaining: Option<TimeRemaining>,
    /// Last successfully polled status; a failed poll leaves this untouched
    pub votes: Option<VoteStatus>,
    pub has_voted: bool,
    pub my_vote: Option<VoteSide>,
}

impl ClientState {
    #[must_use]
    pub fn initial() -> Self {
        Self {
            phase: Phase::Loading,
            payload: None,
            remaining: None,
            votes: None,
            has_voted: false,
            my_vote: None,
        }
    }
}

/// One-shot notifications for the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// The countdown reached zero (fired exactly once)
    Expired,
    /// The server reported the reveal happened
    Revealed,
    /// The held token belongs to the reveal flow, or the instant is already
    /// past: navigate there (not a failure)
    HandoffToReveal,
    /// Terminal: the link cannot become valid, show the invalid-link screen
    LinkInvalid { expired: bool },
    /// Transient vote failure, safe to retry
    VoteFailed(String),
}
