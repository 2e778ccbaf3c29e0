//! Countdown controller
//!
//! Owns the page lifecycle: verify the held token, then drive the countdown
//! and the status polling from one cooperative task. The UI observes state
//! through a watch channel, receives one-shot events through an mpsc channel,
//! and sends commands (vote, visibility, shutdown) back in.
//!
//! Ordering rule: a `revealed = true` observation from the server always wins
//! over the locally computed countdown, never the reverse.

use std::sync::Arc;

use reveal_core::{remaining, VoteSide};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, warn};

use crate::api::{ApiClientError, StatusApi, VerifiedToken, VoteOutcome};
use crate::clock::ServerClock;
use crate::device::DeviceStore;
use crate::state::{ClientEvent, ClientState, Phase};

/// Status polling cadence
pub const POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Countdown recomputation cadence
pub const COUNTDOWN_TICK: Duration = Duration::from_secs(60);

enum Command {
    Vote(VoteSide),
    SetVisible(bool),
    Shutdown,
}

/// Handle to a running countdown state machine
pub struct CountdownController {
    state_rx: watch::Receiver<ClientState>,
    events_rx: mpsc::UnboundedReceiver<ClientEvent>,
    cmd_tx: mpsc::UnboundedSender<Command>,
    handle: JoinHandle<()>,
}

impl CountdownController {
    /// Verify `token` and start driving the page
    pub fn start(
        api: Arc<dyn StatusApi>,
        device: Arc<dyn DeviceStore>,
        token: impl Into<String>,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(ClientState::initial());
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let driver = Driver {
            api,
            device,
            clock: ServerClock::new(),
            state: state_tx,
            events: events_tx,
            token: token.into(),
            reveal_id: String::new(),
            scheduled_at: String::new(),
            visible: true,
            expired_fired: false,
        };
        let handle = tokio::spawn(driver.run(cmd_rx));

        Self {
            state_rx,
            events_rx,
            cmd_tx,
            handle,
        }
    }

    /// Watch the published state
    #[must_use]
    pub fn state(&self) -> watch::Receiver<ClientState> {
        self.state_rx.clone()
    }

    /// Receive the next one-shot event
    pub async fn next_event(&mut self) -> Option<ClientEvent> {
        self.events_rx.recv().await
    }

    /// Cast a vote for this device.
    ///
    /// Ignored without a network call when the device already voted or a
    /// previous vote command is still being processed.
    pub fn cast_vote(&self, side: VoteSide) {
        let _ = self.cmd_tx.send(Command::Vote(side));
    }

    /// Report host visibility. Polling suspends while hidden and fires
    /// immediately on regaining visibility.
    pub fn set_visible(&self, visible: bool) {
        let _ = self.cmd_tx.send(Command::SetVisible(visible));
    }

    /// Stop the machine. No timer fires after this returns to the driver.
    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(Command::Shutdown);
    }
}

impl Drop for CountdownController {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

struct Driver {
    api: Arc<dyn StatusApi>,
    device: Arc<dyn DeviceStore>,
    clock: ServerClock,
    state: watch::Sender<ClientState>,
    events: mpsc::UnboundedSender<ClientEvent>,
    token: String,
    reveal_id: String,
    scheduled_at: String,
    visible: bool,
    expired_fired: bool,
}

impl Driver {
    async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<Command>) {
        match self.api.verify_token(&self.token).await {
            Ok(VerifiedToken::Countdown(payload)) => {
                if remaining(&payload.scheduled_at, self.clock.now()).is_expired {
                    // The moment already passed: straight to the reveal flow
                    self.emit(ClientEvent::HandoffToReveal);
                    return;
                }

                self.reveal_id = payload.reveal_id.as_str().to_string();
                self.scheduled_at = payload.scheduled_at.clone();

                let recorded = self.device.recorded_vote(&self.reveal_id);
                self.state.send_modify(|s| {
                    s.phase = Phase::Countdown;
                    s.payload = Some(payload);
                    s.my_vote = recorded;
                    s.has_voted = recorded.is_some();
                });
                self.tick_countdown();
            }
            Ok(VerifiedToken::Reveal(_)) => {
                // Owner link: hand off, this is not a failure
                self.emit(ClientEvent::HandoffToReveal);
                return;
            }
            Err(ApiClientError::TokenExpired) => {
                self.fail(true);
                return;
            }
            Err(e) => {
                warn!(error = %e, "token verification failed");
                self.fail(false);
                return;
            }
        }

        // A tick that elapses while a poll is still in flight is skipped,
        // not queued: that is the in-flight suppression.
        let mut poll_timer = interval(POLL_INTERVAL);
        poll_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut countdown_timer = interval(COUNTDOWN_TICK);
        countdown_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = poll_timer.tick() => {
                    if self.visible && self.poll().await {
                        break;
                    }
                }
                _ = countdown_timer.tick() => {
                    self.tick_countdown();
                }
                cmd = cmd_rx.recv() => match cmd {
                    Some(Command::Vote(side)) => self.handle_vote(side).await,
                    Some(Command::SetVisible(visible)) => {
                        let was_visible = self.visible;
                        self.visible = visible;
                        if visible && !was_visible && self.poll().await {
                            break;
                        }
                    }
                    Some(Command::Shutdown) | None => break,
                },
            }
        }
    }

    /// One status poll. Returns `true` when the reveal was observed and the
    /// machine should stop. A failed poll keeps the prior state (fail-soft).
    async fn poll(&mut self) -> bool {
        match self.api.fetch_status(&self.reveal_id).await {
            Ok(status) => {
                self.clock.observe_server_time(status.server_time);
                self.state.send_modify(|s| s.votes = Some(status));

                if status.is_revealed {
                    self.state.send_modify(|s| s.phase = Phase::Revealed);
                    self.emit(ClientEvent::Revealed);
                    return true;
                }

                // A fresh server timestamp can move the countdown; recompute
                // right away instead of waiting for the next minute tick
                self.tick_countdown();
                false
            }
            Err(e) => {
                debug!(error = %e, "status poll failed, keeping prior state");
                false
            }
        }
    }

    /// Recompute the countdown remainder from scratch.
    ///
    /// The expiry callback is latched: repeated recomputation within the
    /// same tick cannot fire it twice.
    fn tick_countdown(&mut self) {
        if self.state.borrow().phase != Phase::Countdown {
            return;
        }

        let rem = remaining(&self.scheduled_at, self.clock.now());
        if rem.is_expired {
            self.state.send_modify(|s| {
                s.remaining = Some(rem);
                s.phase = Phase::Waiting;
            });
            if !self.expired_fired {
                self.expired_fired = true;
                self.emit(ClientEvent::Expired);
            }
        } else {
            self.state.send_modify(|s| s.remaining = Some(rem));
        }
    }

    async fn handle_vote(&mut self, side: VoteSide) {
        {
            let current = self.state.borrow();
            if current.has_voted {
                debug!("vote ignored, device already voted");
                return;
            }
            if current.phase != Phase::Countdown {
                debug!(phase = ?current.phase, "vote ignored outside countdown");
                return;
            }
        }

        let device_id = self.device.device_id();
        match self.api.submit_vote(&self.reveal_id, side, &device_id).await {
            Ok(VoteOutcome::Accepted { prince, princess }) => {
                // Only mark the device after the server confirmed
                self.device.record_vote(&self.reveal_id, side);
                self.state.send_modify(|s| {
                    s.has_voted = true;
                    s.my_vote = Some(side);
                    if let Some(votes) = &mut s.votes {
                        votes.prince = prince;
                        votes.princess = princess;
                        votes.total = prince + princess;
                    }
                });
            }
            Ok(VoteOutcome::AlreadyVoted { previous }) => {
                // Reconcile to what the server recorded, which may differ
                // from what was just tapped
                self.device.record_vote(&self.reveal_id, previous);
                self.state.send_modify(|s| {
                    s.has_voted = true;
                    s.my_vote = Some(previous);
                });
            }
            Err(e) => {
                warn!(error = %e, "vote submission failed");
                self.emit(ClientEvent::VoteFailed(e.to_string()));
            }
        }
    }

    fn fail(&mut self, expired: bool) {
        self.state.send_modify(|s| s.phase = Phase::Failed);
        self.emit(ClientEvent::LinkInvalid { expired });
    }

    fn emit(&self, event: ClientEvent) {
        let _ = self.events.send(event);
    }
}
