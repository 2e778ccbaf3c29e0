//! Server-reconciled clock
//!
//! The countdown prefers the server's notion of "now" over the local wall
//! clock: each status poll carries a server timestamp, and the clock keeps a
//! millisecond offset from it. Between polls, elapsed time comes from a
//! monotonic instant, so a local wall-clock jump cannot move the countdown.

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use tokio::time::Instant;

/// Clock that snaps to server time when a poll reports it
#[derive(Debug)]
pub struct ServerClock {
    base_wall: DateTime<Utc>,
    base_mono: Instant,
    offset_ms: Mutex<i64>,
}

impl Default for ServerClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_wall: Utc::now(),
            base_mono: Instant::now(),
            offset_ms: Mutex::new(0),
        }
    }

    fn local_now_ms(&self) -> i64 {
        self.base_wall.timestamp_millis() + self.base_mono.elapsed().as_millis() as i64
    }

    /// Record a server timestamp (epoch milliseconds) observed just now
    pub fn observe_server_time(&self, server_ms: i64) {
        *self.offset_ms.lock() = server_ms - self.local_now_ms();
    }

    /// Current instant, server-reconciled when an observation exists
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        let ms = self.local_now_ms() + *self.offset_ms.lock();
        Utc.timestamp_millis_opt(ms).single().unwrap_or_else(Utc::now)
    }
}
