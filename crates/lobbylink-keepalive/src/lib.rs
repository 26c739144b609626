//! Inactivity watchdog for lobbylink keepalive probes.
//!
//! A [`Watchdog`] fires once its deadline passes and then re-schedules
//! itself one interval later. Any inbound traffic calls
//! [`Watchdog::rearm`], pushing the deadline out again, so in practice the
//! watchdog only fires after a full interval of silence from the server.
//!
//! # Integration
//!
//! The watchdog is designed to sit inside a keepalive task's
//! `tokio::select!` loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         _ = activity.notified() => watchdog.rearm(),
//!         info = watchdog.wait_for_fire() => {
//!             queue.enqueue(QueuedMessage::system(outbound::ping(&ping_token())));
//!         }
//!     }
//! }
//! ```

use std::time::Duration;

use rand::Rng;
use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the keepalive watchdog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepaliveConfig {
    /// Delay before the first probe after the connection comes up.
    pub initial_delay: Duration,
    /// Silence that triggers each subsequent probe.
    pub interval: Duration,
}

impl Default for KeepaliveConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(30),
            interval: Duration::from_secs(30),
        }
    }
}

impl KeepaliveConfig {
    /// Shortest delay the watchdog will accept.
    pub const MIN_DELAY: Duration = Duration::from_secs(1);

    /// Creates a config with the same initial delay and interval.
    pub fn every(interval: Duration) -> Self {
        Self {
            initial_delay: interval,
            interval,
        }
    }

    /// Raises any delay below [`Self::MIN_DELAY`] to it.
    ///
    /// Called automatically by [`Watchdog::new`]. A zero interval would
    /// turn the keepalive task into a busy loop.
    pub fn validated(mut self) -> Self {
        if self.initial_delay < Self::MIN_DELAY {
            warn!(initial_delay = ?self.initial_delay, "keepalive initial delay too short, clamping");
            self.initial_delay = Self::MIN_DELAY;
        }
        if self.interval < Self::MIN_DELAY {
            warn!(interval = ?self.interval, "keepalive interval too short, clamping");
            self.interval = Self::MIN_DELAY;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Fire info (returned to caller each time the watchdog fires)
// ---------------------------------------------------------------------------

/// Information about one firing, returned by [`Watchdog::wait_for_fire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireInfo {
    /// Monotonically increasing fire number (starts at 1).
    pub fire: u64,
    /// How long the watchdog had gone without being rearmed.
    pub silent_for: Duration,
}

// ---------------------------------------------------------------------------
// Watchdog
// ---------------------------------------------------------------------------

/// Rearmable inactivity timer. One per live connection.
pub struct Watchdog {
    config: KeepaliveConfig,
    deadline: Instant,
    /// Last time the watchdog was armed (creation, rearm or fire).
    armed_at: Instant,
    fire_count: u64,
}

impl Watchdog {
    /// Creates a watchdog whose first deadline is `initial_delay` from now.
    pub fn new(config: KeepaliveConfig) -> Self {
        let config = config.validated();
        let now = Instant::now();
        debug!(
            initial_ms = config.initial_delay.as_millis() as u64,
            interval_ms = config.interval.as_millis() as u64,
            "keepalive watchdog armed"
        );
        Self {
            config,
            deadline: now + config.initial_delay,
            armed_at: now,
            fire_count: 0,
        }
    }

    /// Waits until the deadline passes, then schedules the next one.
    ///
    /// Cancel-safe: dropping the future before it resolves leaves the
    /// watchdog untouched, so it can be raced against
    /// other branches of `tokio::select!`.
    pub async fn wait_for_fire(&mut self) -> FireInfo {
        time::sleep_until(self.deadline).await;

        let now = Instant::now();
        let silent_for = now.saturating_duration_since(self.armed_at);
        self.fire_count += 1;
        self.armed_at = now;
        self.deadline = now + self.config.interval;

        trace!(fire = self.fire_count, ?silent_for, "keepalive watchdog fired");

        FireInfo {
            fire: self.fire_count,
            silent_for,
        }
    }

    /// Pushes the deadline to one full interval from now.
    pub fn rearm(&mut self) {
        let now = Instant::now();
        self.armed_at = now;
        self.deadline = now + self.config.interval;
    }

    /// When the watchdog will next fire.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// How many times the watchdog has fired.
    pub fn fire_count(&self) -> u64 {
        self.fire_count
    }

    /// The (validated) configuration in use.
    pub fn config(&self) -> &KeepaliveConfig {
        &self.config
    }
}

/// Generates a keepalive token: `LAG` followed by six random digits.
///
/// Servers echo the token back in their PONG, which makes the probes easy
/// to pick out of a log.
pub fn ping_token() -> String {
    let digits = rand::rng().random_range(100_000..=999_999);
    format!("LAG{digits}")
}
