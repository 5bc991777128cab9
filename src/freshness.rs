//! freshness.rs - is the meter live or offline?
//!
//! decided purely from poll-side observations against the local clock. the
//! device-supplied timestamp never participates: it counts milliseconds
//! since meter boot and is not comparable to hub time.
//!
//! two states only, Offline and Live. a poll that returns telemetry
//! refreshes the liveness mark; an empty poll or a failed poll drops
//! straight to Offline; and with no news at all, liveness expires once the
//! staleness window elapses. the expiry check runs on every status
//! recomputation, not just after polls.

use crate::clock::Clock;
use std::sync::Arc;

/// a meter with no fresh data for this long is shown as offline.
/// generously larger than the push period, small enough to reflect a
/// disconnect quickly.
pub const STALENESS_WINDOW_MS: u64 = 10_000;

/// dashboard poll period
pub const POLL_INTERVAL_MS: u64 = 2_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Offline,
    Live,
}

/// snapshot handed to the display layer
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionStatus {
    pub connected: bool,
    pub using_live_source: bool,
    /// local receipt time of the last non-empty poll
    pub last_observed_at: Option<u64>,
}

/// poll-side connection state machine
pub struct ConnectionMonitor {
    clock: Arc<dyn Clock>,
    state: ConnectionState,
    last_observed_at: Option<u64>,
}

impl ConnectionMonitor {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: ConnectionState::Offline,
            last_observed_at: None,
        }
    }

    /// a poll returned telemetry: mark live as of local now
    pub fn record_reading(&mut self) {
        self.state = ConnectionState::Live;
        self.last_observed_at = Some(self.clock.now_ms());
    }

    /// a poll returned the empty shape (no telemetry stored)
    pub fn record_empty(&mut self) {
        self.state = ConnectionState::Offline;
    }

    /// a poll failed (transport or non-2xx); indistinguishable from no data
    pub fn record_error(&mut self) {
        self.state = ConnectionState::Offline;
    }

    /// recompute the displayed status, expiring liveness if the staleness
    /// window has elapsed since the last observation
    pub fn status(&mut self) -> ConnectionStatus {
        if self.state == ConnectionState::Live {
            let now = self.clock.now_ms();
            let elapsed = self
                .last_observed_at
                .map(|t| now.saturating_sub(t))
                .unwrap_or(u64::MAX);
            if elapsed >= STALENESS_WINDOW_MS {
                self.state = ConnectionState::Offline;
            }
        }

        let live = self.state == ConnectionState::Live;
        ConnectionStatus {
            connected: live,
            using_live_source: live,
            last_observed_at: self.last_observed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::testing::ManualClock;

    fn monitor_at(start_ms: u64) -> (Arc<ManualClock>, ConnectionMonitor) {
        let clock = Arc::new(ManualClock::new(start_ms));
        let monitor = ConnectionMonitor::new(clock.clone());
        (clock, monitor)
    }

    #[test]
    fn starts_offline() {
        let (_, mut m) = monitor_at(0);
        assert!(!m.status().connected);
        assert_eq!(m.status().last_observed_at, None);
    }

    #[test]
    fn reading_brings_it_live() {
        let (_, mut m) = monitor_at(1_000);
        m.record_reading();
        let s = m.status();
        assert!(s.connected);
        assert!(s.using_live_source);
        assert_eq!(s.last_observed_at, Some(1_000));
    }

    #[test]
    fn stays_live_just_inside_the_window() {
        let (clock, mut m) = monitor_at(1_000);
        m.record_reading();
        clock.advance(STALENESS_WINDOW_MS - 1);
        assert!(m.status().connected);
    }

    #[test]
    fn expires_at_exactly_the_window() {
        let (clock, mut m) = monitor_at(1_000);
        m.record_reading();
        clock.advance(STALENESS_WINDOW_MS);
        assert!(!m.status().connected);
        // and stays offline on later checks
        clock.advance(60_000);
        assert!(!m.status().connected);
    }

    #[test]
    fn fresh_reading_revives_after_expiry() {
        let (clock, mut m) = monitor_at(0);
        m.record_reading();
        clock.advance(STALENESS_WINDOW_MS + 5_000);
        assert!(!m.status().connected);
        m.record_reading();
        let s = m.status();
        assert!(s.connected);
        assert_eq!(s.last_observed_at, Some(STALENESS_WINDOW_MS + 5_000));
    }

    #[test]
    fn empty_poll_drops_offline_immediately() {
        let (_, mut m) = monitor_at(0);
        m.record_reading();
        m.record_empty();
        assert!(!m.status().connected);
    }

    #[test]
    fn failed_poll_drops_offline_immediately() {
        let (_, mut m) = monitor_at(0);
        m.record_reading();
        m.record_error();
        assert!(!m.status().connected);
    }

    #[test]
    fn refresh_extends_the_window() {
        let (clock, mut m) = monitor_at(0);
        m.record_reading();
        clock.advance(8_000);
        m.record_reading();
        clock.advance(8_000);
        // 16 s after the first observation, 8 s after the refresh
        assert!(m.status().connected);
    }
}
