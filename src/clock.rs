//! clock.rs - time capability behind a trait
//!
//! the store stamps receipt times and the freshness policy measures a 10 s
//! staleness window; both take the clock as a dependency so tests can step
//! time by hand instead of sleeping through the window.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

pub trait Clock: Send + Sync {
    /// current time in milliseconds
    fn now_ms(&self) -> u64;
}

/// wall clock, unix epoch milliseconds
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

pub fn system_clock() -> Arc<dyn Clock> {
    Arc::new(SystemClock)
}
