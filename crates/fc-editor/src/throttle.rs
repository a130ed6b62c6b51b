//! Pointer-move raycast coalescing.
//!
//! Raycasts triggered by pointer movement run at most once per interval.
//! Callers pass the current time, so tests drive it explicitly.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaycastThrottle {
    interval: Duration,
    last: Option<Instant>,
}

impl RaycastThrottle {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last: None }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Whether a raycast may run at `now`; records it if so.
    pub fn ready(&mut self, now: Instant) -> bool {
        let due = self
            .last
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval);
        if due {
            self.last = Some(now);
        }
        due
    }

    /// Forget the last raycast so the next call runs immediately.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
