//! Fixed-rate frame pacing

use std::time::{Duration, Instant};

/// Sleeps until the next frame deadline.
///
/// Deadlines advance by a fixed period so short frames absorb long ones.
/// If the loop falls more than one frame behind, the schedule is reset to
/// now instead of bursting to catch up.
#[derive(Debug, Clone)]
pub struct FrameClock {
    period: Duration,
    next: Instant,
}

impl FrameClock {
    pub fn new(frame_rate: u32) -> Self {
        let period = Duration::from_secs(1) / frame_rate.max(1);
        Self {
            period,
            next: Instant::now() + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Block until the next frame is due
    pub fn wait(&mut self) {
        let now = Instant::now();
        if let Some(remaining) = self.next.checked_duration_since(now) {
            std::thread::sleep(remaining);
        }
        self.advance(now);
    }

    /// Move the deadline forward one period, resyncing when far behind
    fn advance(&mut self, now: Instant) {
        self.next += self.period;
        if now > self.next + self.period {
            log::debug!("Frame loop fell behind, resyncing");
            self.next = now + self.period;
        }
    }
}
