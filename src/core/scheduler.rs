//! Redundant tick drivers.
//!
//! Two drivers feed the same tick: the frame driver (one tick per rendered
//! frame) and a fixed-period watchdog.  The frame driver stops delivering
//! while the host is hidden; the watchdog never does, so a stalled frame loop
//! cannot freeze the scroll.  Both converge on the same offset because both
//! read the same origin, so whichever writes last wins harmlessly.
//!
//! Arming is a single flag: the pair is armed or disarmed together.

use std::time::Duration;

/// Which driver produced a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    Frame,
    Watchdog,
}

/// Arm/disarm bookkeeping for the two drivers.
#[derive(Debug, Clone, Default)]
pub struct SchedulerPair {
    armed: bool,
    /// Frame delivery paused (host hidden).  Does not affect the watchdog.
    frame_suspended: bool,
    /// Number of times the pair has been armed.
    arm_epoch: u64,
}

impl SchedulerPair {
    pub fn arm(&mut self) {
        self.armed = true;
        self.arm_epoch = self.arm_epoch.wrapping_add(1);
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Whether `driver` may deliver a tick right now.
    pub fn should_fire(&self, driver: Driver) -> bool {
        match driver {
            Driver::Frame => self.armed && !self.frame_suspended,
            Driver::Watchdog => self.armed,
        }
    }

    pub fn set_frame_suspended(&mut self, suspended: bool) {
        self.frame_suspended = suspended;
    }

    pub fn arm_epoch(&self) -> u64 {
        self.arm_epoch
    }
}

/// Driver periods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cadence {
    pub frame: Duration,
    pub watchdog: Duration,
    pub highlight: Duration,
}

impl Cadence {
    pub fn new(frame_rate_hz: u32, watchdog_ms: u64, highlight_ms: u64) -> Self {
        Self {
            frame: Duration::from_secs_f64(1.0 / f64::from(frame_rate_hz.max(1))),
            watchdog: Duration::from_millis(watchdog_ms.max(1)),
            highlight: Duration::from_millis(highlight_ms.max(1)),
        }
    }
}

impl Default for Cadence {
    fn default() -> Self {
        Self::new(60, 16, 100)
    }
}
