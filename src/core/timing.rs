//! Wall-clock timing model.
//!
//! The scroll position is a pure function of elapsed time since the last
//! anchor, never an accumulation of per-frame deltas.  A driver that is late,
//! skipped, or suspended for seconds still lands on the exact offset the
//! moment it fires again.

use std::time::Instant;

/// Anchor for one scroll epoch.  Replaced wholesale, never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollOrigin {
    pub start_time_ms: f64,
    pub start_position_px: f64,
}

impl ScrollOrigin {
    pub fn capture(now_ms: f64, position_px: f64) -> Self {
        Self {
            start_time_ms: now_ms,
            start_position_px: position_px,
        }
    }
}

/// Target offset at `now_ms`.  Unclamped; the caller bounds it to the
/// scrollable range.
pub fn compute_target_offset(origin: ScrollOrigin, speed_px_per_sec: f64, now_ms: f64) -> f64 {
    origin.start_position_px + speed_px_per_sec * (now_ms - origin.start_time_ms) / 1000.0
}

/// Monotonic millisecond clock for the host loop.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    epoch: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_linear_in_elapsed_time() {
        let origin = ScrollOrigin::capture(1_000.0, 40.0);
        assert_eq!(compute_target_offset(origin, 50.0, 1_000.0), 40.0);
        assert_eq!(compute_target_offset(origin, 50.0, 3_000.0), 140.0);
    }

    #[test]
    fn offset_is_monotonic_within_an_epoch() {
        let origin = ScrollOrigin::capture(250.0, 12.0);
        let mut prev = f64::MIN;
        // Irregular gaps, including a long "background" stall.
        for now in [250.0, 266.0, 283.5, 300.0, 4_300.0, 4_316.0, 4_317.0] {
            let offset = compute_target_offset(origin, 25.0, now);
            assert!(offset >= prev, "offset went backwards at {now}");
            prev = offset;
        }
    }

    #[test]
    fn stalled_driver_catches_up_exactly() {
        let origin = ScrollOrigin::capture(0.0, 0.0);
        // One tick after a five second gap equals the uninterrupted result.
        assert_eq!(compute_target_offset(origin, 75.0, 5_000.0), 375.0);
    }

    #[test]
    fn clock_does_not_go_backwards() {
        let clock = Clock::start();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
