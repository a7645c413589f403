use std::time::{Duration, Instant};

use super::FrameSeq;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Sequence number of this frame.
    pub frame: FrameSeq,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Only the producer stage ticks a clock. It stamps publishes with `frame` and
/// shares the last finished frame through a [`FrameCursor`](super::FrameCursor);
/// the render stage renders under that number instead of counting its own.
///
/// Delta time is clamped to avoid pathological values when the application is
/// paused by the debugger or stalls.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame: FrameSeq,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a new clock with default clamps.
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame: FrameSeq::ZERO,
            dt_min,
            dt_max,
        }
    }

    /// Sequence number the next `tick()` will report.
    pub fn upcoming(&self) -> FrameSeq {
        self.frame
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame: self.frame,
        };

        self.frame = self.frame.next();
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_numbers_frames_from_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame, FrameSeq(0));
        assert_eq!(clock.tick().frame, FrameSeq(1));
        assert_eq!(clock.upcoming(), FrameSeq(2));
    }

    #[test]
    fn dt_is_clamped() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(10), Duration::from_millis(20));
        let ft = clock.tick();
        assert!(ft.dt >= 0.010 && ft.dt <= 0.020);
    }
}
