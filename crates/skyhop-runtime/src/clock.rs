//! Game clock fed with host-measured frame times

/// Default cap on a single frame's delta, in seconds
pub const DEFAULT_MAX_FRAME_TIME: f32 = 0.25;

/// Tracks game time across frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameClock {
    /// Total simulated time in seconds
    pub total_time: f64,
    /// Delta used by the last frame
    pub delta_time: f32,
    /// Frames ticked so far
    pub frame: u64,
    /// Longest delta a single frame may simulate
    pub max_frame_time: f32,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_TIME)
    }
}

impl GameClock {
    pub fn new(max_frame_time: f32) -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            frame: 0,
            max_frame_time,
        }
    }

    /// Advance by one frame and return the delta to simulate.
    ///
    /// Negative and NaN deltas count as zero; long frames are clamped to
    /// `max_frame_time` to avoid a spiral of death after a stall.
    pub fn tick(&mut self, dt: f32) -> f32 {
        let dt = if dt.is_nan() || dt < 0.0 {
            0.0
        } else {
            dt.min(self.max_frame_time)
        };
        self.delta_time = dt;
        self.total_time += f64::from(dt);
        self.frame += 1;
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_defaults() {
        let clock = GameClock::default();
        assert_eq!(clock.total_time, 0.0);
        assert_eq!(clock.frame, 0);
        assert!((clock.max_frame_time - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_tick_accumulates() {
        let mut clock = GameClock::default();
        assert_eq!(clock.tick(0.05), 0.05);
        clock.tick(0.05);
        assert_eq!(clock.frame, 2);
        assert!((clock.total_time - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut clock = GameClock::new(0.1);
        assert_eq!(clock.tick(3.0), 0.1);
        assert_eq!(clock.delta_time, 0.1);
    }

    #[test]
    fn test_invalid_deltas_are_zero() {
        let mut clock = GameClock::default();
        assert_eq!(clock.tick(-1.0), 0.0);
        assert_eq!(clock.tick(f32::NAN), 0.0);
        assert_eq!(clock.total_time, 0.0);
        assert_eq!(clock.frame, 2);
    }
}
