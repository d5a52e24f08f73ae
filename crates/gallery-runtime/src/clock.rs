//! Game clock producing per-frame delta and total time

use std::time::Instant;

/// Frame timing handed to every update hook
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous frame
    pub delta: f32,
    /// Seconds since the clock started
    pub total: f32,
}

impl FrameTime {
    pub fn new(delta: f32, total: f32) -> Self {
        Self { delta, total }
    }
}

/// Tracks wall-clock game time
pub struct GameClock {
    /// Total elapsed game time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f64,
    /// Upper bound on a single frame's delta
    pub max_frame_time: f64,
    /// Last tick instant
    last_instant: Instant,
    /// Whether this is the first tick
    first_tick: bool,
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            max_frame_time: 0.25,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock from the wall clock. Call once per frame.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.delta_time = 0.0;
            return self.frame_time();
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(elapsed)
    }

    /// Advance by an explicit amount, clamped to `max_frame_time`
    pub fn advance(&mut self, seconds: f64) -> FrameTime {
        self.delta_time = seconds.clamp(0.0, self.max_frame_time);
        self.total_time += self.delta_time;
        self.frame_time()
    }

    pub fn frame_time(&self) -> FrameTime {
        FrameTime::new(self.delta_time as f32, self.total_time as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_defaults() {
        let clock = GameClock::new();
        assert_eq!(clock.total_time, 0.0);
        assert_eq!(clock.delta_time, 0.0);
        assert!((clock.max_frame_time - 0.25).abs() < 1e-10);
    }

    #[test]
    fn test_first_tick_zero_delta() {
        let mut clock = GameClock::new();
        let t = clock.tick();
        assert_eq!(t.delta, 0.0);
        assert_eq!(t.total, 0.0);
    }

    #[test]
    fn test_advance_accumulates_total() {
        let mut clock = GameClock::new();
        clock.advance(0.1);
        let t = clock.advance(0.2);
        assert!((t.delta - 0.2).abs() < 1e-6);
        assert!((t.total - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut clock = GameClock::new();
        let t = clock.advance(3.0);
        assert!((t.delta - 0.25).abs() < 1e-6);
        assert!((clock.total_time - 0.25).abs() < 1e-10);
    }
}
