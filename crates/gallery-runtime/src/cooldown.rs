//! Countdown gate
//!
//! A cooldown is ready once its remaining time reaches zero. Triggering it
//! restarts the countdown; ticking only counts down while it is not ready.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cooldown {
    duration: f32,
    remaining: f32,
}

impl Cooldown {
    /// A cooldown that starts ready
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            remaining: 0.0,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Restart the countdown from the full duration
    pub fn trigger(&mut self) {
        self.remaining = self.duration;
    }

    pub fn tick(&mut self, dt: f32) {
        if !self.is_ready() {
            self.remaining -= dt;
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_ready() {
        assert!(Cooldown::new(1.0).is_ready());
    }

    #[test]
    fn test_trigger_then_count_down() {
        let mut cd = Cooldown::new(1.0);
        cd.trigger();
        assert!(!cd.is_ready());
        cd.tick(0.6);
        assert!(!cd.is_ready());
        cd.tick(0.4);
        assert!(cd.is_ready());
    }

    #[test]
    fn test_tick_while_ready_is_noop() {
        let mut cd = Cooldown::new(0.5);
        cd.tick(10.0);
        assert_eq!(cd.remaining(), 0.0);
        cd.trigger();
        assert!((cd.remaining() - 0.5).abs() < 1e-6);
    }
}
