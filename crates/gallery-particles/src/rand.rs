//! Lightweight xorshift32 PRNG for velocity jitter

pub struct ParticleRng {
    state: u32,
}

impl ParticleRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns a float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        // 24 random mantissa bits keep the result strictly below 1
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Returns a float in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Offset each component of `base` by a uniform draw from [-amount, amount)
    pub fn jitter3(&mut self, base: [f32; 3], amount: f32) -> [f32; 3] {
        [
            base[0] + self.range(-amount, amount),
            base[1] + self.range(-amount, amount),
            base[2] + self.range(-amount, amount),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_range_bounds() {
        let mut rng = ParticleRng::new(42);
        for _ in 0..1000 {
            let v = rng.range(0.0, 10.0);
            assert!((0.0..10.0).contains(&v));
        }
    }

    #[test]
    fn jitter_stays_within_amount() {
        let mut rng = ParticleRng::new(7);
        for _ in 0..500 {
            let v = rng.jitter3([1.0, 2.0, 3.0], 0.2);
            assert!((v[0] - 1.0).abs() <= 0.2);
            assert!((v[1] - 2.0).abs() <= 0.2);
            assert!((v[2] - 3.0).abs() <= 0.2);
        }
    }

    #[test]
    fn zero_seed_is_usable() {
        let mut rng = ParticleRng::new(0);
        let a = rng.next_f32();
        let b = rng.next_f32();
        assert_ne!(a, b);
    }
}
