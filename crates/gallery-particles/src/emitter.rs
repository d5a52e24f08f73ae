//! Emitter configuration and ring-buffer simulation

use gallery_core::{Color, GalleryError, Result};
use serde::{Deserialize, Serialize};

use crate::particle::{Particle, ParticleVertex, INDICES_PER_PARTICLE, VERTICES_PER_PARTICLE};
use crate::rand::ParticleRng;

/// Emitter parameters, read from the `[emitter]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Fixed particle capacity
    pub max_particles: usize,
    pub particles_per_second: f32,
    /// Seconds each particle lives
    pub lifetime: f32,
    pub start_size: f32,
    pub end_size: f32,
    pub start_color: Color,
    pub end_color: Color,
    pub start_velocity: [f32; 3],
    pub position: [f32; 3],
    pub acceleration: [f32; 3],
    /// Per-axis velocity jitter, uniform in `±jitter`
    pub jitter: f32,
    pub seed: u32,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            max_particles: 200,
            particles_per_second: 40.0,
            lifetime: 3.0,
            start_size: 0.2,
            end_size: 0.05,
            start_color: Color::new(1.0, 0.6, 0.1, 1.0),
            end_color: Color::new(1.0, 0.1, 0.1, 0.0),
            start_velocity: [0.0, 2.5, 0.0],
            position: [0.0, -4.5, 3.0],
            acceleration: [0.0, -1.0, 0.0],
            jitter: 0.2,
            seed: 0x5EED,
        }
    }
}

impl EmitterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_particles == 0 {
            return Err(GalleryError::invalid("emitter.max_particles", "must be at least 1"));
        }
        if !(self.particles_per_second > 0.0 && self.particles_per_second.is_finite()) {
            return Err(GalleryError::invalid(
                "emitter.particles_per_second",
                "must be positive and finite",
            ));
        }
        if !(self.lifetime > 0.0) {
            return Err(GalleryError::invalid("emitter.lifetime", "must be positive"));
        }
        if self.jitter < 0.0 {
            return Err(GalleryError::ValueOutOfRange {
                field: "emitter.jitter".into(),
                min: 0.0,
                max: f64::INFINITY,
                value: self.jitter as f64,
            });
        }
        Ok(())
    }

    pub fn seconds_per_particle(&self) -> f32 {
        1.0 / self.particles_per_second
    }
}

/// An indexed sub-draw over the particle index buffer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawRange {
    pub first_index: u32,
    pub index_count: u32,
}

/// Zero, one or two sub-draws covering the living range
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawRanges {
    ranges: [DrawRange; 2],
    len: usize,
}

impl DrawRanges {
    fn push(&mut self, first_particle: usize, particles: usize) {
        if particles == 0 {
            return;
        }
        self.ranges[self.len] = DrawRange {
            first_index: (first_particle * INDICES_PER_PARTICLE) as u32,
            index_count: (particles * INDICES_PER_PARTICLE) as u32,
        };
        self.len += 1;
    }

    pub fn as_slice(&self) -> &[DrawRange] {
        &self.ranges[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn total_indices(&self) -> u32 {
        self.as_slice().iter().map(|r| r.index_count).sum()
    }
}

/// Fixed-capacity emitter whose living particles form the ring range
/// `[first_alive, first_dead)`
pub struct Emitter {
    config: EmitterConfig,
    particles: Box<[Particle]>,
    vertices: Box<[ParticleVertex]>,
    first_alive: usize,
    first_dead: usize,
    living: usize,
    time_since_emit: f32,
    seconds_per_particle: f32,
    rng: ParticleRng,
}

impl Emitter {
    pub fn new(config: EmitterConfig) -> Result<Self> {
        config.validate()?;
        let capacity = config.max_particles;
        let particles = (0..capacity).map(|_| Particle::expired(config.lifetime)).collect();
        let vertices = vec![ParticleVertex::default(); capacity * VERTICES_PER_PARTICLE].into_boxed_slice();
        tracing::debug!(
            capacity,
            rate = config.particles_per_second,
            lifetime = config.lifetime,
            "emitter created"
        );
        Ok(Self {
            seconds_per_particle: config.seconds_per_particle(),
            rng: ParticleRng::new(config.seed),
            config,
            particles,
            vertices,
            first_alive: 0,
            first_dead: 0,
            living: 0,
            time_since_emit: 0.0,
        })
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    pub fn living_count(&self) -> usize {
        self.living
    }

    pub fn first_alive(&self) -> usize {
        self.first_alive
    }

    pub fn first_dead(&self) -> usize {
        self.first_dead
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn set_position(&mut self, position: [f32; 3]) {
        self.config.position = position;
    }

    /// Slots of the living range, oldest first
    pub fn living_slots(&self) -> impl Iterator<Item = usize> + '_ {
        let capacity = self.capacity();
        (0..self.living).map(move |i| (self.first_alive + i) % capacity)
    }

    /// Age the living range, retire expired particles, then spawn on the timer.
    ///
    /// A long frame spawns every interval it covered. The due count is taken
    /// in one step, so the work stays bounded by capacity at any rate. Each
    /// new particle starts already aged by the part of the frame that
    /// followed its spawn instant.
    pub fn update(&mut self, dt: f32) {
        let lifetime = self.config.lifetime;
        let capacity = self.capacity();

        for i in 0..self.living {
            let slot = (self.first_alive + i) % capacity;
            self.particles[slot].age += dt;
            self.simulate(slot);
        }

        // Every particle shares one lifetime, so the oldest always expire first
        while self.living > 0 && self.particles[self.first_alive].age >= lifetime {
            self.first_alive = (self.first_alive + 1) % capacity;
            self.living -= 1;
        }

        self.time_since_emit += dt;
        let interval = self.seconds_per_particle;
        let due = (self.time_since_emit / interval).floor() as u64;
        if due == 0 {
            return;
        }
        let backlog = self.time_since_emit;
        self.time_since_emit = (backlog - due as f32 * interval).max(0.0);

        // Spawn k is aged `backlog - k * interval`; the oldest ones may already be dead
        let first = ((backlog - lifetime) / interval).floor().max(0.0) as u64 + 1;
        for k in first..=due {
            if self.living == capacity {
                tracing::trace!(skipped = due - k + 1, "emitter saturated");
                break;
            }
            self.spawn(backlog - k as f32 * interval);
        }
    }

    fn spawn(&mut self, age: f32) {
        if self.living == self.capacity() || age >= self.config.lifetime {
            return;
        }

        let slot = self.first_dead;
        let start_velocity = self.rng.jitter3(self.config.start_velocity, self.config.jitter);
        self.particles[slot] = Particle {
            age,
            size: self.config.start_size,
            color: self.config.start_color,
            position: self.config.position,
            origin: self.config.position,
            start_velocity,
        };
        self.simulate(slot);

        self.first_dead = (self.first_dead + 1) % self.capacity();
        self.living += 1;
    }

    fn simulate(&mut self, slot: usize) {
        let c = &self.config;
        self.particles[slot].simulate(
            c.lifetime,
            (c.start_size, c.start_color),
            (c.end_size, c.end_color),
            c.acceleration,
        );
    }

    /// Write the quad of every living particle into its slot of the vertex
    /// array and return the whole array for upload
    pub fn stage_vertices(&mut self) -> &[ParticleVertex] {
        let capacity = self.capacity();
        for i in 0..self.living {
            let slot = (self.first_alive + i) % capacity;
            let base = slot * VERTICES_PER_PARTICLE;
            self.vertices[base..base + VERTICES_PER_PARTICLE]
                .copy_from_slice(&ParticleVertex::quad(&self.particles[slot]));
        }
        &self.vertices
    }

    /// Index ranges to draw: one when the living range is contiguous, two
    /// when it wraps past the end of the array
    pub fn draw_ranges(&self) -> DrawRanges {
        let mut ranges = DrawRanges::default();
        if self.living == 0 {
            return ranges;
        }
        if self.first_alive < self.first_dead {
            ranges.push(self.first_alive, self.living);
        } else {
            ranges.push(self.first_alive, self.capacity() - self.first_alive);
            ranges.push(0, self.first_dead);
        }
        ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config(rate: f32, capacity: usize, lifetime: f32) -> EmitterConfig {
        EmitterConfig {
            max_particles: capacity,
            particles_per_second: rate,
            lifetime,
            ..Default::default()
        }
    }

    fn alive_by_age(e: &Emitter) -> usize {
        e.particles().iter().filter(|p| p.age < e.config().lifetime).count()
    }

    #[test]
    fn two_per_second_for_one_second() {
        let mut e = Emitter::new(config(2.0, 5, 3.0)).unwrap();
        e.update(1.0);
        assert_eq!(e.living_count(), 2);
        let ages: Vec<f32> = e.living_slots().map(|s| e.particles()[s].age).collect();
        assert!((ages[0] - 0.5).abs() < 1e-5);
        assert!(ages[1].abs() < 1e-5);
        assert_eq!(alive_by_age(&e), 2);
    }

    #[test]
    fn expired_particles_retire_from_front() {
        let mut e = Emitter::new(config(10.0, 8, 0.35)).unwrap();
        for _ in 0..20 {
            e.update(0.05);
            assert!(e.living_count() <= e.capacity());
            assert_eq!(alive_by_age(&e), e.living_count());
        }
        // Steady state: lifetime * rate particles in flight
        assert!((3..=5).contains(&e.living_count()));
    }

    #[test]
    fn capacity_caps_living_count() {
        let mut e = Emitter::new(config(100.0, 5, 10.0)).unwrap();
        e.update(1.0);
        assert_eq!(e.living_count(), 5);
        assert_eq!(e.first_alive(), e.first_dead());
        assert_eq!(alive_by_age(&e), 5);
    }

    #[test]
    fn spawned_velocity_is_jittered_within_bounds() {
        let mut e = Emitter::new(config(50.0, 64, 5.0)).unwrap();
        e.update(1.0);
        let base = e.config().start_velocity;
        for slot in e.living_slots() {
            let v = e.particles()[slot].start_velocity;
            for axis in 0..3 {
                assert!((v[axis] - base[axis]).abs() <= 0.2 + 1e-6);
            }
        }
    }

    #[test]
    fn draw_ranges_empty_single_and_wrapped() {
        let mut e = Emitter::new(config(1.0, 4, 2.5)).unwrap();
        assert!(e.draw_ranges().is_empty());

        // Two alive at slots 0 and 1
        e.update(2.0);
        assert_eq!(
            e.draw_ranges().as_slice(),
            &[DrawRange {
                first_index: 0,
                index_count: 12
            }]
        );

        // Advance until the living range wraps past the end
        e.update(1.0);
        e.update(1.0);
        e.update(1.0);
        assert!(e.first_dead() < e.first_alive());
        let ranges = e.draw_ranges();
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges.as_slice()[0].first_index, (e.first_alive() * 6) as u32);
        assert_eq!(ranges.as_slice()[1].first_index, 0);
        assert_eq!(ranges.total_indices(), (e.living_count() * 6) as u32);
    }

    #[test]
    fn full_ring_draws_everything() {
        let mut e = Emitter::new(config(100.0, 5, 10.0)).unwrap();
        e.update(1.0);
        assert_eq!(e.draw_ranges().total_indices(), 30);
    }

    #[test]
    fn staged_vertices_follow_slots() {
        let mut e = Emitter::new(config(2.0, 5, 3.0)).unwrap();
        e.update(1.0);
        let first = e.first_alive();
        let expected = e.particles()[first].position;
        let vertices = e.stage_vertices();
        assert_eq!(vertices.len(), 20);
        assert_eq!(vertices[first * 4].position, expected);
        assert_eq!(vertices[first * 4 + 3].uv, [0.0, 1.0]);
    }

    #[test]
    fn extreme_rate_fills_capacity_and_returns() {
        let mut e = Emitter::new(config(1e10, 4, 3.0)).unwrap();
        e.update(0.016);
        assert_eq!(e.living_count(), 4);
        assert_eq!(alive_by_age(&e), 4);
        e.update(0.016);
        assert_eq!(e.living_count(), 4);
    }

    #[test]
    fn backlog_older_than_lifetime_is_dropped() {
        let mut e = Emitter::new(config(10.0, 64, 0.5)).unwrap();
        e.update(10.0);
        // only spawns from the last half second survive
        assert!((4..=6).contains(&e.living_count()), "{}", e.living_count());
        assert_eq!(alive_by_age(&e), e.living_count());
    }

    #[test]
    fn invalid_config_rejected() {
        assert!(Emitter::new(config(0.0, 5, 1.0)).is_err());
        assert!(Emitter::new(config(f32::INFINITY, 5, 1.0)).is_err());
        assert!(Emitter::new(config(1.0, 0, 1.0)).is_err());
        assert!(Emitter::new(config(1.0, 5, 0.0)).is_err());
    }

    #[test]
    fn config_from_toml_table() {
        let c: EmitterConfig = toml::from_str(
            "particles_per_second = 12.0\nstart_color = [0.0, 1.0, 0.0, 1.0]\nposition = [1.0, 2.0, 3.0]",
        )
        .unwrap();
        assert_eq!(c.particles_per_second, 12.0);
        assert_eq!(c.start_color, Color::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(c.position, [1.0, 2.0, 3.0]);
        assert_eq!(c.max_particles, 200);
    }

    proptest! {
        #[test]
        fn spawn_count_independent_of_frame_split(
            steps in proptest::collection::vec(0.001f32..0.2, 1..60),
        ) {
            let total: f32 = steps.iter().sum();
            let mut split = Emitter::new(config(7.0, 4096, 1000.0)).unwrap();
            for dt in &steps {
                split.update(*dt);
            }
            let mut whole = Emitter::new(config(7.0, 4096, 1000.0)).unwrap();
            whole.update(total);
            let diff = split.living_count() as i64 - whole.living_count() as i64;
            prop_assert!(diff.abs() <= 1, "split {} vs whole {}", split.living_count(), whole.living_count());
        }
    }
}
