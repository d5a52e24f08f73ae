//! Particle state and GPU vertex layout

use bytemuck::{Pod, Zeroable};
use gallery_core::{lerp, Color};

pub const VERTICES_PER_PARTICLE: usize = 4;
pub const INDICES_PER_PARTICLE: usize = 6;

/// Corner UVs in quad order; the vertex shader expands corners from these
const CORNER_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// CPU-side particle state
#[derive(Clone, Debug)]
pub struct Particle {
    /// Seconds since spawn
    pub age: f32,
    pub size: f32,
    pub color: Color,
    pub position: [f32; 3],
    /// Emitter position at spawn time
    pub origin: [f32; 3],
    /// Base velocity plus jitter
    pub start_velocity: [f32; 3],
}

impl Particle {
    /// A slot that is free for respawn
    pub fn expired(lifetime: f32) -> Self {
        Self {
            age: lifetime,
            size: 0.0,
            color: Color::TRANSPARENT,
            position: [0.0; 3],
            origin: [0.0; 3],
            start_velocity: [0.0; 3],
        }
    }

    /// Recompute size, colour and position from age.
    ///
    /// Position follows constant acceleration: `origin + v t + a t^2 / 2`.
    pub fn simulate(&mut self, lifetime: f32, start: (f32, Color), end: (f32, Color), acceleration: [f32; 3]) {
        let ratio = if lifetime > 0.0 { (self.age / lifetime).min(1.0) } else { 1.0 };
        self.size = lerp(start.0, end.0, ratio);
        self.color = start.1.lerp(&end.1, ratio);

        let t = self.age;
        for i in 0..3 {
            self.position[i] =
                acceleration[i] * t * t * 0.5 + self.start_velocity[i] * t + self.origin[i];
        }
    }
}

/// One corner of a particle quad, matches `ParticleVertex` in particle.wgsl.
/// 40 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleVertex {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

impl ParticleVertex {
    /// The four corners of `particle`'s quad
    pub fn quad(particle: &Particle) -> [ParticleVertex; VERTICES_PER_PARTICLE] {
        CORNER_UVS.map(|uv| ParticleVertex {
            position: particle.position,
            size: particle.size,
            color: particle.color.to_array(),
            uv,
        })
    }
}

/// Index buffer for `capacity` quads: `i, i+1, i+2, i, i+2, i+3` per quad
pub fn quad_indices(capacity: usize) -> Vec<u32> {
    (0..capacity as u32)
        .flat_map(|q| {
            let i = q * VERTICES_PER_PARTICLE as u32;
            [i, i + 1, i + 2, i, i + 2, i + 3]
        })
        .collect()
}
