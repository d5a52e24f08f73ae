//! Gallery Particles - CPU-simulated particle emitter
//!
//! Particles live in a fixed array treated as a ring: the living particles
//! always occupy the (possibly wrapping) range `[first_alive, first_dead)`.
//! Expired particles are retired from the front, new ones are written at the
//! back, and nothing is ever reallocated after construction.
//!
//! Each frame the emitter stages four vertices per living particle. The
//! renderer uploads them and issues the one or two indexed draws described
//! by [`DrawRanges`].

mod emitter;
mod particle;
mod rand;

pub use emitter::{DrawRange, DrawRanges, Emitter, EmitterConfig};
pub use particle::{quad_indices, Particle, ParticleVertex, INDICES_PER_PARTICLE, VERTICES_PER_PARTICLE};
pub use rand::ParticleRng;
