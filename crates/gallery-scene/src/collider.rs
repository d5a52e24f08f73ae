//! Collision tests
//!
//! Objects collide as spheres whose radius is their x scale. The arena is an
//! axis-aligned cube centred on the origin.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::object::GameObject;

/// Playable volume: every coordinate must stay within `±half_extent`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    pub half_extent: f32,
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self { half_extent: 15.0 }
    }
}

impl ArenaBounds {
    pub fn new(half_extent: f32) -> Self {
        Self { half_extent }
    }

    /// True when any coordinate lies strictly outside the arena
    pub fn is_outside(&self, p: Vec3) -> bool {
        p.abs().max_element() > self.half_extent
    }
}

/// Sphere overlap, touching counts as a hit
pub fn spheres_overlap(a: Vec3, radius_a: f32, b: Vec3, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) <= reach * reach
}

pub fn collides_with(a: &GameObject, b: &GameObject) -> bool {
    spheres_overlap(a.position(), a.radius(), b.position(), b.radius())
}

/// True when the object has left the playable volume
pub fn check_bounds(object: &GameObject, bounds: &ArenaBounds) -> bool {
    bounds.is_outside(object.position())
}
