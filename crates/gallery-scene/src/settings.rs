//! Scene layout settings
//!
//! Each section deserialises from TOML with every field optional; the
//! defaults reproduce the classic three-target gallery.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::object::VelocityGuard;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaSettings {
    /// Bullets beyond `±bound` on any axis are retired
    pub bound: f32,
    /// Distance from the origin to each wall
    pub wall_distance: f32,
    /// Uniform scale applied to the wall quads
    pub wall_scale: f32,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            bound: 15.0,
            wall_distance: 5.0,
            wall_scale: 7.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletSettings {
    pub pool_size: usize,
    pub speed: f32,
    /// Radius and uniform scale
    pub scale: f32,
    /// Seconds between shots
    pub fire_cooldown: f32,
    pub velocity_guard: VelocityGuard,
}

impl Default for BulletSettings {
    fn default() -> Self {
        Self {
            pool_size: 20,
            speed: 100.0,
            scale: 0.3,
            fire_cooldown: 1.0,
            velocity_guard: VelocityGuard::AllAxes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetSettings {
    pub count: usize,
    /// Vertical gap between neighbouring targets
    pub spacing: f32,
    /// Distance along z from the origin
    pub depth: f32,
    pub scale: f32,
    pub frequency: f32,
    pub amplitude: f32,
    /// Phase added per target index
    pub phase_step: f32,
}

impl Default for TargetSettings {
    fn default() -> Self {
        Self {
            count: 3,
            spacing: 1.5,
            depth: 0.0,
            scale: 1.0,
            frequency: 1.6,
            amplitude: 2.0,
            phase_step: 2.0,
        }
    }
}

impl TargetSettings {
    /// Home position of target `index`, centred vertically on y = 0
    pub fn home(&self, index: usize) -> Vec3 {
        let middle = (self.count.saturating_sub(1)) as f32 * 0.5;
        Vec3::new(0.0, (middle - index as f32) * self.spacing, self.depth)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlassObject {
    pub position: Vec3,
    pub scale: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlassSettings {
    /// UV offset applied along the surface normal when sampling the scene behind
    pub refraction_scale: f32,
    pub objects: Vec<GlassObject>,
}

impl Default for GlassSettings {
    fn default() -> Self {
        Self {
            refraction_scale: 0.03,
            objects: vec![GlassObject {
                position: Vec3::new(-3.0, -2.5, 2.0),
                scale: 1.0,
            }],
        }
    }
}
