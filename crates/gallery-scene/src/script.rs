//! Per-object behaviour hooks
//!
//! Every gameplay object carries exactly one `Script` that decides whether it
//! takes part in update, draw and collision this frame. `is_active` is
//! answered by the variant itself, so callers never need to know which kind
//! of object they are holding.

use gallery_runtime::FrameTime;
use glam::Vec3;

use crate::transform::Transform;

/// Sinusoidal sweep along the x axis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Oscillation {
    /// Angular speed in radians per second
    pub frequency: f32,
    /// Peak distance from x = 0
    pub amplitude: f32,
    /// Phase offset in radians
    pub phase: f32,
}

impl Oscillation {
    pub fn x_at(&self, total_time: f32) -> f32 {
        (total_time * self.frequency + self.phase).sin() * self.amplitude
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Script {
    /// Static scenery
    Passive,
    /// Oscillates while active; knocked out by a bullet
    Target { active: bool, motion: Oscillation },
    /// Moves under its object's velocity while active
    Bullet { active: bool },
}

impl Script {
    pub fn target(motion: Oscillation) -> Self {
        Script::Target {
            active: true,
            motion,
        }
    }

    /// Bullets wait in the pool until fired
    pub fn bullet() -> Self {
        Script::Bullet { active: false }
    }

    /// Runs once when the owning object is created
    pub fn start(&mut self, transform: &mut Transform) {
        match self {
            Script::Passive => {}
            Script::Target { motion, .. } => {
                let p = transform.position();
                transform.set_position(Vec3::new(motion.x_at(0.0), p.y, p.z));
            }
            Script::Bullet { active } => *active = false,
        }
    }

    /// Runs once per frame before velocity is applied
    pub fn update(&mut self, transform: &mut Transform, time: FrameTime) {
        match self {
            Script::Target {
                active: true,
                motion,
            } => {
                let p = transform.position();
                transform.set_position(Vec3::new(motion.x_at(time.total), p.y, p.z));
            }
            Script::Target { active: false, .. } | Script::Bullet { .. } | Script::Passive => {}
        }
    }

    /// Passive scripts are always active
    pub fn is_active(&self) -> bool {
        match self {
            Script::Passive => true,
            Script::Target { active, .. } | Script::Bullet { active } => *active,
        }
    }

    pub fn set_active(&mut self, value: bool) {
        match self {
            Script::Passive => {}
            Script::Target { active, .. } | Script::Bullet { active } => *active = value,
        }
    }

    /// Whether this script carries gameplay state
    pub fn is_gameplay(&self) -> bool {
        !matches!(self, Script::Passive)
    }
}
