//! Game objects

use gallery_core::{MaterialId, MeshId};
use gallery_runtime::FrameTime;
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::script::Script;
use crate::transform::{Transform, TransformState};

/// Which velocities `GameObject::update` turns into motion.
///
/// `AllAxes` only moves an object whose velocity is non-zero on x, y and z
/// at once, so an axis-aligned velocity leaves it in place. `AnyAxis` moves
/// it whenever any component is non-zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VelocityGuard {
    #[default]
    AllAxes,
    AnyAxis,
}

impl VelocityGuard {
    pub fn allows(&self, v: Vec3) -> bool {
        match self {
            VelocityGuard::AllAxes => v.x != 0.0 && v.y != 0.0 && v.z != 0.0,
            VelocityGuard::AnyAxis => v != Vec3::ZERO,
        }
    }
}

/// Everything the renderer needs to draw one object
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawItem {
    pub mesh: MeshId,
    pub material: MaterialId,
    /// Column-major world matrix
    pub world: [[f32; 4]; 4],
}

/// A transform with velocity, scripts and shared mesh/material handles.
///
/// Objects are built once at scene setup and live until teardown. The
/// collision radius is `scale.x`.
#[derive(Clone, Debug)]
pub struct GameObject {
    transform: Transform,
    velocity: Vec3,
    guard: VelocityGuard,
    scripts: Vec<Script>,
    mesh: MeshId,
    material: MaterialId,
}

impl GameObject {
    /// Create an object and run each script's start hook
    pub fn new(mesh: MeshId, material: MaterialId, transform: Transform, scripts: Vec<Script>) -> Self {
        let mut object = Self {
            transform,
            velocity: Vec3::ZERO,
            guard: VelocityGuard::default(),
            scripts,
            mesh,
            material,
        };
        for script in &mut object.scripts {
            script.start(&mut object.transform);
        }
        object
    }

    pub fn with_velocity_guard(mut self, guard: VelocityGuard) -> Self {
        self.guard = guard;
        self
    }

    // --- Transform ---

    pub fn position(&self) -> Vec3 {
        self.transform.position()
    }

    pub fn rotation(&self) -> Quat {
        self.transform.rotation()
    }

    pub fn scale(&self) -> Vec3 {
        self.transform.scale()
    }

    pub fn radius(&self) -> f32 {
        self.transform.scale().x
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.transform.translate(delta);
    }

    pub fn rotate(&mut self, pitch: f32, yaw: f32, roll: f32) {
        self.transform.rotate(pitch, yaw, roll);
    }

    pub fn scale_by(&mut self, delta: Vec3) {
        self.transform.scale_by(delta);
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.set_position(position);
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.transform.set_rotation(rotation);
    }

    pub fn set_rotation_euler(&mut self, pitch: f32, yaw: f32, roll: f32) {
        self.transform.set_rotation_euler(pitch, yaw, roll);
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.transform.set_scale(scale);
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn is_changed(&self) -> bool {
        self.transform.state() == TransformState::Dirty
    }

    pub fn calculate_world_matrix(&mut self) {
        self.transform.calculate_world_matrix();
    }

    pub fn world_matrix(&self) -> Mat4 {
        self.transform.world_matrix()
    }

    // --- Velocity ---

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Velocity changes leave the world matrix untouched
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    pub fn add_velocity(&mut self, delta: Vec3) {
        self.velocity += delta;
    }

    // --- Scripts ---

    pub fn scripts(&self) -> &[Script] {
        &self.scripts
    }

    /// The gameplay script, if any
    pub fn script(&self) -> Option<&Script> {
        self.scripts.iter().find(|s| s.is_gameplay())
    }

    pub fn script_mut(&mut self) -> Option<&mut Script> {
        self.scripts.iter_mut().find(|s| s.is_gameplay())
    }

    /// Objects without a gameplay script are always active
    pub fn is_active(&self) -> bool {
        self.script().map(Script::is_active).unwrap_or(true)
    }

    pub fn set_active(&mut self, active: bool) {
        if let Some(script) = self.script_mut() {
            script.set_active(active);
        }
    }

    /// Run script hooks, then integrate velocity
    pub fn update(&mut self, time: FrameTime) {
        for script in &mut self.scripts {
            script.update(&mut self.transform, time);
        }
        if self.guard.allows(self.velocity) {
            self.transform.translate(self.velocity * time.delta);
        }
    }

    // --- Rendering ---

    pub fn mesh(&self) -> MeshId {
        self.mesh
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn draw_item(&self) -> DrawItem {
        DrawItem {
            mesh: self.mesh,
            material: self.material,
            world: self.transform.world_matrix().to_cols_array_2d(),
        }
    }
}
