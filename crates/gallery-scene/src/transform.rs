//! Transform with a cached world matrix
//!
//! Any change to position, rotation or scale moves the transform to
//! `TransformState::Dirty`. The cached matrix is only trusted again after
//! `calculate_world_matrix` puts it back to `Clean`.

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Whether the cached world matrix matches the source fields
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformState {
    Clean,
    Dirty,
}

#[derive(Clone, Debug)]
pub struct Transform {
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
    world: Mat4,
    state: TransformState,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE)
    }
}

/// Rotation applying roll about Z, then pitch about X, then yaw about Y
pub fn euler_rotation(pitch: f32, yaw: f32, roll: f32) -> Quat {
    Quat::from_euler(EulerRot::YXZ, yaw, pitch, roll)
}

impl Transform {
    /// New transforms start dirty so the first draw always recomputes
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
            world: Mat4::IDENTITY,
            state: TransformState::Dirty,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn state(&self) -> TransformState {
        self.state
    }

    pub fn is_changed(&self) -> bool {
        self.state == TransformState::Dirty
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
        self.state = TransformState::Dirty;
    }

    /// Apply a relative rotation in the object's local frame
    pub fn rotate(&mut self, pitch: f32, yaw: f32, roll: f32) {
        self.rotation = (self.rotation * euler_rotation(pitch, yaw, roll)).normalize();
        self.state = TransformState::Dirty;
    }

    /// Additive scale change
    pub fn scale_by(&mut self, delta: Vec3) {
        self.scale += delta;
        self.state = TransformState::Dirty;
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.state = TransformState::Dirty;
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation.normalize();
        self.state = TransformState::Dirty;
    }

    pub fn set_rotation_euler(&mut self, pitch: f32, yaw: f32, roll: f32) {
        self.set_rotation(euler_rotation(pitch, yaw, roll));
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.state = TransformState::Dirty;
    }

    /// Rebuild the world matrix and mark the transform clean.
    ///
    /// In row-vector terms this is `Scale * Rotation * Translation`; glam
    /// stores its transpose column-major, which is the layout WGSL reads.
    pub fn calculate_world_matrix(&mut self) {
        self.world = Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position);
        self.state = TransformState::Clean;
    }

    /// Cached world matrix. Stale while the transform is dirty.
    pub fn world_matrix(&self) -> Mat4 {
        self.world
    }
}
