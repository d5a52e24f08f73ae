//! First-person camera with a lazily rebuilt view matrix
//!
//! Movement and rotation only mark the view dirty; `update` rebuilds it once
//! per frame if needed. The projection is rebuilt on resize only. Both use
//! left-handed conventions with depth in [0, 1].

use gallery_scene::TransformState;
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Camera parameters, read from the `[camera]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: Vec3,
    pub direction: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Units per second for WASD movement
    pub move_speed: f32,
    /// Radians per pixel of mouse movement
    pub mouse_sensitivity: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, -5.0),
            direction: Vec3::Z,
            fov: std::f32::consts::FRAC_PI_4,
            near: 0.1,
            far: 100.0,
            move_speed: 5.0,
            mouse_sensitivity: 0.005,
        }
    }
}

/// Keeps the look direction this far from straight up or down
const MAX_PITCH_DOT: f32 = 0.99;

pub struct Camera {
    position: Vec3,
    direction: Vec3,
    up: Vec3,
    rotation: Quat,
    fov: f32,
    near: f32,
    far: f32,
    aspect: f32,
    sensitivity: f32,
    view: Mat4,
    projection: Mat4,
    state: TransformState,
}

impl Camera {
    pub fn new(settings: &CameraSettings, width: u32, height: u32) -> Self {
        let mut camera = Self {
            position: settings.position,
            direction: settings.direction.normalize_or(Vec3::Z),
            up: Vec3::Y,
            rotation: Quat::IDENTITY,
            fov: settings.fov,
            near: settings.near,
            far: settings.far,
            aspect: 1.0,
            sensitivity: settings.mouse_sensitivity,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            state: TransformState::Dirty,
        };
        camera.update_projection(width, height);
        camera.update();
        camera
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn is_changed(&self) -> bool {
        self.state == TransformState::Dirty
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
        self.state = TransformState::Dirty;
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.state = TransformState::Dirty;
    }

    /// Move along the view direction, strafe sideways, and rise on world y
    pub fn move_relative(&mut self, forward: f32, strafe: f32, vertical: f32) {
        let right = self.up.cross(self.direction).normalize_or_zero();
        self.position += self.direction * forward + right * strafe;
        self.position.y += vertical;
        self.state = TransformState::Dirty;
    }

    /// Rotate the view by a world-space quaternion
    pub fn rotate(&mut self, delta: Quat) {
        self.direction = (delta * self.direction).normalize();
        self.rotation = (delta * self.rotation).normalize();
        self.state = TransformState::Dirty;
    }

    /// Yaw about world up, pitch about the camera's right axis.
    /// Pitch stops short of looking straight up or down.
    pub fn mouse_rotate(&mut self, dx: f32, dy: f32) {
        let yaw = Quat::from_axis_angle(self.up, dx * self.sensitivity);
        self.rotate(yaw);

        let right = self.up.cross(self.direction).normalize_or_zero();
        if right == Vec3::ZERO {
            return;
        }
        let pitch = Quat::from_axis_angle(right, dy * self.sensitivity);
        if (pitch * self.direction).dot(self.up).abs() < MAX_PITCH_DOT {
            self.rotate(pitch);
        }
    }

    /// Rebuild the projection for a new viewport size
    pub fn update_projection(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
        self.projection = Mat4::perspective_lh(self.fov, self.aspect, self.near, self.far);
    }

    /// Rebuild the view matrix if anything moved since the last call
    pub fn update(&mut self) {
        if self.state == TransformState::Dirty {
            self.view = Mat4::look_to_lh(self.position, self.direction, self.up);
            self.state = TransformState::Clean;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}
