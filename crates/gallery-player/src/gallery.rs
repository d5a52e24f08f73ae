//! Per-frame game orchestration
//!
//! Owns every piece of mutable simulation state and steps it in a fixed
//! order: input and cooldown, camera, bullets, targets, particles, then the
//! camera's view matrix. The renderer only ever sees the resulting
//! [`FramePlan`] and staged particle vertices.

use gallery_core::Result;
use gallery_particles::{Emitter, ParticleVertex};
use gallery_render::{Camera, FramePlan};
use gallery_runtime::{actions, Cooldown, EventBus, FrameTime, GameEvent, InputState};
use gallery_scene::{Scene, SceneResources};

use crate::config::GalleryConfig;

/// What the renderer needs for one frame
pub struct Frame<'a> {
    pub camera: &'a Camera,
    pub plan: FramePlan,
    pub particle_vertices: &'a [ParticleVertex],
}

pub struct Gallery {
    scene: Scene,
    camera: Camera,
    emitter: Emitter,
    cooldown: Cooldown,
    events: EventBus,
    bullet_speed: f32,
    move_speed: f32,
}

impl Gallery {
    pub fn new(config: &GalleryConfig, resources: SceneResources, width: u32, height: u32) -> Result<Self> {
        let scene = Scene::new(
            &config.arena,
            &config.targets,
            &config.bullets,
            &config.glass,
            resources,
        )?;
        let emitter = Emitter::new(config.emitter.clone())?;

        Ok(Self {
            scene,
            camera: Camera::new(&config.camera, width, height),
            emitter,
            cooldown: Cooldown::new(config.bullets.fire_cooldown),
            events: EventBus::new(),
            bullet_speed: config.bullets.speed,
            move_speed: config.camera.move_speed,
        })
    }

    pub fn update(&mut self, input: &InputState, time: FrameTime) {
        let dt = time.delta;

        // The frame that fires does not count towards the cooldown
        if !self.cooldown.is_ready() {
            self.cooldown.tick(dt);
        } else if input.is_action_pressed(actions::FIRE) {
            let fired = self.scene.fire(
                self.camera.position(),
                self.camera.direction(),
                self.bullet_speed,
                &mut self.events,
            );
            if fired.is_some() {
                self.cooldown.trigger();
            }
        }

        let step = self.move_speed * dt;
        let forward = input.axis(actions::MOVE_BACKWARD, actions::MOVE_FORWARD);
        let strafe = input.axis(actions::STRAFE_LEFT, actions::STRAFE_RIGHT);
        if forward != 0.0 || strafe != 0.0 {
            self.camera.move_relative(forward * step, strafe * step, 0.0);
        }
        let (dx, dy) = input.mouse_delta();
        if dx != 0.0 || dy != 0.0 {
            self.camera.mouse_rotate(dx as f32, dy as f32);
        }

        self.scene.update_bullets(time, &mut self.events);
        self.scene.update_targets(time);
        self.emitter.update(dt);
        self.camera.update();

        self.log_events();
    }

    fn log_events(&mut self) {
        for event in self.events.drain() {
            match event {
                GameEvent::BulletFired { slot } => tracing::debug!(slot, "bullet fired"),
                GameEvent::PoolExhausted => tracing::warn!("fire requested with no free bullets"),
                GameEvent::TargetHit { target, slot, score } => {
                    tracing::info!(target, slot, score, "target hit")
                }
                GameEvent::BulletRetired { slot, cause } => {
                    tracing::debug!(slot, ?cause, "bullet retired")
                }
            }
        }
    }

    /// Build this frame's draw lists and stage particle vertices
    pub fn frame(&mut self) -> Frame<'_> {
        let plan = FramePlan::build(&self.scene, self.emitter.draw_ranges());
        Frame {
            camera: &self.camera,
            plan,
            particle_vertices: self.emitter.stage_vertices(),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.update_projection(width, height);
    }

    pub fn score(&self) -> u32 {
        self.scene.score()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }
}
