//! Per-frame draw lists
//!
//! Built on the CPU from the scene each frame, then consumed by the
//! renderer pass by pass. Inactive targets and free bullets never appear.

use gallery_particles::DrawRanges;
use gallery_scene::{DrawItem, Scene};

#[derive(Clone, Debug, Default)]
pub struct FramePlan {
    /// Rendered into the shadow map
    pub shadow_casters: Vec<DrawItem>,
    /// What the glass refracts; empty when there is no glass
    pub offscreen: Vec<DrawItem>,
    /// Main pass, drawn before particles
    pub opaque: Vec<DrawItem>,
    pub particles: DrawRanges,
    /// Drawn last, sampling the offscreen target
    pub glass: Vec<DrawItem>,
}

impl FramePlan {
    pub fn build(scene: &Scene, particles: DrawRanges) -> Self {
        let targets: Vec<DrawItem> = scene.active_targets().map(|t| t.draw_item()).collect();
        let walls = scene.walls().iter().map(|w| w.draw_item());
        let glass: Vec<DrawItem> = scene.glass().iter().map(|g| g.draw_item()).collect();

        let mut opaque = targets.clone();
        opaque.extend(walls);

        let offscreen = if glass.is_empty() {
            Vec::new()
        } else {
            opaque.clone()
        };

        opaque.extend(scene.bullets().active().map(|b| b.draw_item()));

        Self {
            shadow_casters: targets,
            offscreen,
            opaque,
            particles,
            glass,
        }
    }

    pub fn needs_offscreen(&self) -> bool {
        !self.glass.is_empty()
    }

    pub fn draw_count(&self) -> usize {
        self.opaque.len() + self.glass.len() + self.particles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_core::{MaterialId, MeshId};
    use gallery_runtime::{EventBus, FrameTime};
    use gallery_scene::{ArenaSettings, BulletSettings, GlassSettings, SceneResources, TargetSettings};
    use glam::Vec3;

    fn resources() -> SceneResources {
        SceneResources {
            sphere: MeshId(0),
            quad: MeshId(1),
            target_material: MaterialId(0),
            wall_material: MaterialId(1),
            bullet_material: MaterialId(2),
            glass_material: MaterialId(3),
        }
    }

    fn scene(glass: GlassSettings) -> Scene {
        Scene::new(
            &ArenaSettings::default(),
            &TargetSettings::default(),
            &BulletSettings::default(),
            &glass,
            resources(),
        )
        .unwrap()
    }

    #[test]
    fn test_fresh_scene_plan() {
        let plan = FramePlan::build(&scene(GlassSettings::default()), DrawRanges::default());
        assert_eq!(plan.shadow_casters.len(), 3);
        // 3 targets + 5 walls, no bullets in flight
        assert_eq!(plan.opaque.len(), 8);
        assert_eq!(plan.offscreen.len(), 8);
        assert_eq!(plan.glass.len(), 1);
        assert!(plan.needs_offscreen());
        assert_eq!(plan.draw_count(), 9);
    }

    #[test]
    fn test_no_glass_skips_offscreen() {
        let glass = GlassSettings {
            objects: Vec::new(),
            ..Default::default()
        };
        let plan = FramePlan::build(&scene(glass), DrawRanges::default());
        assert!(!plan.needs_offscreen());
        assert!(plan.offscreen.is_empty());
    }

    #[test]
    fn test_bullets_only_in_main_pass() {
        let mut scene = scene(GlassSettings::default());
        let mut events = EventBus::new();
        scene.fire(Vec3::new(10.0, 10.0, -10.0), Vec3::NEG_Z, 1.0, &mut events);

        let plan = FramePlan::build(&scene, DrawRanges::default());
        assert_eq!(plan.opaque.len(), 9);
        assert_eq!(plan.offscreen.len(), 8);
        assert!(plan
            .opaque
            .iter()
            .any(|d| d.material == MaterialId(2)));
        assert!(plan.shadow_casters.iter().all(|d| d.material == MaterialId(0)));
    }

    #[test]
    fn test_hit_target_drops_out() {
        let mut scene = scene(GlassSettings::default());
        let mut events = EventBus::new();
        // Straight at the middle target, diagonal so the velocity guard lets it move
        let target = scene.targets()[1].position();
        let origin = target - Vec3::new(0.05, 0.05, 0.5);
        scene.fire(origin, (target - origin).normalize(), 1.0, &mut events);
        scene.update_bullets(FrameTime::new(0.1, 0.1), &mut events);

        let plan = FramePlan::build(&scene, DrawRanges::default());
        assert_eq!(plan.shadow_casters.len(), 2);
        assert_eq!(scene.score(), 1);
    }
}
