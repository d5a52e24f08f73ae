//! The gallery scene and its per-frame update

use gallery_core::{GalleryError, MaterialId, MeshId, Result};
use gallery_runtime::{EventBus, FrameTime, GameEvent, RetireCause};
use glam::{Quat, Vec3};
use std::f32::consts::{FRAC_PI_2, PI};

use crate::collider::{self, ArenaBounds};
use crate::object::GameObject;
use crate::pool::BulletPool;
use crate::script::{Oscillation, Script};
use crate::settings::{ArenaSettings, BulletSettings, GlassSettings, TargetSettings};
use crate::transform::{euler_rotation, Transform};

/// Mesh and material handles the scene hands out to its objects
#[derive(Clone, Copy, Debug)]
pub struct SceneResources {
    pub sphere: MeshId,
    pub quad: MeshId,
    pub target_material: MaterialId,
    pub wall_material: MaterialId,
    pub bullet_material: MaterialId,
    pub glass_material: MaterialId,
}

/// Targets, walls, glass and bullets, sized once at construction
pub struct Scene {
    targets: Box<[GameObject]>,
    walls: Box<[GameObject]>,
    glass: Box<[GameObject]>,
    bullets: BulletPool,
    bounds: ArenaBounds,
    score: u32,
}

impl Scene {
    pub fn new(
        arena: &ArenaSettings,
        targets: &TargetSettings,
        bullets: &BulletSettings,
        glass: &GlassSettings,
        res: SceneResources,
    ) -> Result<Self> {
        if bullets.pool_size == 0 {
            return Err(GalleryError::invalid("bullets.pool_size", "must be at least 1"));
        }
        if arena.bound <= 0.0 {
            return Err(GalleryError::invalid("arena.bound", "must be positive"));
        }

        let target_objects: Box<[GameObject]> = (0..targets.count)
            .map(|i| {
                let motion = Oscillation {
                    frequency: targets.frequency,
                    amplitude: targets.amplitude,
                    phase: i as f32 * targets.phase_step,
                };
                let transform =
                    Transform::new(targets.home(i), Quat::IDENTITY, Vec3::splat(targets.scale));
                let mut target = GameObject::new(
                    res.sphere,
                    res.target_material,
                    transform,
                    vec![Script::target(motion)],
                );
                target.calculate_world_matrix();
                target
            })
            .collect();

        let walls = wall_layout(arena.wall_distance)
            .into_iter()
            .map(|(position, rotation)| {
                let transform = Transform::new(position, rotation, Vec3::splat(arena.wall_scale));
                let mut wall = GameObject::new(res.quad, res.wall_material, transform, vec![Script::Passive]);
                wall.calculate_world_matrix();
                wall
            })
            .collect();

        let glass_objects = glass
            .objects
            .iter()
            .map(|g| {
                let transform = Transform::new(g.position, Quat::IDENTITY, Vec3::splat(g.scale));
                let mut object =
                    GameObject::new(res.sphere, res.glass_material, transform, vec![Script::Passive]);
                object.calculate_world_matrix();
                object
            })
            .collect();

        let pool = BulletPool::new(
            bullets.pool_size,
            res.sphere,
            res.bullet_material,
            bullets.scale,
            bullets.velocity_guard,
        );

        tracing::info!(
            targets = targets.count,
            bullets = bullets.pool_size,
            glass = glass.objects.len(),
            "scene built"
        );

        Ok(Self {
            targets: target_objects,
            walls,
            glass: glass_objects,
            bullets: pool,
            bounds: ArenaBounds::new(arena.bound),
            score: 0,
        })
    }

    /// Fire the next free bullet. An exhausted pool is a silent no-op apart
    /// from the `PoolExhausted` event.
    pub fn fire(
        &mut self,
        origin: Vec3,
        direction: Vec3,
        speed: f32,
        events: &mut EventBus,
    ) -> Option<usize> {
        match self.bullets.fire(origin, direction, speed) {
            Some(slot) => {
                events.push(GameEvent::BulletFired { slot });
                Some(slot)
            }
            None => {
                events.push(GameEvent::PoolExhausted);
                None
            }
        }
    }

    /// Move every bullet in flight, resolve hits, then retire strays.
    ///
    /// A bullet is tested against every active target and knocks down each
    /// one it overlaps. Hits are checked before the bounds test. Retirement
    /// is idempotent, so a bullet is queued at most once per frame.
    pub fn update_bullets(&mut self, time: FrameTime, events: &mut EventBus) {
        for slot in 0..self.bullets.capacity() {
            let Some(bullet) = self.bullets.get_mut(slot) else {
                continue;
            };
            if !bullet.is_active() {
                continue;
            }
            bullet.update(time);

            let mut hit = false;
            for (target, object) in self.targets.iter_mut().enumerate() {
                if object.is_active() && collider::collides_with(bullet, object) {
                    object.set_active(false);
                    self.score += 1;
                    hit = true;
                    events.push(GameEvent::TargetHit {
                        target,
                        slot,
                        score: self.score,
                    });
                }
            }
            let out_of_bounds = collider::check_bounds(bullet, &self.bounds);

            if hit && self.bullets.retire(slot) {
                events.push(GameEvent::BulletRetired {
                    slot,
                    cause: RetireCause::Hit,
                });
            }
            if out_of_bounds && self.bullets.retire(slot) {
                events.push(GameEvent::BulletRetired {
                    slot,
                    cause: RetireCause::OutOfBounds,
                });
            }

            if let Some(bullet) = self.bullets.get_mut(slot) {
                if bullet.is_active() && bullet.is_changed() {
                    bullet.calculate_world_matrix();
                }
            }
        }
    }

    /// Sweep every active target along its oscillation
    pub fn update_targets(&mut self, time: FrameTime) {
        for target in self.targets.iter_mut().filter(|t| t.is_active()) {
            target.update(time);
            if target.is_changed() {
                target.calculate_world_matrix();
            }
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn bounds(&self) -> &ArenaBounds {
        &self.bounds
    }

    pub fn targets(&self) -> &[GameObject] {
        &self.targets
    }

    pub fn active_targets(&self) -> impl Iterator<Item = &GameObject> {
        self.targets.iter().filter(|t| t.is_active())
    }

    pub fn walls(&self) -> &[GameObject] {
        &self.walls
    }

    pub fn glass(&self) -> &[GameObject] {
        &self.glass
    }

    pub fn bullets(&self) -> &BulletPool {
        &self.bullets
    }
}

/// Back, left, right, ceiling and floor quads facing the centre.
/// The quad mesh faces +Z before rotation.
fn wall_layout(distance: f32) -> [(Vec3, Quat); 5] {
    [
        (Vec3::new(0.0, 0.0, distance), euler_rotation(0.0, PI, 0.0)),
        (Vec3::new(-distance, 0.0, 0.0), euler_rotation(0.0, FRAC_PI_2, 0.0)),
        (Vec3::new(distance, 0.0, 0.0), euler_rotation(0.0, -FRAC_PI_2, 0.0)),
        (Vec3::new(0.0, distance, 0.0), euler_rotation(FRAC_PI_2, 0.0, 0.0)),
        (Vec3::new(0.0, -distance, 0.0), euler_rotation(-FRAC_PI_2, 0.0, 0.0)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn scene_with(bullets: BulletSettings) -> Scene {
        Scene::new(
            &ArenaSettings::default(),
            &TargetSettings::default(),
            &bullets,
            &GlassSettings::default(),
            resources(),
        )
        .unwrap()
    }

    fn scene() -> Scene {
        scene_with(BulletSettings::default())
    }

    #[test]
    fn test_default_layout() {
        let scene = scene();
        assert_eq!(scene.targets().len(), 3);
        assert_eq!(scene.walls().len(), 5);
        assert_eq!(scene.glass().len(), 1);
        assert_eq!(scene.bullets().capacity(), 20);
        assert_eq!(scene.bullets().free_count(), 20);
        assert!(scene.walls().iter().all(|w| !w.is_changed()));
    }

    #[test]
    fn test_walls_face_inward() {
        let scene = scene();
        for wall in scene.walls() {
            let normal = wall.rotation() * Vec3::Z;
            let to_centre = -wall.position().normalize();
            assert!(normal.dot(to_centre) > 0.99, "wall at {:?}", wall.position());
        }
    }

    #[test]
    fn test_zero_pool_rejected() {
        let bullets = BulletSettings {
            pool_size: 0,
            ..Default::default()
        };
        let result = Scene::new(
            &ArenaSettings::default(),
            &TargetSettings::default(),
            &bullets,
            &GlassSettings::default(),
            resources(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_hit_scores_and_retires() {
        let mut scene = scene();
        let mut events = EventBus::new();
        scene.update_targets(FrameTime::new(0.0, 0.0));
        let target_pos = scene.targets()[1].position();

        // Start just short of the middle target, moving diagonally into it
        let origin = target_pos - Vec3::splat(0.5);
        let slot = scene.fire(origin, Vec3::ONE.normalize(), 1.0, &mut events).unwrap();
        scene.update_bullets(FrameTime::new(0.01, 0.01), &mut events);

        assert_eq!(scene.score(), 1);
        assert!(!scene.targets()[1].is_active());
        assert!(!scene.bullets().get(slot).unwrap().is_active());
        assert_eq!(scene.bullets().free_count(), 20);
        let events = events.drain();
        assert!(events.contains(&GameEvent::TargetHit {
            target: 1,
            slot,
            score: 1
        }));
        assert!(events.contains(&GameEvent::BulletRetired {
            slot,
            cause: RetireCause::Hit
        }));
    }

    fn still_targets() -> TargetSettings {
        TargetSettings {
            amplitude: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_bullet_between_targets_hits_both() {
        let mut scene = Scene::new(
            &ArenaSettings::default(),
            &still_targets(),
            &BulletSettings::default(),
            &GlassSettings::default(),
            resources(),
        )
        .unwrap();
        let mut events = EventBus::new();
        // Targets 0 and 1 sit at y = 1.5 and y = 0 with radius 1
        let origin = Vec3::new(0.0, 0.75, 0.0);
        let slot = scene
            .fire(origin, Vec3::ONE.normalize(), 0.01, &mut events)
            .unwrap();
        scene.update_bullets(FrameTime::new(0.01, 0.01), &mut events);

        assert_eq!(scene.score(), 2);
        assert_eq!(scene.active_targets().count(), 1);
        assert!(scene.targets()[2].is_active());
        let events = events.drain();
        let hits = events
            .iter()
            .filter(|e| matches!(e, GameEvent::TargetHit { .. }))
            .count();
        assert_eq!(hits, 2);
        assert_eq!(
            events
                .iter()
                .filter(|e| **e == GameEvent::BulletRetired { slot, cause: RetireCause::Hit })
                .count(),
            1
        );
        assert_eq!(scene.bullets().free_count(), 20);
    }

    #[test]
    fn test_hit_and_exit_in_one_frame_retires_once() {
        let targets = TargetSettings {
            count: 1,
            ..still_targets()
        };
        let mut scene = Scene::new(
            &ArenaSettings {
                bound: 0.5,
                ..Default::default()
            },
            &targets,
            &BulletSettings::default(),
            &GlassSettings::default(),
            resources(),
        )
        .unwrap();
        let mut events = EventBus::new();
        // Half a unit of travel puts it near (0.59, 0.59, 0.59): past the
        // bound yet still touching the target at the origin
        let slot = scene
            .fire(Vec3::splat(0.3), Vec3::ONE.normalize(), 10.0, &mut events)
            .unwrap();
        scene.update_bullets(FrameTime::new(0.05, 0.05), &mut events);

        assert_eq!(scene.score(), 1);
        let retired: Vec<_> = events
            .drain()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::BulletRetired { .. }))
            .collect();
        assert_eq!(
            retired,
            vec![GameEvent::BulletRetired {
                slot,
                cause: RetireCause::Hit
            }]
        );
        assert_eq!(scene.bullets().free_count(), scene.bullets().capacity());
    }

    #[test]
    fn test_hit_target_is_not_hit_twice() {
        let mut scene = scene();
        let mut events = EventBus::new();
        let target_pos = scene.targets()[0].position();
        scene.fire(target_pos, Vec3::ONE, 0.001, &mut events);
        scene.fire(target_pos, Vec3::ONE, 0.001, &mut events);
        scene.update_bullets(FrameTime::new(0.01, 0.01), &mut events);
        assert_eq!(scene.score(), 1);
        assert_eq!(scene.bullets().active_count(), 1);
    }

    #[test]
    fn test_out_of_bounds_retires_once() {
        let mut scene = scene();
        let mut events = EventBus::new();
        let slot = scene
            .fire(Vec3::new(14.0, 14.0, -14.0), Vec3::new(1.0, 1.0, -1.0), 10.0, &mut events)
            .unwrap();
        scene.update_bullets(FrameTime::new(0.5, 0.5), &mut events);
        assert!(!scene.bullets().get(slot).unwrap().is_active());
        let retired = events
            .drain()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::BulletRetired { .. }))
            .count();
        assert_eq!(retired, 1);
        assert_eq!(scene.bullets().free_count(), 20);
    }

    #[test]
    fn test_axis_aligned_bullet_stalls_under_all_axes_guard() {
        let mut scene = scene();
        let mut events = EventBus::new();
        let origin = Vec3::new(0.0, 4.0, -5.0);
        let slot = scene.fire(origin, Vec3::Z, 100.0, &mut events).unwrap();
        scene.update_bullets(FrameTime::new(0.1, 0.1), &mut events);
        assert_eq!(scene.bullets().get(slot).unwrap().position(), origin);
    }

    #[test]
    fn test_axis_aligned_bullet_moves_under_any_axis_guard() {
        let mut scene = scene_with(BulletSettings {
            velocity_guard: crate::VelocityGuard::AnyAxis,
            ..Default::default()
        });
        let mut events = EventBus::new();
        let slot = scene
            .fire(Vec3::new(0.0, 4.0, -5.0), Vec3::Z, 100.0, &mut events)
            .unwrap();
        scene.update_bullets(FrameTime::new(0.1, 0.1), &mut events);
        // 10 units along +z leaves it at z = 5, still inside the arena
        let bullet = scene.bullets().get(slot).unwrap();
        assert!((bullet.position().z - 5.0).abs() < 1e-4);
        assert!(!bullet.is_changed());
    }

    #[test]
    fn test_exhausted_pool_emits_event() {
        let mut scene = scene_with(BulletSettings {
            pool_size: 1,
            ..Default::default()
        });
        let mut events = EventBus::new();
        assert!(scene.fire(Vec3::ZERO, Vec3::Z, 1.0, &mut events).is_some());
        assert!(scene.fire(Vec3::ZERO, Vec3::Z, 1.0, &mut events).is_none());
        assert_eq!(events.drain().last(), Some(&GameEvent::PoolExhausted));
    }

    #[test]
    fn test_targets_oscillate_and_recompute() {
        let mut scene = scene();
        scene.update_targets(FrameTime::new(0.1, 1.0));
        let t0 = &scene.targets()[0];
        assert!((t0.position().x - (1.6f32).sin() * 2.0).abs() < 1e-5);
        assert!(!t0.is_changed());
        assert_eq!(t0.world_matrix().w_axis.x, t0.position().x);
    }
}
