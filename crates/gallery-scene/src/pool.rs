//! Bullet pool
//!
//! A fixed array of bullet objects plus a circular queue of free slot
//! indices. Firing pops from the head, retiring pushes to the tail; both are
//! O(1) and both cursors wrap modulo the capacity. Every slot is at all times
//! either queued exactly once or in flight.

use gallery_core::{MaterialId, MeshId};
use glam::{Quat, Vec3};

use crate::object::{GameObject, VelocityGuard};
use crate::script::Script;
use crate::transform::Transform;

/// Circular queue of slot indices. `None` marks a consumed entry.
#[derive(Clone, Debug)]
pub struct FreeQueue {
    slots: Box<[Option<usize>]>,
    head: usize,
    tail: usize,
    len: usize,
}

impl FreeQueue {
    /// A full queue holding `0..capacity` in order
    pub fn full(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(Some).collect(),
            head: 0,
            tail: 0,
            len: capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn pop(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let index = self.slots[self.head].take();
        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        index
    }

    /// Returns false when the queue is already full
    pub fn push(&mut self, index: usize) -> bool {
        if self.len == self.capacity() {
            return false;
        }
        debug_assert!(self.slots[self.tail].is_none());
        self.slots[self.tail] = Some(index);
        self.tail = (self.tail + 1) % self.capacity();
        self.len += 1;
        true
    }

    /// Queued indices from head to tail
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        let capacity = self.capacity();
        (0..self.len).filter_map(move |i| self.slots[(self.head + i) % capacity])
    }

    pub fn contains(&self, index: usize) -> bool {
        self.iter().any(|i| i == index)
    }
}

/// Fixed set of bullets recycled through a `FreeQueue`
#[derive(Clone, Debug)]
pub struct BulletPool {
    bullets: Box<[GameObject]>,
    free: FreeQueue,
}

impl BulletPool {
    pub fn new(
        capacity: usize,
        mesh: MeshId,
        material: MaterialId,
        radius: f32,
        guard: VelocityGuard,
    ) -> Self {
        let bullets = (0..capacity)
            .map(|_| {
                let transform = Transform::new(Vec3::ZERO, Quat::IDENTITY, Vec3::splat(radius));
                GameObject::new(mesh, material, transform, vec![Script::bullet()])
                    .with_velocity_guard(guard)
            })
            .collect();
        Self {
            bullets,
            free: FreeQueue::full(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.bullets.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn active_count(&self) -> usize {
        self.capacity() - self.free.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.free.is_empty()
    }

    pub fn free_queue(&self) -> &FreeQueue {
        &self.free
    }

    /// Launch the next free bullet from `origin`.
    ///
    /// Returns the slot fired, or `None` when every bullet is in flight.
    pub fn fire(&mut self, origin: Vec3, direction: Vec3, speed: f32) -> Option<usize> {
        let slot = self.free.pop()?;
        let bullet = &mut self.bullets[slot];
        bullet.set_position(origin);
        bullet.set_velocity(direction * speed);
        bullet.set_active(true);
        bullet.calculate_world_matrix();
        Some(slot)
    }

    /// Deactivate an in-flight bullet and queue its slot.
    ///
    /// Retiring a bullet that is already free does nothing and returns false.
    pub fn retire(&mut self, slot: usize) -> bool {
        let Some(bullet) = self.bullets.get_mut(slot) else {
            return false;
        };
        if !bullet.is_active() {
            return false;
        }
        bullet.set_active(false);
        bullet.set_velocity(Vec3::ZERO);
        self.free.push(slot)
    }

    pub fn get(&self, slot: usize) -> Option<&GameObject> {
        self.bullets.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut GameObject> {
        self.bullets.get_mut(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameObject> {
        self.bullets.iter()
    }

    pub fn active(&self) -> impl Iterator<Item = &GameObject> {
        self.bullets.iter().filter(|b| b.is_active())
    }

    pub fn active_slots(&self) -> Vec<usize> {
        (0..self.capacity()).filter(|&i| self.bullets[i].is_active()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pool(capacity: usize) -> BulletPool {
        BulletPool::new(capacity, MeshId(0), MaterialId(0), 0.3, VelocityGuard::AllAxes)
    }

    /// Active slots and queued slots together are exactly 0..N, no repeats
    fn assert_conserved(pool: &BulletPool) {
        let mut seen = vec![0u32; pool.capacity()];
        for i in pool.active_slots() {
            seen[i] += 1;
        }
        for i in pool.free_queue().iter() {
            seen[i] += 1;
        }
        assert!(seen.iter().all(|&n| n == 1), "slot accounting broken: {seen:?}");
    }

    #[test]
    fn test_fire_until_empty_then_reuse() {
        let mut pool = pool(3);
        assert_eq!(pool.fire(Vec3::ZERO, Vec3::Z, 100.0), Some(0));
        assert_eq!(pool.fire(Vec3::ZERO, Vec3::Z, 100.0), Some(1));
        assert_eq!(pool.fire(Vec3::ZERO, Vec3::Z, 100.0), Some(2));
        assert!(pool.is_exhausted());
        assert_conserved(&pool);

        assert_eq!(pool.fire(Vec3::ZERO, Vec3::Z, 100.0), None);
        assert_eq!(pool.active_count(), 3);

        assert!(pool.retire(1));
        assert!(pool.free_queue().contains(1));
        assert_conserved(&pool);

        assert_eq!(pool.fire(Vec3::ZERO, Vec3::Z, 100.0), Some(1));
        assert_conserved(&pool);
    }

    #[test]
    fn test_fire_sets_origin_and_velocity() {
        let mut pool = pool(2);
        let slot = pool.fire(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.6, 0.8), 100.0);
        let bullet = pool.get(slot.unwrap()).unwrap();
        assert!(bullet.is_active());
        assert_eq!(bullet.position(), Vec3::new(0.0, 0.0, -5.0));
        assert!((bullet.velocity() - Vec3::new(0.0, 60.0, 80.0)).length() < 1e-4);
        assert!(!bullet.is_changed());
    }

    #[test]
    fn test_retire_is_idempotent() {
        let mut pool = pool(2);
        let slot = pool.fire(Vec3::ZERO, Vec3::X, 1.0).unwrap();
        assert!(pool.retire(slot));
        assert!(!pool.retire(slot));
        assert!(!pool.retire(99));
        assert_eq!(pool.free_count(), 2);
        assert_conserved(&pool);
    }

    #[test]
    fn test_cursors_wrap() {
        let mut pool = pool(3);
        for _ in 0..10 {
            let slot = pool.fire(Vec3::ZERO, Vec3::X, 1.0).unwrap();
            assert!(pool.retire(slot));
            assert_conserved(&pool);
        }
        assert_eq!(pool.free_count(), 3);
    }

    #[test]
    fn test_free_queue_order() {
        let mut q = FreeQueue::full(3);
        assert_eq!(q.pop(), Some(0));
        assert_eq!(q.pop(), Some(1));
        assert!(q.push(0));
        assert_eq!(q.iter().collect::<Vec<_>>(), vec![2, 0]);
        assert_eq!(q.pop(), Some(2));
        assert_eq!(q.pop(), Some(0));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn test_push_on_full_queue_rejected() {
        let mut q = FreeQueue::full(2);
        assert!(!q.push(0));
        assert_eq!(q.len(), 2);
    }

    proptest! {
        #[test]
        fn pool_conservation(ops in proptest::collection::vec((any::<bool>(), 0usize..6), 0..200)) {
            let mut pool = pool(6);
            for (fire, slot) in ops {
                if fire {
                    pool.fire(Vec3::ZERO, Vec3::ONE, 1.0);
                } else {
                    pool.retire(slot);
                }
                assert_conserved(&pool);
            }
        }
    }
}
