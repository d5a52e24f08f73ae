//! Gallery Scene - Simulation core of the shooting gallery
//!
//! - `Transform` - position/rotation/scale with a lazily recomputed world matrix
//! - `GameObject` - a transform plus velocity, scripts and resource handles
//! - `Script` - per-object behaviour (passive, target, bullet)
//! - `collider` - sphere and arena-bounds tests
//! - `BulletPool` - fixed set of bullets recycled through a circular free queue
//! - `Scene` - targets, walls, glass and bullets with the per-frame update

pub mod collider;
mod object;
mod pool;
mod scene;
mod script;
mod settings;
mod transform;

pub use collider::ArenaBounds;
pub use object::{DrawItem, GameObject, VelocityGuard};
pub use pool::{BulletPool, FreeQueue};
pub use scene::{Scene, SceneResources};
pub use script::{Oscillation, Script};
pub use settings::{ArenaSettings, BulletSettings, GlassObject, GlassSettings, TargetSettings};
pub use transform::{euler_rotation, Transform, TransformState};
