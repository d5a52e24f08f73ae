//! Gameplay events raised during the update phase

/// Why a bullet went back to the free queue
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetireCause {
    /// Struck an active target
    Hit,
    /// Left the arena bounds
    OutOfBounds,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// A bullet slot left the free queue
    BulletFired { slot: usize },
    /// A fire was requested with every slot in flight
    PoolExhausted,
    /// Bullet `slot` struck target `target`; `score` is the new total
    TargetHit { target: usize, slot: usize, score: u32 },
    /// A bullet slot returned to the free queue
    BulletRetired { slot: usize, cause: RetireCause },
}
