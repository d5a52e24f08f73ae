//! Gallery Runtime - Game loop infrastructure
//!
//! Provides the per-frame building blocks the orchestrator polls before
//! updating the scene:
//! - `GameClock` / `FrameTime` - variable frame delta and running total
//! - `InputState` - keyboard and mouse tracking with named actions
//! - `Cooldown` - countdown gate used to rate-limit firing
//! - `GameEvent` / `EventBus` - gameplay events queued during update

mod clock;
mod cooldown;
mod event;
mod event_bus;
mod input;

pub use clock::{FrameTime, GameClock};
pub use cooldown::Cooldown;
pub use event::{GameEvent, RetireCause};
pub use event_bus::EventBus;
pub use input::{actions, Binding, InputState};
