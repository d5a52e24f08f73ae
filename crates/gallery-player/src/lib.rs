//! Gallery Player - configuration, game orchestration and the window host
//!
//! `Gallery` steps the simulation and produces render input; `PlayerApp`
//! drives it from winit events.

pub mod config;
mod gallery;
mod player_app;

pub use config::GalleryConfig;
pub use gallery::{Frame, Gallery};
pub use player_app::PlayerApp;
