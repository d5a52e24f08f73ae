//! Gallery Core - Foundational types for the shooting gallery
//!
//! This crate provides the types that every other gallery crate depends on:
//! - `MeshId`, `MaterialId` - handles to shared, read-only GPU resources
//! - `Color` - linear RGBA colour with array (de)serialisation
//! - Error types and Result alias

mod error;
mod handle;
mod types;

pub use error::{GalleryError, Result};
pub use handle::{MaterialId, MeshId};
pub use types::{lerp, Color};
