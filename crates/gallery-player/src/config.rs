//! TOML game configuration
//!
//! Every section and field is optional; missing values fall back to the
//! stock gallery layout.

use gallery_core::{GalleryError, Result};
use gallery_particles::EmitterConfig;
use gallery_render::{CameraSettings, LightingSettings, ShadowSettings};
use gallery_scene::{ArenaSettings, BulletSettings, GlassSettings, TargetSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "gallery.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub vsync: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Shooting Gallery".to_string(),
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub window: WindowSettings,
    pub camera: CameraSettings,
    pub arena: ArenaSettings,
    pub bullets: BulletSettings,
    pub targets: TargetSettings,
    pub emitter: EmitterConfig,
    pub shadow: ShadowSettings,
    pub lighting: LightingSettings,
    pub glass: GlassSettings,
}

impl GalleryConfig {
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: GalleryConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&source)?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Explicit path, else `gallery.toml` if present, else defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
        if fallback.exists() {
            return Self::load(&fallback);
        }
        tracing::info!("no configuration file, using defaults");
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(GalleryError::invalid("window", "width and height must be non-zero"));
        }
        if self.bullets.pool_size == 0 {
            return Err(GalleryError::invalid("bullets.pool_size", "must be at least 1"));
        }
        if !(self.bullets.fire_cooldown >= 0.0) {
            return Err(GalleryError::invalid("bullets.fire_cooldown", "must not be negative"));
        }
        if !(self.arena.bound > 0.0) {
            return Err(GalleryError::invalid("arena.bound", "must be positive"));
        }
        let fov = self.camera.fov;
        if !(fov > 0.0 && fov < std::f32::consts::PI) {
            return Err(GalleryError::ValueOutOfRange {
                field: "camera.fov".into(),
                min: 0.0,
                max: std::f64::consts::PI,
                value: fov as f64,
            });
        }
        if !(self.camera.near > 0.0 && self.camera.far > self.camera.near) {
            return Err(GalleryError::invalid("camera", "require 0 < near < far"));
        }
        if self.shadow.map_size == 0 {
            return Err(GalleryError::invalid("shadow.map_size", "must be non-zero"));
        }
        self.emitter.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_scene::VelocityGuard;

    #[test]
    fn test_empty_document_is_stock_layout() {
        let config = GalleryConfig::from_toml("").unwrap();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.bullets.pool_size, 20);
        assert_eq!(config.targets.count, 3);
        assert_eq!(config.arena.bound, 15.0);
        assert_eq!(config.glass.objects.len(), 1);
        assert_eq!(config.bullets.velocity_guard, VelocityGuard::AllAxes);
    }

    #[test]
    fn test_shipped_file_matches_defaults() {
        let shipped = GalleryConfig::from_toml(include_str!("../../../gallery.toml")).unwrap();
        let defaults = GalleryConfig::default();
        assert_eq!(shipped.bullets.pool_size, defaults.bullets.pool_size);
        assert_eq!(shipped.emitter.seed, defaults.emitter.seed);
        assert_eq!(shipped.shadow.eye, defaults.shadow.eye);
        assert_eq!(shipped.lighting.key.diffuse, defaults.lighting.key.diffuse);
        assert_eq!(shipped.glass.objects, defaults.glass.objects);
        assert!((shipped.camera.fov - defaults.camera.fov).abs() < 1e-6);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = GalleryConfig::from_toml(
            r#"
            [bullets]
            pool_size = 5
            velocity_guard = "any_axis"

            [camera]
            move_speed = 8.0
            "#,
        )
        .unwrap();
        assert_eq!(config.bullets.pool_size, 5);
        assert_eq!(config.bullets.speed, 100.0);
        assert_eq!(config.bullets.velocity_guard, VelocityGuard::AnyAxis);
        assert_eq!(config.camera.move_speed, 8.0);
        assert_eq!(config.camera.near, 0.1);
    }

    #[test]
    fn test_glass_objects_replace_default() {
        let config = GalleryConfig::from_toml(
            r#"
            [glass]
            refraction_scale = 0.05

            [[glass.objects]]
            position = [1.0, 0.0, 2.0]
            scale = 0.5

            [[glass.objects]]
            position = [-1.0, 0.0, 2.0]
            scale = 1.0
            "#,
        )
        .unwrap();
        assert_eq!(config.glass.objects.len(), 2);
        assert_eq!(config.glass.objects[0].scale, 0.5);
        assert_eq!(config.glass.refraction_scale, 0.05);
    }

    #[test]
    fn test_zero_pool_rejected() {
        let err = GalleryConfig::from_toml("[bullets]\npool_size = 0").unwrap_err();
        assert!(matches!(err, GalleryError::InvalidConfig { ref field, .. } if field == "bullets.pool_size"));
    }

    #[test]
    fn test_emitter_validated() {
        assert!(GalleryConfig::from_toml("[emitter]\nmax_particles = 0").is_err());
        assert!(GalleryConfig::from_toml("[emitter]\nlifetime = 0.0").is_err());
    }

    #[test]
    fn test_bad_fov_out_of_range() {
        let err = GalleryConfig::from_toml("[camera]\nfov = 4.0").unwrap_err();
        assert!(matches!(err, GalleryError::ValueOutOfRange { .. }));
    }

    #[test]
    fn test_malformed_toml() {
        let err = GalleryConfig::from_toml("[bullets\n").unwrap_err();
        assert!(matches!(err, GalleryError::TomlParseError(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = GalleryConfig::load(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, GalleryError::IoError(_)));
    }
}
