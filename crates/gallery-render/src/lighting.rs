//! Directional lights and clear colour

use bytemuck::{Pod, Zeroable};
use gallery_core::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DirectionalLightSettings {
    pub ambient: Color,
    pub diffuse: Color,
    /// Direction the light travels, need not be normalised
    pub direction: [f32; 3],
}

/// Lighting parameters, read from the `[lighting]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingSettings {
    /// Shadow-casting light
    pub key: DirectionalLightSettings,
    pub fill: DirectionalLightSettings,
    pub clear_color: Color,
}

impl Default for LightingSettings {
    fn default() -> Self {
        Self {
            key: DirectionalLightSettings {
                ambient: Color::rgb(0.2, 0.2, 0.2),
                diffuse: Color::rgb(0.6, 0.6, 0.57),
                direction: [0.0, -0.5, 1.0],
            },
            fill: DirectionalLightSettings {
                ambient: Color::rgb(0.0, 0.0, 0.0),
                diffuse: Color::rgb(0.1, 0.1, 0.05),
                direction: [1.0, 1.0, 0.0],
            },
            clear_color: Color::new(0.4, 0.6, 0.75, 1.0),
        }
    }
}

/// One directional light as laid out in WGSL (vec4 slots keep 16-byte alignment)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct DirectionalLight {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub direction: [f32; 4],
}

impl From<&DirectionalLightSettings> for DirectionalLight {
    fn from(s: &DirectionalLightSettings) -> Self {
        let d = s.direction;
        let len = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
        let direction = if len > 1e-6 {
            [d[0] / len, d[1] / len, d[2] / len, 0.0]
        } else {
            [0.0, -1.0, 0.0, 0.0]
        };
        Self {
            ambient: s.ambient.to_array(),
            diffuse: s.diffuse.to_array(),
            direction,
        }
    }
}

/// Group 3, binding 0 of the forward shader
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LightUniforms {
    pub lights: [DirectionalLight; 2],
}

impl From<&LightingSettings> for LightUniforms {
    fn from(s: &LightingSettings) -> Self {
        Self {
            lights: [(&s.key).into(), (&s.fill).into()],
        }
    }
}

impl LightingSettings {
    pub fn clear_color(&self) -> wgpu::Color {
        let c = self.clear_color;
        wgpu::Color {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
            a: c.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layout() {
        assert_eq!(std::mem::size_of::<DirectionalLight>(), 48);
        assert_eq!(std::mem::size_of::<LightUniforms>(), 96);
    }

    #[test]
    fn test_direction_normalised() {
        let u = LightUniforms::from(&LightingSettings::default());
        let d = u.lights[0].direction;
        let len = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
        assert!((len - 1.0).abs() < 1e-5);
        assert_eq!(d[3], 0.0);
    }

    #[test]
    fn test_partial_override() {
        let s: LightingSettings = toml::from_str("clear_color = [0.0, 0.0, 0.0, 1.0]").unwrap();
        assert_eq!(s.clear_color, Color::BLACK);
        assert_eq!(s.key.direction, [0.0, -0.5, 1.0]);
    }
}
