//! Shadow mapping
//!
//! Renders the active targets from the key light's fixed viewpoint into a
//! single depth texture. The forward shader samples it with a comparison
//! sampler to darken surfaces the light cannot see.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::primitives::Vertex;

/// Shadow parameters, read from the `[shadow]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowSettings {
    /// Width and height of the depth texture
    pub map_size: u32,
    pub eye: Vec3,
    pub target: Vec3,
    /// Width and height of the orthographic volume
    pub extent: f32,
    pub near: f32,
    pub far: f32,
    pub depth_bias: i32,
    pub slope_bias: f32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            map_size: 1024,
            eye: Vec3::new(0.0, 4.0, -10.0),
            target: Vec3::ZERO,
            extent: 10.0,
            near: 0.1,
            far: 100.0,
            depth_bias: 1000,
            slope_bias: 1.0,
        }
    }
}

impl ShadowSettings {
    pub fn light_view(&self) -> Mat4 {
        Mat4::look_at_lh(self.eye, self.target, Vec3::Y)
    }

    pub fn light_projection(&self) -> Mat4 {
        let h = self.extent * 0.5;
        Mat4::orthographic_lh(-h, h, -h, h, self.near, self.far)
    }

    pub fn light_view_proj(&self) -> Mat4 {
        self.light_projection() * self.light_view()
    }
}

/// Uniform data for a single shadow draw call
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ShadowDrawUniforms {
    pub light_view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
}

pub const SHADOW_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Depth-only pipeline plus the shadow map it renders into
pub struct ShadowPass {
    pub pipeline: wgpu::RenderPipeline,
    pub draw_layout: wgpu::BindGroupLayout,
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub light_view_proj: Mat4,
    pub resolution: u32,
}

impl ShadowPass {
    pub fn new(device: &wgpu::Device, settings: &ShadowSettings) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shadow Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shadow.wgsl").into()),
        });

        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("Shadow Draw Bind Group Layout"),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shadow Pipeline Layout"),
            bind_group_layouts: &[&draw_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Shadow Depth Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_shadow"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: None, // Depth only
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: SHADOW_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState {
                    constant: settings.depth_bias,
                    slope_scale: settings.slope_bias,
                    clamp: 0.0,
                },
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let resolution = settings.map_size.max(1);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Shadow Map"),
            size: wgpu::Extent3d {
                width: resolution,
                height: resolution,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SHADOW_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Comparison sampler for PCF
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Shadow Comparison Sampler"),
            compare: Some(wgpu::CompareFunction::LessEqual),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        tracing::debug!(resolution, "shadow map created");

        Self {
            pipeline,
            draw_layout,
            texture,
            view,
            sampler,
            light_view_proj: settings.light_view_proj(),
            resolution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_inside_light_volume() {
        let s = ShadowSettings::default();
        let p = s.light_view_proj().project_point3(Vec3::ZERO);
        assert!(p.x.abs() <= 1.0 && p.y.abs() <= 1.0);
        assert!(p.z > 0.0 && p.z < 1.0);
    }

    #[test]
    fn test_targets_fit_in_light_volume() {
        let s = ShadowSettings::default();
        let vp = s.light_view_proj();
        for y in [-1.5f32, 0.0, 1.5] {
            for x in [-3.0f32, 3.0] {
                let p = vp.project_point3(Vec3::new(x, y, 0.0));
                assert!(p.x.abs() <= 1.0 && p.y.abs() <= 1.0, "({x}, {y}) outside");
            }
        }
    }
}
