//! Additive particle quads drawn from a ring buffer
//!
//! The emitter stages every slot's four corners into one CPU array; the
//! whole array is uploaded and only the living index ranges are drawn, so
//! a wrapped ring costs two draw calls.

use gallery_particles::{quad_indices, DrawRanges, ParticleVertex, VERTICES_PER_PARTICLE};
use wgpu::util::DeviceExt;

use crate::pipeline::{SharedLayouts, DEPTH_FORMAT};
use crate::textures::{soft_dot_pixels, GpuTexture};

const PARTICLE_TEXTURE_SIZE: u32 = 64;

const PARTICLE_ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32,
    2 => Float32x4,
    3 => Float32x2,
];

pub fn particle_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<ParticleVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &PARTICLE_ATTRIBUTES,
    }
}

pub struct ParticlePipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub texture: GpuTexture,
    pub texture_bind_group: wgpu::BindGroup,
    capacity: usize,
}

impl ParticlePipeline {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layouts: &SharedLayouts,
        format: wgpu::TextureFormat,
        capacity: usize,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Particle Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("particle.wgsl").into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Particle Pipeline Layout"),
            bind_group_layouts: &[&layouts.camera, &layouts.texture],
            push_constant_ranges: &[],
        });

        // Additive: src * alpha + dst
        let additive_blend = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::Zero,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Particle Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_particle"),
                buffers: &[particle_vertex_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_particle"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(additive_blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            // Test against the scene but never occlude other particles
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Particle Vertex Buffer"),
            size: vertex_buffer_size(capacity),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Index Buffer"),
            contents: bytemuck::cast_slice(&quad_indices(capacity)),
            usage: wgpu::BufferUsages::INDEX,
        });

        let texture = GpuTexture::from_rgba8(
            device,
            queue,
            PARTICLE_TEXTURE_SIZE,
            &soft_dot_pixels(PARTICLE_TEXTURE_SIZE),
            "Particle Texture",
        );
        let texture_bind_group = texture.bind_group(device, &layouts.texture);

        tracing::debug!(capacity, "particle buffers created");

        Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            texture,
            texture_bind_group,
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Copy the staged vertices into the dynamic vertex buffer
    pub fn upload(&self, queue: &wgpu::Queue, vertices: &[ParticleVertex]) {
        let count = vertices.len().min(self.capacity * VERTICES_PER_PARTICLE);
        if count > 0 {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices[..count]));
        }
    }

    /// Issue one indexed draw per living range
    pub fn draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        camera_bind_group: &wgpu::BindGroup,
        ranges: &DrawRanges,
    ) {
        if ranges.is_empty() {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, camera_bind_group, &[]);
        pass.set_bind_group(1, &self.texture_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        for range in ranges.as_slice() {
            pass.draw_indexed(range.first_index..range.first_index + range.index_count, 0, 0..1);
        }
    }
}

fn vertex_buffer_size(capacity: usize) -> wgpu::BufferAddress {
    (capacity.max(1) * VERTICES_PER_PARTICLE * std::mem::size_of::<ParticleVertex>())
        as wgpu::BufferAddress
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_covers_vertex() {
        let layout = particle_vertex_layout();
        assert_eq!(layout.array_stride, 40);
        let last = layout.attributes.last().unwrap();
        // uv sits at the end of the 40-byte vertex
        assert_eq!(last.offset, 32);
    }

    #[test]
    fn test_vertex_buffer_holds_every_slot() {
        assert_eq!(vertex_buffer_size(200), 200 * 4 * 40);
        assert_eq!(vertex_buffer_size(0), 4 * 40);
    }
}
