//! Frame orchestration: shadow map, offscreen refraction source, main pass
//!
//! Per frame:
//! 1. Depth of every active target from the key light
//! 2. Targets and walls into the offscreen target (only when glass exists)
//! 3. Swap chain: opaque objects, additive particles, then glass

use gallery_core::{Color, Result};
use gallery_particles::ParticleVertex;
use gallery_scene::{DrawItem, SceneResources};
use wgpu::util::DeviceExt;

use crate::camera::Camera;
use crate::context::RenderContext;
use crate::frame::FramePlan;
use crate::glass::{GlassPipeline, GlassUniforms};
use crate::gpu_mesh::{GpuMaterial, GpuMesh, MaterialRegistry, MeshRegistry};
use crate::lighting::{LightUniforms, LightingSettings};
use crate::offscreen::{OffscreenTarget, OFFSCREEN_FORMAT};
use crate::particle_pipeline::ParticlePipeline;
use crate::pipeline::{CameraUniforms, ForwardPipeline, ObjectUniforms, SharedLayouts};
use crate::primitives::{create_quad, create_uv_sphere};
use crate::shadow::{ShadowDrawUniforms, ShadowPass, ShadowSettings};
use crate::textures::{checker_pixels, solid_pixels, GpuTexture};

const MATERIAL_TEXTURE_SIZE: u32 = 64;

/// Renderer construction parameters
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub lighting: LightingSettings,
    pub shadow: ShadowSettings,
    pub refraction_scale: f32,
    pub particle_capacity: usize,
}

struct Refraction {
    target: OffscreenTarget,
    bind_group: wgpu::BindGroup,
}

pub struct GalleryRenderer {
    layouts: SharedLayouts,
    forward: ForwardPipeline,
    forward_offscreen: ForwardPipeline,
    glass: GlassPipeline,
    particles: ParticlePipeline,
    shadow: ShadowPass,
    meshes: MeshRegistry,
    materials: MaterialRegistry,
    resources: SceneResources,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    light_bind_group: wgpu::BindGroup,
    glass_buffer: wgpu::Buffer,
    refraction: Option<Refraction>,
    clear_color: wgpu::Color,
    refraction_scale: f32,
}

impl GalleryRenderer {
    pub fn new(context: &RenderContext, config: &RendererConfig) -> Self {
        let device = &context.device;
        let queue = &context.queue;

        let layouts = SharedLayouts::new(device);
        let forward = ForwardPipeline::new(device, &layouts, context.format());
        let forward_offscreen = ForwardPipeline::new(device, &layouts, OFFSCREEN_FORMAT);
        let glass = GlassPipeline::new(device, &layouts, context.format());
        let particles = ParticlePipeline::new(
            device,
            queue,
            &layouts,
            context.format(),
            config.particle_capacity,
        );
        let shadow = ShadowPass::new(device, &config.shadow);

        let mut meshes = MeshRegistry::new();
        let sphere = meshes.add(GpuMesh::upload(device, &create_uv_sphere(1.0, 16, 24), "Sphere"));
        let quad = meshes.add(GpuMesh::upload(device, &create_quad(1.0), "Quad"));

        let mut materials = MaterialRegistry::new();
        let mut add_material = |pixels: Vec<u8>, label: &str| {
            let texture = GpuTexture::from_rgba8(device, queue, MATERIAL_TEXTURE_SIZE, &pixels, label);
            let bind_group = texture.bind_group(device, &layouts.texture);
            materials.add(GpuMaterial { texture, bind_group })
        };
        let size = MATERIAL_TEXTURE_SIZE;
        let target_material = add_material(
            checker_pixels(size, 8, Color::rgb(0.85, 0.1, 0.1), Color::WHITE),
            "Target Material",
        );
        let wall_material = add_material(
            checker_pixels(size, 16, Color::rgb(0.55, 0.55, 0.5), Color::rgb(0.45, 0.45, 0.42)),
            "Wall Material",
        );
        let bullet_material = add_material(solid_pixels(size, Color::rgb(1.0, 0.85, 0.2)), "Bullet Material");
        let glass_material = add_material(solid_pixels(size, Color::rgb(0.8, 0.9, 1.0)), "Glass Material");

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniform Buffer"),
            size: std::mem::size_of::<CameraUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &layouts.camera,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("Camera Bind Group"),
        });

        // Lights never change after startup
        let light_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Uniform Buffer"),
            contents: bytemuck::cast_slice(&[LightUniforms::from(&config.lighting)]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let light_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &layouts.lighting,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: light_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&shadow.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&shadow.sampler),
                },
            ],
            label: Some("Light Bind Group"),
        });

        let glass_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Glass Uniform Buffer"),
            size: std::mem::size_of::<GlassUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        tracing::info!(
            format = ?context.format(),
            meshes = meshes.len(),
            materials = materials.len(),
            "renderer initialized"
        );

        Self {
            layouts,
            forward,
            forward_offscreen,
            glass,
            particles,
            shadow,
            meshes,
            materials,
            resources: SceneResources {
                sphere,
                quad,
                target_material,
                wall_material,
                bullet_material,
                glass_material,
            },
            camera_buffer,
            camera_bind_group,
            light_bind_group,
            glass_buffer,
            refraction: None,
            clear_color: config.lighting.clear_color(),
            refraction_scale: config.refraction_scale,
        }
    }

    /// Mesh and material handles for building the scene
    pub fn resources(&self) -> SceneResources {
        self.resources
    }

    pub fn particle_capacity(&self) -> usize {
        self.particles.capacity()
    }

    /// Drop the offscreen target if it no longer matches; rebuilt on next use
    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(r) = &self.refraction {
            if !r.target.matches(width, height) {
                self.refraction = None;
            }
        }
    }

    pub fn render(
        &mut self,
        context: &mut RenderContext,
        camera: &Camera,
        plan: &FramePlan,
        particle_vertices: &[ParticleVertex],
    ) -> Result<()> {
        let (width, height) = (context.width(), context.height());

        context.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[CameraUniforms::new(
                camera.view_matrix(),
                camera.projection_matrix(),
                self.shadow.light_view_proj,
                camera.position(),
            )]),
        );
        self.particles.upload(&context.queue, particle_vertices);

        if plan.needs_offscreen() {
            self.ensure_refraction(&context.device, width, height);
            context.queue.write_buffer(
                &self.glass_buffer,
                0,
                bytemuck::cast_slice(&[GlassUniforms::new(width, height, self.refraction_scale)]),
            );
        }

        let device = &context.device;
        let shadow_binds: Vec<wgpu::BindGroup> = plan
            .shadow_casters
            .iter()
            .map(|item| self.shadow_bind(device, item))
            .collect();
        let offscreen_binds = self.object_binds(device, &plan.offscreen);
        let opaque_binds = self.object_binds(device, &plan.opaque);
        let glass_binds = self.object_binds(device, &plan.glass);

        let frame = context.acquire()?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = context.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.shadow.pipeline);
            for (item, bind) in plan.shadow_casters.iter().zip(&shadow_binds) {
                let mesh = self.meshes.get(item.mesh)?;
                pass.set_bind_group(0, bind, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        if let Some(refraction) = self.refraction.as_ref().filter(|_| plan.needs_offscreen()) {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Offscreen Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &refraction.target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &refraction.target.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.forward_offscreen.pipeline);
            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            pass.set_bind_group(3, &self.light_bind_group, &[]);
            self.draw_lit(&mut pass, &plan.offscreen, &offscreen_binds)?;
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &context.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.forward.pipeline);
            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            pass.set_bind_group(3, &self.light_bind_group, &[]);
            self.draw_lit(&mut pass, &plan.opaque, &opaque_binds)?;

            self.particles
                .draw(&mut pass, &self.camera_bind_group, &plan.particles);

            if let Some(refraction) = self.refraction.as_ref().filter(|_| plan.needs_offscreen()) {
                pass.set_pipeline(&self.glass.pipeline);
                pass.set_bind_group(0, &self.camera_bind_group, &[]);
                pass.set_bind_group(2, &refraction.bind_group, &[]);
                for (item, bind) in plan.glass.iter().zip(&glass_binds) {
                    let mesh = self.meshes.get(item.mesh)?;
                    pass.set_bind_group(1, bind, &[]);
                    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(0..mesh.index_count, 0, 0..1);
                }
            }
        }

        context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Forward-shaded draws; camera and light groups must already be bound
    fn draw_lit(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        items: &[DrawItem],
        binds: &[wgpu::BindGroup],
    ) -> Result<()> {
        for (item, bind) in items.iter().zip(binds) {
            let mesh = self.meshes.get(item.mesh)?;
            let material = self.materials.get(item.material)?;
            pass.set_bind_group(1, bind, &[]);
            pass.set_bind_group(2, &material.bind_group, &[]);
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
        Ok(())
    }

    fn object_binds(&self, device: &wgpu::Device, items: &[DrawItem]) -> Vec<wgpu::BindGroup> {
        items
            .iter()
            .map(|item| {
                let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Object Uniform Buffer"),
                    contents: bytemuck::cast_slice(&[ObjectUniforms { world: item.world }]),
                    usage: wgpu::BufferUsages::UNIFORM,
                });
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &self.layouts.object,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                    label: Some("Object Bind Group"),
                })
            })
            .collect()
    }

    fn shadow_bind(&self, device: &wgpu::Device, item: &DrawItem) -> wgpu::BindGroup {
        let uniforms = ShadowDrawUniforms {
            light_view_proj: self.shadow.light_view_proj.to_cols_array_2d(),
            model: item.world,
        };
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Shadow Draw Uniform"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.shadow.draw_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("Shadow Draw Bind Group"),
        })
    }

    fn ensure_refraction(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self
            .refraction
            .as_ref()
            .is_some_and(|r| r.target.matches(width, height))
        {
            return;
        }

        let target = OffscreenTarget::new(device, width, height);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.glass.refraction_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&target.color_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&target.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.glass_buffer.as_entire_binding(),
                },
            ],
            label: Some("Glass Refraction Bind Group"),
        });

        tracing::debug!(width, height, "offscreen target created");
        self.refraction = Some(Refraction { target, bind_group });
    }
}
