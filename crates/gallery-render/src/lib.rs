//! Gallery Render - wgpu renderer for the shooting gallery
//!
//! Forward shading with one shadowed key light, additive particles drawn
//! straight from the emitter's ring buffer, and refractive glass that
//! samples an offscreen copy of the scene.

mod camera;
mod context;
mod frame;
mod glass;
mod gpu_mesh;
mod lighting;
mod offscreen;
mod particle_pipeline;
mod pipeline;
mod primitives;
mod renderer;
mod shadow;
mod textures;

pub use camera::{Camera, CameraSettings};
pub use context::{RenderContext, RenderError};
pub use frame::FramePlan;
pub use gpu_mesh::{GpuMaterial, GpuMesh, Handle, MaterialRegistry, MeshRegistry, Registry};
pub use lighting::{DirectionalLightSettings, LightingSettings};
pub use primitives::{create_quad, create_uv_sphere, Mesh, Vertex};
pub use renderer::{GalleryRenderer, RendererConfig};
pub use shadow::ShadowSettings;
pub use textures::GpuTexture;

#[cfg(test)]
mod tests {
    #[test]
    fn forward_shader_wgsl_parses() {
        let source = include_str!("forward.wgsl");
        naga::front::wgsl::parse_str(source).expect("forward.wgsl failed to parse");
    }

    #[test]
    fn shadow_shader_wgsl_parses() {
        let source = include_str!("shadow.wgsl");
        naga::front::wgsl::parse_str(source).expect("shadow.wgsl failed to parse");
    }

    #[test]
    fn particle_shader_wgsl_parses() {
        let source = include_str!("particle.wgsl");
        naga::front::wgsl::parse_str(source).expect("particle.wgsl failed to parse");
    }

    #[test]
    fn glass_shader_wgsl_parses() {
        let source = include_str!("glass.wgsl");
        naga::front::wgsl::parse_str(source).expect("glass.wgsl failed to parse");
    }
}
