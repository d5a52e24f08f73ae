//! Procedural textures uploaded to the GPU
//!
//! Materials are generated at startup instead of loaded from disk: a
//! checkerboard for the targets and walls, a flat colour for bullets and a
//! radial falloff dot for particles.

use gallery_core::Color;
use wgpu::util::DeviceExt;

/// A GPU-resident texture with its view and sampler
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub size: u32,
}

impl GpuTexture {
    /// Upload square RGBA8 pixel data. `pixels.len()` must be `size * size * 4`.
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        size: u32,
        pixels: &[u8],
        label: &str,
    ) -> Self {
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: size,
                    height: size,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            pixels,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            size,
        }
    }

    /// Bind group against the shared texture layout (view at 0, sampler at 1)
    pub fn bind_group(&self, device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&self.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
            label: Some("Texture Bind Group"),
        })
    }
}

/// Flat colour, `size` x `size`
pub fn solid_pixels(size: u32, color: Color) -> Vec<u8> {
    let texel = color.to_rgba8();
    let count = (size * size) as usize;
    let mut pixels = Vec::with_capacity(count * 4);
    for _ in 0..count {
        pixels.extend_from_slice(&texel);
    }
    pixels
}

/// Alternating `a`/`b` squares of `cell` pixels
pub fn checker_pixels(size: u32, cell: u32, a: Color, b: Color) -> Vec<u8> {
    let cell = cell.max(1);
    let (a, b) = (a.to_rgba8(), b.to_rgba8());
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let texel = if ((x / cell) + (y / cell)) % 2 == 0 { a } else { b };
            pixels.extend_from_slice(&texel);
        }
    }
    pixels
}

/// White dot whose alpha falls off quadratically to zero at the edge
pub fn soft_dot_pixels(size: u32) -> Vec<u8> {
    let half = size as f32 * 0.5;
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let dx = (x as f32 + 0.5 - half) / half;
            let dy = (y as f32 + 0.5 - half) / half;
            let d = (dx * dx + dy * dy).sqrt().min(1.0);
            let alpha = (1.0 - d) * (1.0 - d);
            pixels.extend_from_slice(&[255, 255, 255, (alpha * 255.0).round() as u8]);
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_pixel_count() {
        let px = solid_pixels(4, Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(px.len(), 4 * 4 * 4);
        assert_eq!(&px[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_checker_alternates() {
        let px = checker_pixels(4, 2, Color::WHITE, Color::BLACK);
        // (0,0) is white, (2,0) is black, (2,2) is white again
        assert_eq!(px[0], 255);
        assert_eq!(px[2 * 4], 0);
        assert_eq!(px[(2 * 4 + 2) * 4], 255);
    }

    #[test]
    fn test_soft_dot_fades_to_edge() {
        let size = 16;
        let px = soft_dot_pixels(size);
        let alpha = |x: u32, y: u32| px[((y * size + x) * 4 + 3) as usize];
        assert!(alpha(8, 8) > 200);
        assert_eq!(alpha(0, 0), 0);
        assert!(alpha(8, 8) > alpha(12, 8));
    }
}
