//! Procedural mesh primitives (UV sphere, quad)

use bytemuck::{Pod, Zeroable};
use std::f32::consts::{PI, TAU};

/// A vertex with position, normal and UV coordinates
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Indexed triangle list
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

/// UV sphere centred on the origin.
///
/// `rings` latitude bands from pole to pole, `segments` longitude slices.
/// The seam column is duplicated so UVs wrap cleanly.
pub fn create_uv_sphere(radius: f32, rings: u32, segments: u32) -> Mesh {
    let rings = rings.max(2);
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity(((rings + 1) * (segments + 1)) as usize);

    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let theta = v * PI;
        let (sin_t, cos_t) = theta.sin_cos();
        for seg in 0..=segments {
            let u = seg as f32 / segments as f32;
            let phi = u * TAU;
            let (sin_p, cos_p) = phi.sin_cos();
            let normal = [sin_t * cos_p, cos_t, sin_t * sin_p];
            vertices.push(Vertex {
                position: [normal[0] * radius, normal[1] * radius, normal[2] * radius],
                normal,
                uv: [u, v],
            });
        }
    }

    let stride = segments + 1;
    let mut indices = Vec::with_capacity((rings * segments * 6) as usize);
    for ring in 0..rings {
        for seg in 0..segments {
            let a = ring * stride + seg;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }

    Mesh { vertices, indices }
}

/// Square in the XY plane facing +Z, spanning `±half_extent`
pub fn create_quad(half_extent: f32) -> Mesh {
    let h = half_extent;
    let n = [0.0, 0.0, 1.0];
    let vertices = vec![
        Vertex { position: [-h, -h, 0.0], normal: n, uv: [0.0, 1.0] },
        Vertex { position: [h, -h, 0.0], normal: n, uv: [1.0, 1.0] },
        Vertex { position: [h, h, 0.0], normal: n, uv: [1.0, 0.0] },
        Vertex { position: [-h, h, 0.0], normal: n, uv: [0.0, 0.0] },
    ];
    Mesh {
        vertices,
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        assert_eq!(Vertex::desc().attributes.len(), 3);
    }

    #[test]
    fn test_sphere_counts_and_radius() {
        let mesh = create_uv_sphere(1.0, 8, 12);
        assert_eq!(mesh.vertices.len(), 9 * 13);
        assert_eq!(mesh.index_count(), 8 * 12 * 6);
        for v in &mesh.vertices {
            let p = v.position;
            let len = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-5);
        }
        let max = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < max));
    }

    #[test]
    fn test_quad_faces_positive_z() {
        let mesh = create_quad(1.0);
        assert_eq!(mesh.vertices.len(), 4);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
        assert!(mesh.vertices.iter().all(|v| v.position[2] == 0.0));
    }
}
