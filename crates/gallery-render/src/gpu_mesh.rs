//! GPU mesh and material storage addressed by the scene's integer handles

use std::marker::PhantomData;

use gallery_core::{GalleryError, MaterialId, MeshId, Result};
use wgpu::util::DeviceExt;

use crate::primitives::Mesh;
use crate::textures::GpuTexture;

/// A single GPU-resident mesh
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, mesh: &Mesh, label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count() as u32,
        }
    }
}

/// A texture plus its bind group on the shared texture layout
pub struct GpuMaterial {
    pub texture: GpuTexture,
    pub bind_group: wgpu::BindGroup,
}

/// Scene handle types a [`Registry`] can hand out
pub trait Handle: Copy + std::fmt::Debug {
    const KIND: &'static str;
    fn from_index(index: u32) -> Self;
    fn index(&self) -> usize;
}

impl Handle for MeshId {
    const KIND: &'static str = "mesh";
    fn from_index(index: u32) -> Self {
        MeshId(index)
    }
    fn index(&self) -> usize {
        MeshId::index(self)
    }
}

impl Handle for MaterialId {
    const KIND: &'static str = "material";
    fn from_index(index: u32) -> Self {
        MaterialId(index)
    }
    fn index(&self) -> usize {
        MaterialId::index(self)
    }
}

/// Append-only store where an entry's handle is its insertion index
pub struct Registry<H, T> {
    items: Vec<T>,
    _handle: PhantomData<H>,
}

impl<H: Handle, T> Default for Registry<H, T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            _handle: PhantomData,
        }
    }
}

impl<H: Handle, T> Registry<H, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: T) -> H {
        self.items.push(item);
        H::from_index((self.items.len() - 1) as u32)
    }

    pub fn get(&self, handle: H) -> Result<&T> {
        self.items
            .get(Handle::index(&handle))
            .ok_or_else(|| GalleryError::UnknownHandle(format!("{} {:?}", H::KIND, handle)))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub type MeshRegistry = Registry<MeshId, GpuMesh>;
pub type MaterialRegistry = Registry<MaterialId, GpuMaterial>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_insertion_indices() {
        let mut reg: Registry<MeshId, &str> = Registry::new();
        let a = reg.add("sphere");
        let b = reg.add("quad");
        assert_eq!(a, MeshId(0));
        assert_eq!(b, MeshId(1));
        assert_eq!(*reg.get(b).unwrap(), "quad");
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_unknown_handle_errors() {
        let reg: Registry<MaterialId, u8> = Registry::new();
        assert!(reg.is_empty());
        match reg.get(MaterialId(3)) {
            Err(GalleryError::UnknownHandle(msg)) => assert!(msg.contains("material")),
            other => panic!("expected UnknownHandle, got {:?}", other.map(|_| ())),
        }
    }
}
