//! Handles to shared scene resources
//!
//! Game objects never own geometry or materials. They hold one of these small
//! indices and the renderer resolves it against its registries.

use std::fmt;

/// Index of a mesh registered with the renderer
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct MeshId(pub u32);

/// Index of a material registered with the renderer
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct MaterialId(pub u32);

impl MeshId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl MaterialId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for MeshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MeshId({})", self.0)
    }
}

impl fmt::Debug for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MaterialId({})", self.0)
    }
}
