pub mod cache;
pub mod handle;
pub mod mesh;

pub use cache::AssetCache;
pub use handle::Handle;
pub use mesh::MeshDesc;

use crate::error::SceneError;

/// Named material reference; shading parameters live with the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialDesc {
    pub path: String,
}

/// Mesh + material pair attached to a scene node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Renderable {
    pub mesh: Handle<MeshDesc>,
    pub material: Handle<MaterialDesc>,
}

pub struct Assets {
    pub meshes: AssetCache<MeshDesc>,
    pub materials: AssetCache<MaterialDesc>,
}

impl Assets {
    pub fn new() -> Self {
        Self {
            meshes: AssetCache::new("mesh"),
            materials: AssetCache::new("material"),
        }
    }

    /// Resolves a mesh and material by name into a renderable handle pair.
    pub fn renderable(&self, mesh: &str, material: &str) -> Result<Renderable, SceneError> {
        Ok(Renderable {
            mesh: self.meshes.lookup(mesh)?,
            material: self.materials.lookup(material)?,
        })
    }
}

impl Default for Assets {
    fn default() -> Self {
        Self::new()
    }
}
