//! Read-only terrain queries used by agent locomotion.

pub mod heightmap;

pub use heightmap::Heightmap;

/// Heightfield queries at planar `(x, z)` coordinates.
///
/// Implementations must be deterministic and must answer any coordinate,
/// including ones outside their extent, with a defined boundary value.
pub trait TerrainSampler: Send + Sync {
    fn sample_height(&self, x: f32, z: f32) -> f32;

    /// Returns `true` when the location is **blocked**. Callers stop on `true`.
    fn sample_passable(&self, x: f32, z: f32) -> bool;

    /// Local gradient magnitude.
    fn sample_slope(&self, x: f32, z: f32) -> f32;
}

/// Infinite flat plane at a fixed height. Never blocked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatTerrain {
    pub height: f32,
}

impl FlatTerrain {
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl Default for FlatTerrain {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl TerrainSampler for FlatTerrain {
    fn sample_height(&self, _x: f32, _z: f32) -> f32 {
        self.height
    }

    fn sample_passable(&self, _x: f32, _z: f32) -> bool {
        false
    }

    fn sample_slope(&self, _x: f32, _z: f32) -> f32 {
        0.0
    }
}
