use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::TerrainSampler;

/// Parameters for procedurally generated terrain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Samples along x
    pub columns: usize,
    /// Samples along z
    pub rows: usize,
    pub cell_size: f32,
    /// World-space (x, z) of the first sample
    pub origin: Vec2,
    pub base_height: f32,
    pub amplitude: f32,
    /// Spatial frequency of the first octave, in radians per world unit
    pub frequency: f32,
    pub octaves: u32,
    /// Slope above which a location is blocked
    pub blocked_slope: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            columns: 257,
            rows: 257,
            cell_size: 4.0,
            origin: Vec2::new(-512.0, 0.0),
            base_height: -20.0,
            amplitude: 8.0,
            frequency: 0.01,
            octaves: 3,
            blocked_slope: 1.5,
        }
    }
}

/// Regular height grid with bilinear sampling.
///
/// Out-of-range queries clamp to the nearest edge sample for height and
/// slope, and report the location as blocked.
#[derive(Debug, Clone)]
pub struct Heightmap {
    columns: usize,
    rows: usize,
    cell_size: f32,
    origin: Vec2,
    heights: Vec<f32>,
    slopes: Vec<f32>,
    blocked_slope: f32,
}

impl Heightmap {
    /// Samples `height_at(x, z)` on a grid. Grids smaller than 2x2 are grown to 2x2.
    pub fn from_fn<F>(
        columns: usize,
        rows: usize,
        cell_size: f32,
        origin: Vec2,
        blocked_slope: f32,
        height_at: F,
    ) -> Self
    where
        F: Fn(f32, f32) -> f32 + Sync,
    {
        let columns = columns.max(2);
        let rows = rows.max(2);
        let cell_size = if cell_size > 0.0 { cell_size } else { 1.0 };

        let heights: Vec<f32> = (0..columns * rows)
            .into_par_iter()
            .map(|i| {
                let (c, r) = (i % columns, i / columns);
                height_at(
                    origin.x + c as f32 * cell_size,
                    origin.y + r as f32 * cell_size,
                )
            })
            .collect();

        let slopes = compute_slopes(&heights, columns, rows, cell_size);

        log::debug!(
            "Built {}x{} heightmap ({} units per cell)",
            columns,
            rows,
            cell_size
        );

        Self {
            columns,
            rows,
            cell_size,
            origin,
            heights,
            slopes,
            blocked_slope,
        }
    }

    /// Sum of seeded sine octaves, each half the amplitude and twice the
    /// frequency of the previous one.
    pub fn rolling_hills(config: &TerrainConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let octaves: Vec<(f32, f32, f32, f32)> = (0..config.octaves.max(1))
            .map(|i| {
                let scale = 2f32.powi(i as i32);
                (
                    config.amplitude / scale,
                    config.frequency * scale,
                    rng.gen_range(0.0..std::f32::consts::TAU),
                    rng.gen_range(0.0..std::f32::consts::TAU),
                )
            })
            .collect();

        let base = config.base_height;
        Self::from_fn(
            config.columns,
            config.rows,
            config.cell_size,
            config.origin,
            config.blocked_slope,
            move |x, z| {
                base + octaves
                    .iter()
                    .map(|&(amp, freq, px, pz)| amp * (x * freq + px).sin() * (z * freq + pz).cos())
                    .sum::<f32>()
            },
        )
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn contains(&self, x: f32, z: f32) -> bool {
        let max_x = self.origin.x + (self.columns - 1) as f32 * self.cell_size;
        let max_z = self.origin.y + (self.rows - 1) as f32 * self.cell_size;
        (self.origin.x..=max_x).contains(&x) && (self.origin.y..=max_z).contains(&z)
    }

    fn grid_coords(&self, x: f32, z: f32) -> (f32, f32) {
        let clamp = |v: f32, max: usize| {
            if v.is_nan() {
                0.0
            } else {
                v.clamp(0.0, (max - 1) as f32)
            }
        };
        (
            clamp((x - self.origin.x) / self.cell_size, self.columns),
            clamp((z - self.origin.y) / self.cell_size, self.rows),
        )
    }

    fn bilinear(&self, grid: &[f32], x: f32, z: f32) -> f32 {
        let (gx, gz) = self.grid_coords(x, z);
        let c0 = (gx.floor() as usize).min(self.columns - 2);
        let r0 = (gz.floor() as usize).min(self.rows - 2);
        let tx = gx - c0 as f32;
        let tz = gz - r0 as f32;

        let at = |c: usize, r: usize| grid[r * self.columns + c];
        let top = at(c0, r0) * (1.0 - tx) + at(c0 + 1, r0) * tx;
        let bottom = at(c0, r0 + 1) * (1.0 - tx) + at(c0 + 1, r0 + 1) * tx;
        top * (1.0 - tz) + bottom * tz
    }
}

fn compute_slopes(heights: &[f32], columns: usize, rows: usize, cell_size: f32) -> Vec<f32> {
    (0..columns * rows)
        .into_par_iter()
        .map(|i| {
            let (c, r) = (i % columns, i / columns);
            let (left, right) = (c.saturating_sub(1), (c + 1).min(columns - 1));
            let (down, up) = (r.saturating_sub(1), (r + 1).min(rows - 1));

            let dx = (heights[r * columns + right] - heights[r * columns + left])
                / ((right - left) as f32 * cell_size);
            let dz = (heights[up * columns + c] - heights[down * columns + c])
                / ((up - down) as f32 * cell_size);
            (dx * dx + dz * dz).sqrt()
        })
        .collect()
}

impl TerrainSampler for Heightmap {
    fn sample_height(&self, x: f32, z: f32) -> f32 {
        self.bilinear(&self.heights, x, z)
    }

    fn sample_passable(&self, x: f32, z: f32) -> bool {
        !self.contains(x, z) || self.sample_slope(x, z) > self.blocked_slope
    }

    fn sample_slope(&self, x: f32, z: f32) -> f32 {
        self.bilinear(&self.slopes, x, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Heightmap {
        // height = x / 2 over a 10x10 grid of unit cells
        Heightmap::from_fn(11, 11, 1.0, Vec2::ZERO, 1.0, |x, _| x * 0.5)
    }

    #[test]
    fn bilinear_height_between_samples() {
        let map = ramp();
        assert!((map.sample_height(2.5, 3.3) - 1.25).abs() < 1e-5);
        assert!((map.sample_height(10.0, 10.0) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn slope_of_ramp_is_its_gradient() {
        let map = ramp();
        assert!((map.sample_slope(4.2, 7.0) - 0.5).abs() < 1e-5);
        assert!(!map.sample_passable(4.2, 7.0));
    }

    #[test]
    fn out_of_bounds_clamps_and_blocks() {
        let map = ramp();
        assert!((map.sample_height(-50.0, 5.0) - 0.0).abs() < 1e-5);
        assert!((map.sample_height(500.0, 5.0) - 5.0).abs() < 1e-5);
        assert!(map.sample_passable(-0.5, 5.0));
        assert!(map.sample_passable(5.0, 10.5));
        assert!(map.sample_passable(f32::NAN, 0.0));
        assert!(map.sample_height(f32::NAN, f32::INFINITY).is_finite());
    }

    #[test]
    fn steep_cells_are_blocked() {
        let map = Heightmap::from_fn(11, 11, 1.0, Vec2::ZERO, 1.0, |x, _| x * 3.0);
        assert!(map.sample_passable(5.0, 5.0));
    }

    #[test]
    fn rolling_hills_is_deterministic_for_a_seed() {
        let config = TerrainConfig {
            columns: 17,
            rows: 17,
            ..TerrainConfig::default()
        };
        let a = Heightmap::rolling_hills(&config, 7);
        let b = Heightmap::rolling_hills(&config, 7);
        let (x, z) = (config.origin.x + 13.0, config.origin.y + 21.0);
        assert_eq!(a.sample_height(x, z), b.sample_height(x, z));
        assert_eq!(a.columns(), 17);
        assert_eq!(a.rows(), 17);
    }
}
