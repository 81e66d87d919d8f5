//! Hill primitives and per-cell generation.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::height_field::TerrainConfig;

/// An elliptical bump with a smooth quartic falloff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hill {
    /// Center on the horizontal plane (x, z).
    pub center: Vec2,
    pub radius_x: f32,
    pub radius_z: f32,
    /// Rotation of the ellipse axes (radians).
    pub rotation: f32,
    pub peak_height: f32,
}

impl Hill {
    /// Squared normalized elliptical distance from the center.
    pub fn normalized_distance_sq(&self, x: f32, z: f32) -> f32 {
        let offset = Vec2::new(x, z) - self.center;
        let (sin, cos) = (-self.rotation).sin_cos();
        let local_x = offset.x * cos - offset.y * sin;
        let local_z = offset.x * sin + offset.y * cos;
        let nx = local_x / self.radius_x.max(f32::EPSILON);
        let nz = local_z / self.radius_z.max(f32::EPSILON);
        nx * nx + nz * nz
    }

    /// Height contribution at `(x, z)`: `peak * (1 - d²)²` inside the
    /// ellipse, zero outside.
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let d2 = self.normalized_distance_sq(x, z);
        if d2 >= 1.0 {
            return 0.0;
        }
        let falloff = 1.0 - d2;
        self.peak_height * falloff * falloff
    }
}

/// SplitMix64 finalizer.
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Derive a seed for a cell from the world seed and cell coordinates.
///
/// Fixed arithmetic, so a seed names the same world on every platform and
/// toolchain.
pub fn cell_seed(world_seed: u64, cell_x: i32, cell_z: i32) -> u64 {
    let h = splitmix64(world_seed);
    let h = splitmix64(h ^ u64::from(cell_x as u32));
    splitmix64(h ^ u64::from(cell_z as u32))
}

/// Roll the hill (if any) of a single cell.
///
/// A pure function of `(config.seed, cell_x, cell_z)`.
pub fn generate_cell(config: &TerrainConfig, cell_x: i32, cell_z: i32) -> Option<Hill> {
    let mut rng = ChaCha8Rng::seed_from_u64(cell_seed(config.seed, cell_x, cell_z));

    if rng.gen::<f32>() >= config.spawn_chance {
        return None;
    }

    let spacing = config.hill_spacing;
    let max_offset = config.offset_fraction * spacing;
    let base = Vec2::new(
        (cell_x as f32 + 0.5) * spacing,
        (cell_z as f32 + 0.5) * spacing,
    );
    let offset = Vec2::new(
        rng.gen_range(-max_offset..=max_offset),
        rng.gen_range(-max_offset..=max_offset),
    );

    Some(Hill {
        center: base + offset,
        radius_x: rng.gen_range(config.min_radius..=config.max_radius),
        radius_z: rng.gen_range(config.min_radius..=config.max_radius),
        rotation: rng.gen_range(0.0..std::f32::consts::TAU),
        peak_height: rng.gen_range(config.min_peak..=config.max_peak),
    })
}

/// All hills that can influence a sector: one roll per cell of the 3×3
/// block centered on it.
pub fn generate_sector(config: &TerrainConfig, sector_x: i32, sector_z: i32) -> Vec<Hill> {
    let mut hills = Vec::with_capacity(9);
    for dz in -1..=1 {
        for dx in -1..=1 {
            if let Some(hill) = generate_cell(config, sector_x + dx, sector_z + dz) {
                hills.push(hill);
            }
        }
    }
    hills
}
