//! TerrainHeightField: procedural elevation queries with a sector cache.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use touchdown_core::constants::*;
use touchdown_core::traits::GroundHeight;

use crate::hills::{generate_sector, Hill};

/// Integer coordinates of a hill sector.
pub type SectorCoord = (i32, i32);

/// Hill generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// World seed mixed into every cell seed.
    pub seed: u64,
    /// Side length of a cell/sector (meters).
    pub hill_spacing: f32,
    /// Probability that a cell spawns a hill.
    pub spawn_chance: f32,
    /// Max center offset as a fraction of the spacing.
    pub offset_fraction: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_peak: f32,
    pub max_peak: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: TERRAIN_SEED,
            hill_spacing: HILL_SPACING,
            spawn_chance: HILL_SPAWN_CHANCE,
            offset_fraction: HILL_OFFSET_FRACTION,
            min_radius: HILL_MIN_RADIUS,
            max_radius: HILL_MAX_RADIUS,
            min_peak: HILL_MIN_PEAK,
            max_peak: HILL_MAX_PEAK,
        }
    }
}

impl TerrainConfig {
    /// Terrain with no hills at all.
    pub fn flat() -> Self {
        Self {
            spawn_chance: 0.0,
            ..Default::default()
        }
    }

    /// Clamp out-of-range values, logging each correction.
    pub fn sanitized(mut self) -> Self {
        if !(self.hill_spacing > 1.0) {
            log::warn!("hill_spacing {} too small, using {}", self.hill_spacing, HILL_SPACING);
            self.hill_spacing = HILL_SPACING;
        }
        if !(0.0..=1.0).contains(&self.spawn_chance) {
            let clamped = if self.spawn_chance.is_nan() {
                0.0
            } else {
                self.spawn_chance.clamp(0.0, 1.0)
            };
            log::warn!("spawn_chance {} out of [0, 1], using {}", self.spawn_chance, clamped);
            self.spawn_chance = clamped;
        }
        if !(0.0..=0.5).contains(&self.offset_fraction) {
            log::warn!(
                "offset_fraction {} out of [0, 0.5], using {}",
                self.offset_fraction,
                HILL_OFFSET_FRACTION
            );
            self.offset_fraction = HILL_OFFSET_FRACTION;
        }
        if !(self.min_radius > 0.0) || self.max_radius < self.min_radius {
            log::warn!(
                "hill radius range [{}, {}] invalid, using defaults",
                self.min_radius,
                self.max_radius
            );
            self.min_radius = HILL_MIN_RADIUS;
            self.max_radius = HILL_MAX_RADIUS;
        }
        if !(self.min_peak >= 0.0) || self.max_peak < self.min_peak {
            log::warn!(
                "hill peak range [{}, {}] invalid, using defaults",
                self.min_peak,
                self.max_peak
            );
            self.min_peak = HILL_MIN_PEAK;
            self.max_peak = HILL_MAX_PEAK;
        }
        self
    }
}

/// Infinite procedural height field.
///
/// Owns its sector cache; independent instances never share hills. The
/// cache is filled lazily through `&self` queries and is only ever emptied
/// by [`TerrainHeightField::clear_cache`].
#[derive(Debug)]
pub struct TerrainHeightField {
    config: TerrainConfig,
    cache: RefCell<HashMap<SectorCoord, Vec<Hill>>>,
}

impl TerrainHeightField {
    pub fn new(config: TerrainConfig) -> Self {
        Self {
            config: config.sanitized(),
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Sector containing world `(x, z)`.
    pub fn sector_of(&self, x: f32, z: f32) -> SectorCoord {
        let spacing = self.config.hill_spacing;
        ((x / spacing).floor() as i32, (z / spacing).floor() as i32)
    }

    /// Hills influencing a sector, generating them on first use.
    pub fn sector_hills(&self, sector: SectorCoord) -> Vec<Hill> {
        let mut cache = self.cache.borrow_mut();
        cache
            .entry(sector)
            .or_insert_with(|| generate_sector(&self.config, sector.0, sector.1))
            .clone()
    }

    /// Number of sectors currently cached.
    pub fn cached_sectors(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    /// Elevation at world `(x, z)`; zero where no hill contributes.
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        if !x.is_finite() || !z.is_finite() {
            return 0.0;
        }
        let sector = self.sector_of(x, z);
        let mut cache = self.cache.borrow_mut();
        let hills = cache
            .entry(sector)
            .or_insert_with(|| generate_sector(&self.config, sector.0, sector.1));
        hills.iter().map(|hill| hill.height_at(x, z)).sum()
    }
}

impl GroundHeight for TerrainHeightField {
    fn height_at(&self, x: f32, z: f32) -> f32 {
        TerrainHeightField::height_at(self, x, z)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn test_height_deterministic_across_cache_clear() {
        let field = TerrainHeightField::new(TerrainConfig::default());
        let samples: Vec<(f32, f32)> = (0..50)
            .map(|i| (i as f32 * 137.0 - 3000.0, i as f32 * -91.0 + 1500.0))
            .collect();
        let first: Vec<f32> = samples.iter().map(|&(x, z)| field.height_at(x, z)).collect();
        let second: Vec<f32> = samples.iter().map(|&(x, z)| field.height_at(x, z)).collect();
        assert_eq!(first, second, "Repeated queries should be identical");

        field.clear_cache();
        assert_eq!(field.cached_sectors(), 0);
        let third: Vec<f32> = samples.iter().map(|&(x, z)| field.height_at(x, z)).collect();
        assert_eq!(first, third, "Regenerated sectors should be identical");
    }

    #[test]
    fn test_sector_hills_identical_across_instances() {
        let a = TerrainHeightField::new(TerrainConfig::default());
        let b = TerrainHeightField::new(TerrainConfig::default());
        assert_eq!(a.sector_hills((3, -8)), b.sector_hills((3, -8)));
        a.clear_cache();
        assert_eq!(a.sector_hills((3, -8)), b.sector_hills((3, -8)));
    }

    #[test]
    fn test_independent_caches() {
        let a = TerrainHeightField::new(TerrainConfig::default());
        let b = TerrainHeightField::new(TerrainConfig::default());
        a.height_at(10.0, 10.0);
        assert_eq!(a.cached_sectors(), 1);
        assert_eq!(b.cached_sectors(), 0);
    }

    #[test]
    fn test_sector_of_negative_coordinates() {
        let field = TerrainHeightField::new(TerrainConfig::default());
        assert_eq!(field.sector_of(10.0, 10.0), (0, 0));
        assert_eq!(field.sector_of(-10.0, 10.0), (-1, 0));
        assert_eq!(field.sector_of(-1000.0, -1000.5), (-1, -2));
    }

    #[test]
    fn test_flat_config_is_zero_everywhere() {
        let field = TerrainHeightField::new(TerrainConfig::flat());
        for &(x, z) in &[(0.0, 0.0), (512.0, -77.0), (-9000.0, 4000.0)] {
            assert_eq!(field.height_at(x, z), 0.0);
        }
        let n = GroundHeight::normal_at(&field, Vec3::new(5.0, 0.0, 5.0), 1.0);
        assert_eq!(n, Vec3::Y);
    }

    #[test]
    fn test_heights_non_negative_and_bounded() {
        let field = TerrainHeightField::new(TerrainConfig::default());
        // At most 9 hills overlap, each at most max_peak tall
        let ceiling = 9.0 * field.config().max_peak;
        for i in 0..200 {
            let x = (i as f32) * 53.0 - 5000.0;
            let z = (i as f32) * 29.0 - 2000.0;
            let h = field.height_at(x, z);
            assert!(h >= 0.0 && h <= ceiling, "height {h} at ({x}, {z})");
        }
    }

    #[test]
    fn test_normal_points_up_and_unit() {
        let field = TerrainHeightField::new(TerrainConfig::default());
        for i in 0..50 {
            let pos = Vec3::new(i as f32 * 211.0, 0.0, i as f32 * -97.0);
            let n = field.normal_at(pos, 2.0);
            assert!(n.y > 0.0, "normal {n} should point up");
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_sanitize_rejects_bad_ranges() {
        let config = TerrainConfig {
            hill_spacing: 0.0,
            spawn_chance: 3.0,
            min_radius: 500.0,
            max_radius: 100.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.hill_spacing, HILL_SPACING);
        assert_eq!(config.spawn_chance, 1.0);
        assert_eq!(config.min_radius, HILL_MIN_RADIUS);
    }
}
