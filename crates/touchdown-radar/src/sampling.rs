//! Candidate point generation.
//!
//! Each strategy produces ground points within `scan_radius` of the
//! vehicle's ground projection. [`Sampler::generate`] sorts them nearest
//! first so the closest candidates are evaluated first.
//!
//! The grid strategies snap to a world-aligned lattice, so successive
//! scans from nearby positions regenerate identical points.

use std::collections::HashMap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use touchdown_core::enums::SamplingStrategyKind;

use crate::config::ScannerConfig;
use crate::evaluation::ScanContext;
use crate::obstacles::obstacles_near;

/// A point-generation strategy.
pub trait SamplePoints {
    fn sample(&self, center: Vec2, ctx: &ScanContext, config: &ScannerConfig) -> Vec<Vec2>;
}

/// Strategy chosen at scanner construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sampler {
    Grid(GridSampler),
    PoissonDisk(PoissonDiskSampler),
    ObstacleAwareGrid(ObstacleAwareGridSampler),
}

impl Sampler {
    pub fn from_config(config: &ScannerConfig) -> Self {
        match config.strategy {
            SamplingStrategyKind::Grid => Sampler::Grid(GridSampler),
            SamplingStrategyKind::PoissonDisk => Sampler::PoissonDisk(PoissonDiskSampler {
                seed: config.poisson_seed,
                attempts_per_point: config.poisson_attempts_per_point,
            }),
            SamplingStrategyKind::ObstacleAwareGrid => {
                Sampler::ObstacleAwareGrid(ObstacleAwareGridSampler {
                    coarse_factor: config.coarse_factor,
                    inflation: config.coarse_inflation,
                })
            }
        }
    }

    pub fn kind(&self) -> SamplingStrategyKind {
        match self {
            Sampler::Grid(_) => SamplingStrategyKind::Grid,
            Sampler::PoissonDisk(_) => SamplingStrategyKind::PoissonDisk,
            Sampler::ObstacleAwareGrid(_) => SamplingStrategyKind::ObstacleAwareGrid,
        }
    }

    /// Generate points around the vehicle, nearest first.
    pub fn generate(&self, ctx: &ScanContext, config: &ScannerConfig) -> Vec<Vec2> {
        let center = ctx.ground_center();
        let mut points = match self {
            Sampler::Grid(s) => s.sample(center, ctx, config),
            Sampler::PoissonDisk(s) => s.sample(center, ctx, config),
            Sampler::ObstacleAwareGrid(s) => s.sample(center, ctx, config),
        };
        sort_by_distance(&mut points, center);
        points
    }
}

/// Sort ascending by distance from `center`.
pub fn sort_by_distance(points: &mut [Vec2], center: Vec2) {
    points.sort_by(|a, b| {
        a.distance_squared(center)
            .total_cmp(&b.distance_squared(center))
    });
}

/// World-aligned lattice points within `radius` of `center`.
fn lattice_points(center: Vec2, radius: f32, spacing: f32) -> Vec<Vec2> {
    let min_x = ((center.x - radius) / spacing).floor() as i64;
    let max_x = ((center.x + radius) / spacing).ceil() as i64;
    let min_z = ((center.y - radius) / spacing).floor() as i64;
    let max_z = ((center.y + radius) / spacing).ceil() as i64;
    let radius_sq = radius * radius;

    let mut points = Vec::new();
    for iz in min_z..=max_z {
        for ix in min_x..=max_x {
            let p = Vec2::new(ix as f32 * spacing, iz as f32 * spacing);
            if p.distance_squared(center) <= radius_sq {
                points.push(p);
            }
        }
    }
    points
}

/// Regular lattice at `grid_resolution`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GridSampler;

impl SamplePoints for GridSampler {
    fn sample(&self, center: Vec2, _ctx: &ScanContext, config: &ScannerConfig) -> Vec<Vec2> {
        lattice_points(center, config.scan_radius, config.grid_resolution)
    }
}

/// Dart throwing with a background grid (Bridson). No two points are
/// closer than `grid_resolution`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoissonDiskSampler {
    pub seed: u64,
    pub attempts_per_point: u32,
}

impl SamplePoints for PoissonDiskSampler {
    fn sample(&self, center: Vec2, _ctx: &ScanContext, config: &ScannerConfig) -> Vec<Vec2> {
        let radius = config.scan_radius;
        let min_dist = config.grid_resolution;
        let cell = min_dist / std::f32::consts::SQRT_2;
        let dim = ((2.0 * radius) / cell).ceil() as usize + 1;
        let origin = center - Vec2::splat(radius);

        let cell_of = |p: Vec2| -> (usize, usize) {
            let cx = ((p.x - origin.x) / cell).floor().max(0.0) as usize;
            let cz = ((p.y - origin.y) / cell).floor().max(0.0) as usize;
            (cx.min(dim - 1), cz.min(dim - 1))
        };

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut grid: Vec<Option<usize>> = vec![None; dim * dim];
        let mut points = vec![center];
        let mut active = vec![0usize];
        let (cx, cz) = cell_of(center);
        grid[cz * dim + cx] = Some(0);

        let min_dist_sq = min_dist * min_dist;
        while !active.is_empty() {
            let slot = rng.gen_range(0..active.len());
            let base = points[active[slot]];
            let mut accepted = false;

            for _ in 0..self.attempts_per_point {
                let angle = rng.gen_range(0.0..std::f32::consts::TAU);
                let dist = rng.gen_range(min_dist..2.0 * min_dist);
                let candidate = base + Vec2::from_angle(angle) * dist;
                if candidate.distance(center) > radius {
                    continue;
                }

                let (gx, gz) = cell_of(candidate);
                let x0 = gx.saturating_sub(2);
                let z0 = gz.saturating_sub(2);
                let x1 = (gx + 2).min(dim - 1);
                let z1 = (gz + 2).min(dim - 1);
                let crowded = (z0..=z1).any(|z| {
                    (x0..=x1).any(|x| {
                        grid[z * dim + x]
                            .is_some_and(|i| points[i].distance_squared(candidate) < min_dist_sq)
                    })
                });
                if crowded {
                    continue;
                }

                let index = points.len();
                points.push(candidate);
                active.push(index);
                grid[gz * dim + gx] = Some(index);
                accepted = true;
                break;
            }

            if !accepted {
                active.swap_remove(slot);
            }
        }
        points
    }
}

/// Lattice with coarse cells near obstacles skipped entirely.
///
/// Each coarse cell is tested once with a broad capsule query sized to the
/// cell's half-diagonal times `inflation`; cells with any valid obstacle are
/// excluded before the fine lattice is emitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleAwareGridSampler {
    pub coarse_factor: u32,
    pub inflation: f32,
}

impl SamplePoints for ObstacleAwareGridSampler {
    fn sample(&self, center: Vec2, ctx: &ScanContext, config: &ScannerConfig) -> Vec<Vec2> {
        let coarse = config.grid_resolution * self.coarse_factor.max(1) as f32;
        let query_radius = coarse * std::f32::consts::FRAC_1_SQRT_2 * self.inflation;
        let mut blocked: HashMap<(i64, i64), bool> = HashMap::new();

        lattice_points(center, config.scan_radius, config.grid_resolution)
            .into_iter()
            .filter(|p| {
                let key = (
                    (p.x / coarse).floor() as i64,
                    (p.y / coarse).floor() as i64,
                );
                let is_blocked = *blocked.entry(key).or_insert_with(|| {
                    let cell_center = Vec2::new(
                        (key.0 as f32 + 0.5) * coarse,
                        (key.1 as f32 + 0.5) * coarse,
                    );
                    let ground = ctx.terrain.height_at(cell_center.x, cell_center.y);
                    !obstacles_near(cell_center, ground, query_radius, ctx, config).is_empty()
                });
                !is_blocked
            })
            .collect()
    }
}
