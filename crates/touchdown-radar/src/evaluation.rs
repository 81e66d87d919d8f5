//! Per-point site evaluation.
//!
//! An ordered rejection pipeline; the first failing check decides the
//! outcome and later checks never run:
//!
//! 1. obstacle standing on the point (optional early check)
//! 2. flatness (height standard deviation)
//! 3. slope (steepest cardinal direction)
//! 4. usable radius
//! 5. obstacle inside the site disk
//! 6. obstacle closer than the strict clearance

use glam::{Vec2, Vec3};

use touchdown_core::enums::RejectReason;
use touchdown_core::traits::{GroundHeight, ObstacleQuery};
use touchdown_core::types::{BodyId, LandingSite};

use crate::config::ScannerConfig;
use crate::obstacles::{any_obstacle_within, nearest_obstacle_distance};
use crate::scoring::{suitability_score, SiteMetrics};

/// Collaborators and vehicle state for one scanner update.
#[derive(Clone, Copy)]
pub struct ScanContext<'a> {
    pub terrain: &'a dyn GroundHeight,
    pub obstacles: &'a dyn ObstacleQuery,
    pub vehicle_position: Vec3,
    /// The vehicle's own body, excluded from obstacle checks.
    pub vehicle_body: Option<BodyId>,
}

impl ScanContext<'_> {
    /// The vehicle's ground projection (x, z).
    pub fn ground_center(&self) -> Vec2 {
        Vec2::new(self.vehicle_position.x, self.vehicle_position.z)
    }
}

/// `count` points evenly spaced on a circle.
pub fn ring_points(center: Vec2, radius: f32, count: usize) -> impl Iterator<Item = Vec2> {
    let step = std::f32::consts::TAU / count.max(1) as f32;
    (0..count).map(move |i| center + Vec2::from_angle(i as f32 * step) * radius)
}

/// Population standard deviation of the center height and a ring of
/// samples around it.
pub fn height_deviation(
    point: Vec2,
    center_height: f32,
    terrain: &dyn GroundHeight,
    radius: f32,
    samples: usize,
) -> f32 {
    let mut heights = Vec::with_capacity(samples + 1);
    heights.push(center_height);
    heights.extend(ring_points(point, radius, samples).map(|p| terrain.height_at(p.x, p.y)));

    let n = heights.len() as f32;
    let mean = heights.iter().sum::<f32>() / n;
    let variance = heights.iter().map(|h| (h - mean) * (h - mean)).sum::<f32>() / n;
    variance.sqrt()
}

/// Steepest slope (degrees) over the four cardinal directions.
pub fn max_slope_deg(
    point: Vec2,
    center_height: f32,
    terrain: &dyn GroundHeight,
    sample_distance: f32,
) -> f32 {
    const DIRECTIONS: [Vec2; 4] = [Vec2::X, Vec2::NEG_X, Vec2::Y, Vec2::NEG_Y];
    DIRECTIONS
        .iter()
        .map(|dir| {
            let p = point + *dir * sample_distance;
            let delta = terrain.height_at(p.x, p.y) - center_height;
            delta.abs().atan2(sample_distance).to_degrees()
        })
        .fold(0.0, f32::max)
}

/// Grow the site radius from the minimum until the ring stops being flat
/// enough or an obstacle intrudes. Returns the largest passing radius.
pub fn measure_site_size(
    point: Vec2,
    center_height: f32,
    ctx: &ScanContext,
    config: &ScannerConfig,
) -> Option<f32> {
    let mut best = None;
    let mut radius = config.min_site_size;
    while radius <= config.max_site_size + 1e-3 {
        let within = ring_points(point, radius, config.size_ring_samples)
            .filter(|p| {
                (ctx.terrain.height_at(p.x, p.y) - center_height).abs()
                    <= config.max_flatness_deviation
            })
            .count();
        let fraction = within as f32 / config.size_ring_samples as f32;
        if fraction < config.size_min_valid_fraction
            || any_obstacle_within(point, center_height, radius, ctx, config)
        {
            break;
        }
        best = Some(radius);
        radius += config.size_step;
    }
    best
}

/// Evaluate a ground point, returning a scored site or the first reason
/// it failed.
pub fn evaluate_site(
    point: Vec2,
    ctx: &ScanContext,
    config: &ScannerConfig,
) -> Result<LandingSite, RejectReason> {
    let terrain = ctx.terrain;
    let ground = terrain.height_at(point.x, point.y);

    if config.early_obstacle_check
        && any_obstacle_within(point, ground, config.early_obstacle_radius, ctx, config)
    {
        return Err(RejectReason::ObstacleAtCenter);
    }

    let flatness = height_deviation(
        point,
        ground,
        terrain,
        config.flatness_sample_radius,
        config.flatness_samples,
    );
    if !(flatness <= config.max_flatness_deviation) {
        return Err(RejectReason::TooRough);
    }

    let slope_deg = max_slope_deg(point, ground, terrain, config.slope_sample_distance);
    if !(slope_deg <= config.max_slope_deg) {
        return Err(RejectReason::TooSteep);
    }

    let size = measure_site_size(point, ground, ctx, config).ok_or(RejectReason::TooSmall)?;

    let search_radius = config.obstacle_search_radius.max(size);
    let clearance = nearest_obstacle_distance(point, ground, search_radius, ctx, config);
    if let Some(distance) = clearance {
        // Size growth already stops at intruding obstacles; this fires only
        // when the broad phase reports a body to the wide query that the
        // narrower growth queries missed.
        if distance < size {
            return Err(RejectReason::ObstacleInside);
        }
        let strict = config.strict_clearance_fraction * config.min_obstacle_clearance;
        if distance < config.min_obstacle_clearance && distance < strict {
            return Err(RejectReason::ObstacleTooClose);
        }
    }

    let metrics = SiteMetrics {
        flatness,
        slope_deg,
        size,
        clearance,
    };
    let position = Vec3::new(point.x, ground, point.y);

    Ok(LandingSite {
        position,
        suitability_score: suitability_score(&metrics, config),
        size,
        slope_angle: slope_deg,
        flatness,
        distance_to_obstacle: clearance.unwrap_or(search_radius),
        distance_from_ship: position.distance(ctx.vehicle_position),
        has_obstacles: clearance.is_some_and(|d| d < config.min_obstacle_clearance),
        surface_normal: terrain.normal_at(position, config.slope_sample_distance),
    })
}
