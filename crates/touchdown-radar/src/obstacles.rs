//! Obstacle filtering and clearance queries.
//!
//! All queries share one reference height: the terrain height at the
//! candidate point. Each sweeps a vertical capsule from that height up to
//! `obstacle_check_height`.

use glam::{Vec2, Vec3};

use touchdown_core::traits::GroundHeight;
use touchdown_core::types::ObstacleHit;

use crate::config::ScannerConfig;
use crate::evaluation::ScanContext;

/// Whether a hit should count toward rejecting a site.
///
/// Excludes the vehicle's own colliders, ground-like names, colliders too
/// wide to be anything but ground, and bodies whose top does not sit in
/// `(obstacle_min_height, obstacle_check_height]` above the local terrain.
pub fn is_valid_obstacle(
    hit: &ObstacleHit,
    ctx: &ScanContext,
    config: &ScannerConfig,
) -> bool {
    if hit.owner.is_some() && hit.owner == ctx.vehicle_body {
        return false;
    }

    let name = hit.name.to_ascii_lowercase();
    if config
        .excluded_keywords
        .iter()
        .any(|keyword| name.contains(keyword.as_str()))
    {
        return false;
    }

    if hit.bounds.footprint() > config.max_obstacle_footprint {
        return false;
    }

    let center = hit.bounds.center();
    let ground = ctx.terrain.height_at(center.x, center.z);
    let height = hit.bounds.max.y - ground;
    height > config.obstacle_min_height && height <= config.obstacle_check_height
}

/// Valid obstacles within `radius` (horizontally) of `point`, each paired
/// with its horizontal distance to the point.
pub fn obstacles_near(
    point: Vec2,
    ground: f32,
    radius: f32,
    ctx: &ScanContext,
    config: &ScannerConfig,
) -> Vec<(ObstacleHit, f32)> {
    let bottom = Vec3::new(point.x, ground, point.y);
    let top = Vec3::new(point.x, ground + config.obstacle_check_height, point.y);
    ctx.obstacles
        .overlap_capsule(bottom, top, radius, config.max_query_results)
        .into_iter()
        .filter(|hit| is_valid_obstacle(hit, ctx, config))
        .map(|hit| {
            let distance = hit.bounds.horizontal_distance_to(point);
            (hit, distance)
        })
        .filter(|(_, distance)| *distance <= radius)
        .collect()
}

/// True if any valid obstacle footprint lies strictly within `radius`.
pub fn any_obstacle_within(
    point: Vec2,
    ground: f32,
    radius: f32,
    ctx: &ScanContext,
    config: &ScannerConfig,
) -> bool {
    obstacles_near(point, ground, radius, ctx, config)
        .iter()
        .any(|(_, distance)| *distance < radius)
}

/// Horizontal distance to the nearest valid obstacle within `radius`.
///
/// Overlap queries return at most `max_query_results` hits in no particular
/// order, so a crowded wide query can drop the closest body. The
/// `min_obstacle_clearance` disk is searched first and the full radius only
/// when that disk is empty.
pub fn nearest_obstacle_distance(
    point: Vec2,
    ground: f32,
    radius: f32,
    ctx: &ScanContext,
    config: &ScannerConfig,
) -> Option<f32> {
    let near_radius = config.min_obstacle_clearance.min(radius);
    nearest_within(point, ground, near_radius, ctx, config).or_else(|| {
        if radius > near_radius {
            nearest_within(point, ground, radius, ctx, config)
        } else {
            None
        }
    })
}

fn nearest_within(
    point: Vec2,
    ground: f32,
    radius: f32,
    ctx: &ScanContext,
    config: &ScannerConfig,
) -> Option<f32> {
    obstacles_near(point, ground, radius, ctx, config)
        .into_iter()
        .map(|(_, distance)| distance)
        .min_by(f32::total_cmp)
}
