//! Spawn factories for the obstacle world.

use glam::{Vec2, Vec3};
use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use touchdown_core::constants::*;
use touchdown_core::traits::GroundHeight;
use touchdown_core::types::Aabb;

use crate::obstacle_world::ObstacleBody;
use crate::vehicle::PointMassVehicle;

/// Rock field placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RockField {
    pub center: Vec2,
    pub count: usize,
    pub radius: f32,
    /// No rock is placed closer than this to `center`.
    pub clear_radius: f32,
}

/// Scatter `field.count` rocks named `Rock_<i>`, each resting on the
/// terrain. Positions are uniform over the annulus between the clear
/// radius and the field radius.
pub fn spawn_rocks(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    terrain: &dyn GroundHeight,
    field: &RockField,
) -> Vec<hecs::Entity> {
    let inner = field.clear_radius.max(0.0);
    let outer = field.radius.max(inner + 1.0);
    (0..field.count)
        .map(|i| {
            let angle: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
            let r2: f32 = rng.gen_range(inner * inner..outer * outer);
            let ground = field.center + Vec2::from_angle(angle) * r2.sqrt();
            let half_width = rng.gen_range(ROCK_MIN_HALF_WIDTH..ROCK_MAX_HALF_WIDTH);
            let height = rng.gen_range(ROCK_MIN_HEIGHT..ROCK_MAX_HEIGHT);
            spawn_rock(world, terrain, format!("Rock_{i}"), ground, half_width, height)
        })
        .collect()
}

/// Spawn a single box-shaped rock standing on the terrain at `ground`.
pub fn spawn_rock(
    world: &mut World,
    terrain: &dyn GroundHeight,
    name: String,
    ground: Vec2,
    half_width: f32,
    height: f32,
) -> hecs::Entity {
    let base = terrain.height_at(ground.x, ground.y);
    let center = Vec3::new(ground.x, base + height * 0.5, ground.y);
    let bounds =
        Aabb::from_center_half_extents(center, Vec3::new(half_width, height * 0.5, half_width));
    world.spawn((ObstacleBody::new(name), bounds))
}

/// The vehicle's own collider, owned by its body so the scanner skips it.
pub fn spawn_vehicle_collider(world: &mut World, vehicle: &PointMassVehicle) -> hecs::Entity {
    world.spawn((
        ObstacleBody::owned_by("LanderHull", vehicle.body),
        vehicle_bounds(vehicle),
    ))
}

/// Collider bounds for the vehicle at its current position.
pub fn vehicle_bounds(vehicle: &PointMassVehicle) -> Aabb {
    let half = vehicle.params.collider_half_extents;
    Aabb::from_center_half_extents(vehicle.position + Vec3::Y * half.y, half)
}
