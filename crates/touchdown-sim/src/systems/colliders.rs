//! Keeps the vehicle's collider entity on the vehicle.

use hecs::{Entity, World};

use touchdown_core::types::Aabb;

use crate::vehicle::PointMassVehicle;
use crate::world_setup::vehicle_bounds;

/// Move the collider entity to the vehicle's current position.
pub fn sync_vehicle(world: &mut World, collider: Entity, vehicle: &PointMassVehicle) {
    if let Ok(mut bounds) = world.get::<&mut Aabb>(collider) {
        *bounds = vehicle_bounds(vehicle);
    }
}
