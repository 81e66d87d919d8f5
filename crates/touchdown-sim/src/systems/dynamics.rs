//! Rigid-body integration for the simulated lander.
//!
//! Semi-implicit Euler: forces update velocity, then velocity updates
//! position. Torque comes from each engine's thrust acting at its arm
//! offset, plus a yaw reaction proportional to the diagonal thrust
//! imbalance. Ground contact clamps the vehicle onto the terrain.

use glam::{Quat, Vec3};

use touchdown_autopilot::mixer::ENGINE_LAYOUT;
use touchdown_core::traits::GroundHeight;

use crate::vehicle::PointMassVehicle;

/// Body-frame force and torque from the current engine commands.
pub fn engine_wrench(vehicle: &PointMassVehicle) -> (Vec3, Vec3) {
    let params = &vehicle.params;
    let mut force = Vec3::ZERO;
    let mut torque = Vec3::ZERO;
    for (index, fraction) in vehicle.engines.iter().enumerate() {
        let thrust = fraction.clamp(0.0, 1.0) * params.engine_max_thrust;
        force.y += thrust;
        // Engines beyond the quad layout sit on the thrust axis.
        if let Some(layout) = ENGINE_LAYOUT.get(index) {
            let arm = Vec3::new(layout.x, 0.0, layout.y) * params.arm_length;
            torque += arm.cross(Vec3::Y * thrust);
            torque.y -= layout.x * layout.y * thrust * params.yaw_torque_factor;
        }
    }
    (force, torque)
}

/// Advance the vehicle by `dt` seconds over `terrain`.
pub fn run(vehicle: &mut PointMassVehicle, terrain: &dyn GroundHeight, dt: f32) {
    if !(dt > 0.0) || !dt.is_finite() {
        return;
    }
    let params = vehicle.params.clone();
    let (force, torque) = engine_wrench(vehicle);
    let rotation = vehicle.rotation;

    let thrust = rotation * force / params.mass;
    let lateral =
        rotation * Vec3::new(vehicle.tilt.x, 0.0, vehicle.tilt.y) * params.tilt_acceleration;
    let acceleration = thrust + lateral - Vec3::Y * params.gravity;
    vehicle.velocity += acceleration * dt;
    vehicle.position += vehicle.velocity * dt;

    let mut omega = rotation.inverse() * vehicle.angular_velocity;
    omega += torque / params.inertia * dt;
    omega *= (1.0 - params.angular_damping * dt).max(0.0);
    vehicle.rotation = (rotation * Quat::from_scaled_axis(omega * dt)).normalize();
    vehicle.angular_velocity = vehicle.rotation * omega;

    let ground = terrain.height_at(vehicle.position.x, vehicle.position.z);
    vehicle.grounded = vehicle.position.y <= ground;
    if vehicle.grounded {
        vehicle.position.y = ground;
        vehicle.velocity = Vec3::new(0.0, vehicle.velocity.y.max(0.0), 0.0);
        vehicle.angular_velocity = Vec3::ZERO;
    }
}
