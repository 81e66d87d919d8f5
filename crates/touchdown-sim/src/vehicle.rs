//! Point-mass lander used by the headless simulation.
//!
//! Rigid-body rotation with a diagonal inertia tensor, thrust along the
//! body up axis, and the tilt command modelled directly as a lateral
//! acceleration in the vehicle frame. Integration lives in
//! `systems::dynamics`.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use touchdown_core::constants::*;
use touchdown_core::traits::Vehicle;
use touchdown_core::types::BodyId;

/// Physical parameters of the simulated vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleParams {
    pub mass: f32,
    pub gravity: f32,
    pub engine_count: usize,
    /// Per-engine maximum thrust (N).
    pub engine_max_thrust: f32,
    pub arm_length: f32,
    pub inertia: Vec3,
    pub yaw_torque_factor: f32,
    /// Lateral acceleration at full tilt (m/s²).
    pub tilt_acceleration: f32,
    pub angular_damping: f32,
    pub collider_half_extents: Vec3,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            mass: VEHICLE_MASS,
            gravity: STANDARD_GRAVITY,
            engine_count: VEHICLE_ENGINE_COUNT,
            engine_max_thrust: VEHICLE_ENGINE_THRUST,
            arm_length: VEHICLE_ARM_LENGTH,
            inertia: Vec3::from_array(VEHICLE_INERTIA),
            yaw_torque_factor: VEHICLE_YAW_TORQUE_FACTOR,
            tilt_acceleration: VEHICLE_TILT_ACCELERATION,
            angular_damping: VEHICLE_ANGULAR_DAMPING,
            collider_half_extents: Vec3::from_array(VEHICLE_COLLIDER_HALF_EXTENTS),
        }
    }
}

/// The simulated lander. `position` is the point between the feet.
#[derive(Debug, Clone)]
pub struct PointMassVehicle {
    pub body: BodyId,
    pub params: VehicleParams,
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation: Quat,
    /// World-space angular velocity.
    pub angular_velocity: Vec3,
    pub engines: Vec<f32>,
    pub tilt: Vec2,
    pub armed: bool,
    pub grounded: bool,
}

impl PointMassVehicle {
    pub fn new(body: BodyId, params: VehicleParams, position: Vec3, velocity: Vec3) -> Self {
        let engines = vec![0.0; params.engine_count];
        Self {
            body,
            params,
            position,
            velocity,
            rotation: Quat::IDENTITY,
            angular_velocity: Vec3::ZERO,
            engines,
            tilt: Vec2::ZERO,
            armed: false,
            grounded: false,
        }
    }
}

impl Vehicle for PointMassVehicle {
    fn body_id(&self) -> BodyId {
        self.body
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn engine_count(&self) -> usize {
        self.engines.len()
    }

    fn engine_thrust(&self, index: usize) -> f32 {
        self.engines.get(index).copied().unwrap_or(0.0)
    }

    fn set_engine_thrust(&mut self, index: usize, fraction: f32) {
        if let Some(engine) = self.engines.get_mut(index) {
            *engine = if fraction.is_finite() {
                fraction.clamp(0.0, 1.0)
            } else {
                0.0
            };
        }
    }

    fn set_tilt(&mut self, tilt: Vec2) {
        self.tilt = if tilt.is_finite() {
            tilt.clamp(Vec2::NEG_ONE, Vec2::ONE)
        } else {
            Vec2::ZERO
        };
    }

    fn mass(&self) -> f32 {
        self.params.mass
    }

    fn gravity(&self) -> f32 {
        self.params.gravity
    }

    fn max_engine_thrust(&self) -> f32 {
        self.params.engine_max_thrust
    }

    fn set_autopilot_armed(&mut self, armed: bool) {
        self.armed = armed;
    }
}
