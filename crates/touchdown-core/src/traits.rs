//! Collaborator interfaces.
//!
//! The landing subsystem never integrates physics or owns scene geometry.
//! It reads terrain, obstacles and vehicle state through these traits and
//! writes actuator commands back through [`Vehicle`].

use glam::{Quat, Vec2, Vec3};

use crate::types::{BodyId, LandingSite, ObstacleHit};

/// Ground elevation over the horizontal plane.
pub trait GroundHeight {
    /// Terrain height at world `(x, z)`.
    fn height_at(&self, x: f32, z: f32) -> f32;

    /// Unit surface normal from central differences at `±sample_distance`.
    ///
    /// The vertical component is never negative; degenerate input yields up.
    fn normal_at(&self, pos: Vec3, sample_distance: f32) -> Vec3 {
        let d = sample_distance.abs();
        if d <= f32::EPSILON {
            return Vec3::Y;
        }
        let h_left = self.height_at(pos.x - d, pos.z);
        let h_right = self.height_at(pos.x + d, pos.z);
        let h_back = self.height_at(pos.x, pos.z - d);
        let h_front = self.height_at(pos.x, pos.z + d);

        let tangent_x = Vec3::new(2.0 * d, h_right - h_left, 0.0);
        let tangent_z = Vec3::new(0.0, h_front - h_back, 2.0 * d);
        let mut normal = tangent_z.cross(tangent_x);
        if normal.y < 0.0 {
            normal = -normal;
        }
        LandingSite::sanitize_normal(normal)
    }
}

/// Constant-height ground.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlatGround {
    pub height: f32,
}

impl GroundHeight for FlatGround {
    fn height_at(&self, _x: f32, _z: f32) -> f32 {
        self.height
    }
}

/// Overlap queries against scene colliders.
///
/// Implementations return at most `max_results` hits in no particular order.
pub trait ObstacleQuery {
    fn overlap_capsule(
        &self,
        a: Vec3,
        b: Vec3,
        radius: f32,
        max_results: usize,
    ) -> Vec<ObstacleHit>;

    fn overlap_sphere(&self, center: Vec3, radius: f32, max_results: usize) -> Vec<ObstacleHit>;
}

/// The controlled vehicle as seen by the autopilot.
///
/// Local frame: +Y is the thrust axis, +Z longitudinal, +X lateral.
/// Engines 0..4 sit at (-X,+Z), (+X,+Z), (-X,-Z), (+X,-Z).
pub trait Vehicle {
    /// Body used to exclude the vehicle's own colliders from queries.
    fn body_id(&self) -> BodyId;

    fn position(&self) -> Vec3;
    fn velocity(&self) -> Vec3;
    /// World-space angular velocity (rad/s).
    fn angular_velocity(&self) -> Vec3;
    fn rotation(&self) -> Quat;

    fn engine_count(&self) -> usize;
    fn engine_thrust(&self, index: usize) -> f32;
    /// Set an engine's thrust fraction; callers clamp to `[0, 1]`.
    fn set_engine_thrust(&mut self, index: usize, fraction: f32);
    /// Desired lateral/longitudinal tilt, each axis in `[-1, 1]`.
    fn set_tilt(&mut self, tilt: Vec2);

    fn mass(&self) -> f32;
    /// Gravity magnitude (m/s², positive).
    fn gravity(&self) -> f32;
    /// Maximum thrust force of a single engine (N).
    fn max_engine_thrust(&self) -> f32;

    /// Arm/disarm signal; the vehicle may suppress manual input while armed.
    fn set_autopilot_armed(&mut self, armed: bool);

    fn up(&self) -> Vec3 {
        self.rotation() * Vec3::Y
    }

    fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::Z
    }

    fn right(&self) -> Vec3 {
        self.rotation() * Vec3::X
    }

    /// Rotate a world-space vector into the vehicle frame.
    fn to_local(&self, world: Vec3) -> Vec3 {
        self.rotation().inverse() * world
    }

    /// Total thrust over weight. Zero when weight is not positive.
    fn max_twr(&self) -> f32 {
        let weight = self.mass() * self.gravity();
        if weight <= 0.0 || !weight.is_finite() {
            return 0.0;
        }
        self.engine_count() as f32 * self.max_engine_thrust() / weight
    }

    /// Thrust fraction that balances gravity.
    fn hover_thrust(&self) -> f32 {
        let twr = self.max_twr();
        if twr <= 0.0 {
            1.0
        } else {
            (1.0 / twr).clamp(0.0, 1.0)
        }
    }
}

/// Source of ranked landing sites for the autopilot.
pub trait SiteProvider {
    /// Live ranked sites, best first.
    fn ranked_sites(&self) -> &[LandingSite];

    /// Whether the current result set has been presented.
    fn results_presented(&self) -> bool;

    /// Terrain height under the vehicle at the last update.
    fn ground_height_below(&self) -> f32;
}
