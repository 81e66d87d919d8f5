//! Horizontal guidance.
//!
//! Velocity-based: the remaining offset to the target sets a desired
//! horizontal velocity, and one PID per local axis turns the velocity error
//! into a tilt command.

use glam::{Quat, Vec2, Vec3};

use crate::config::AutopilotConfig;
use crate::pid::PidController;

/// Desired world horizontal velocity (x, z) toward the target.
///
/// Magnitude is `min(distance * gain, max_speed)`; zero when already over
/// the target.
pub fn desired_velocity(offset: Vec2, gain: f32, max_speed: f32) -> Vec2 {
    let distance = offset.length();
    if distance < 1e-3 || !distance.is_finite() {
        return Vec2::ZERO;
    }
    offset / distance * (distance * gain).min(max_speed)
}

/// Project a world horizontal vector (x, z) into the vehicle frame.
fn to_local(rotation: Quat, world: Vec2) -> Vec2 {
    let local = rotation.inverse() * Vec3::new(world.x, 0.0, world.y);
    Vec2::new(local.x, local.z)
}

/// Tilt output of one guidance step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LateralCommand {
    /// Lateral (x) and longitudinal (z) tilt in the vehicle frame.
    pub tilt: Vec2,
    /// The deceleration override replaced the PID output.
    pub decelerating: bool,
}

/// Per-axis velocity loops.
#[derive(Debug, Clone, PartialEq)]
pub struct LateralController {
    x: PidController,
    z: PidController,
}

impl LateralController {
    pub fn new(config: &AutopilotConfig) -> Self {
        Self {
            x: config.horizontal_gains.controller(),
            z: config.horizontal_gains.controller(),
        }
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.z.reset();
    }

    /// Steer toward `offset` (target minus vehicle, world x/z).
    ///
    /// If the vehicle is moving away from the target faster than
    /// `moving_away_speed`, or the velocity error exceeds
    /// `extreme_velocity_error`, the output is a pure deceleration against
    /// the current velocity instead.
    pub fn move_towards_target(
        &mut self,
        offset: Vec2,
        velocity: Vec3,
        rotation: Quat,
        max_speed: f32,
        config: &AutopilotConfig,
        dt: f32,
    ) -> LateralCommand {
        let horizontal = Vec2::new(velocity.x, velocity.z);
        let speed = horizontal.length();
        let desired = desired_velocity(offset, config.approach_speed_gain, max_speed);

        let moving_away = speed > config.moving_away_speed
            && offset.length() > 1e-3
            && horizontal.dot(offset) < 0.0;
        let extreme = (desired - horizontal).length() > config.extreme_velocity_error;

        if moving_away || extreme {
            self.reset();
            let brake = (speed / config.deceleration_full_speed).min(1.0);
            let direction = to_local(rotation, horizontal).normalize_or_zero();
            return LateralCommand {
                tilt: -direction * brake,
                decelerating: true,
            };
        }

        let desired_local = to_local(rotation, desired);
        let actual_local = to_local(rotation, horizontal);
        let tilt = Vec2::new(
            self.x.update(desired_local.x, actual_local.x, dt),
            self.z.update(desired_local.y, actual_local.y, dt),
        );
        LateralCommand {
            tilt: tilt.clamp(Vec2::NEG_ONE, Vec2::ONE),
            decelerating: false,
        }
    }
}
