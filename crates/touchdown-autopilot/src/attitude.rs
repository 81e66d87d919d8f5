//! Orientation control: surface-normal alignment and rotation damping.
//!
//! Both produce an [`AttitudeSignal`], a torque request in the vehicle
//! frame that the mixer turns into differential engine thrust.

use glam::{Quat, Vec2, Vec3};

use touchdown_core::types::LandingSite;

use crate::config::AutopilotConfig;
use crate::pid::PidController;

/// Torque request about the vehicle axes: roll about local Z, pitch about
/// local X, yaw about local Y (the thrust axis).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AttitudeSignal {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl AttitudeSignal {
    /// From a local-frame torque vector.
    pub fn from_local(v: Vec3) -> Self {
        Self {
            roll: v.z,
            pitch: v.x,
            yaw: v.y,
        }
    }

    /// Tilt toward the side the thrust axis is being rotated to.
    pub fn tilt_bias(&self, gain: f32) -> Vec2 {
        Vec2::new(-self.roll, self.pitch) * gain
    }

    pub fn is_finite(&self) -> bool {
        self.roll.is_finite() && self.pitch.is_finite() && self.yaw.is_finite()
    }
}

fn damping(pids: &mut [PidController; 3], angular_velocity: Vec3, dt: f32) -> Vec3 {
    Vec3::new(
        pids[0].update(0.0, angular_velocity.x, dt),
        pids[1].update(0.0, angular_velocity.y, dt),
        pids[2].update(0.0, angular_velocity.z, dt),
    )
}

/// Alignment and stabilization loops, one PID per local axis each.
#[derive(Debug, Clone, PartialEq)]
pub struct AttitudeController {
    alignment: [PidController; 3],
    stabilization: [PidController; 3],
}

impl AttitudeController {
    pub fn new(config: &AutopilotConfig) -> Self {
        let a = config.alignment_gains.controller();
        let s = config.stabilization_gains.controller();
        Self {
            alignment: [a.clone(), a.clone(), a],
            stabilization: [s.clone(), s.clone(), s],
        }
    }

    pub fn reset(&mut self) {
        for pid in self.alignment.iter_mut().chain(self.stabilization.iter_mut()) {
            pid.reset();
        }
    }

    /// Rotate the thrust axis toward the site normal.
    ///
    /// Returns `None` when already within `alignment_tolerance_deg`.
    /// `angular_velocity` is in the vehicle frame.
    pub fn align_to_surface_normal(
        &mut self,
        up: Vec3,
        normal: Vec3,
        rotation: Quat,
        angular_velocity: Vec3,
        config: &AutopilotConfig,
        dt: f32,
    ) -> Option<AttitudeSignal> {
        let up = up.normalize_or_zero();
        if up == Vec3::ZERO || !up.is_finite() {
            return None;
        }
        let normal = LandingSite::sanitize_normal(normal);
        let angle = up.dot(normal).clamp(-1.0, 1.0).acos();
        if angle.to_degrees() <= config.alignment_tolerance_deg {
            return None;
        }

        let axis = up.cross(normal);
        let axis = if axis.length_squared() > 1e-12 {
            axis.normalize()
        } else {
            up.any_orthonormal_vector()
        };
        let correction = (rotation.inverse() * axis) * angle * config.alignment_gain;
        let signal = AttitudeSignal::from_local(
            correction + damping(&mut self.alignment, angular_velocity, dt),
        );
        signal.is_finite().then_some(signal)
    }

    /// Damp residual rotation. `None` when the rate is negligible.
    pub fn stabilize_rotation(
        &mut self,
        angular_velocity: Vec3,
        config: &AutopilotConfig,
        dt: f32,
    ) -> Option<AttitudeSignal> {
        if !angular_velocity.is_finite()
            || angular_velocity.length() < config.angular_velocity_epsilon
        {
            return None;
        }
        Some(AttitudeSignal::from_local(damping(
            &mut self.stabilization,
            angular_velocity,
            dt,
        )))
    }
}
