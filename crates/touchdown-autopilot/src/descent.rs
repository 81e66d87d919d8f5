//! Vertical-speed control: the height-based descent profile and the
//! thrust command that tracks it.

use crate::config::{AutopilotConfig, DescentProfile};
use crate::pid::PidController;

/// Braking deceleration available at `authority` of full thrust (m/s²).
/// Never negative.
pub fn braking_deceleration(max_twr: f32, gravity: f32, authority: f32) -> f32 {
    let a = (max_twr * authority - 1.0) * gravity;
    if a.is_finite() {
        a.max(0.0)
    } else {
        0.0
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Target fall speed (positive down) at `height` above the reference.
///
/// Above `braking_start_height` the speed is the one from which the vehicle
/// can still brake to `braking_speed` by that height:
/// `sqrt(braking_speed² + 2·a·(height - braking_start_height))`, capped at
/// `max_safe_fall_speed`. Below it the speed interpolates linearly down to
/// `slow_fall_speed` at `slow_fall_height` and `final_landing_speed` at 0.
pub fn target_fall_speed(height: f32, profile: &DescentProfile, max_twr: f32, gravity: f32) -> f32 {
    let p = profile;
    if !height.is_finite() {
        return p.final_landing_speed;
    }

    if height > p.braking_start_height {
        let a = braking_deceleration(max_twr, gravity, p.braking_authority);
        let distance = height - p.braking_start_height;
        let v = (p.braking_speed * p.braking_speed + 2.0 * a * distance).sqrt();
        if v > 0.0 && v.is_finite() {
            v.min(p.max_safe_fall_speed)
        } else {
            p.braking_speed
        }
    } else if height > p.slow_fall_height {
        let t = (height - p.slow_fall_height) / (p.braking_start_height - p.slow_fall_height);
        lerp(p.slow_fall_speed, p.braking_speed, t)
    } else {
        lerp(p.final_landing_speed, p.slow_fall_speed, height / p.slow_fall_height)
    }
}

/// Inputs to one fall-speed control step.
#[derive(Debug, Clone, Copy)]
pub struct FallSpeedInput {
    /// Height above the reference elevation.
    pub height: f32,
    /// World vertical velocity (positive up).
    pub vertical_velocity: f32,
    /// Thrust fraction balancing gravity along the current thrust axis.
    pub hover_thrust: f32,
    pub max_twr: f32,
    pub gravity: f32,
    /// Base thrust applied last step.
    pub current_thrust: f32,
}

/// Result of one fall-speed control step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallSpeedCommand {
    pub target_fall_speed: f32,
    /// Rate-limited base thrust in [0, 1].
    pub thrust: f32,
}

/// Speed above which the vehicle counts as climbing (m/s).
const ASCENT_THRESHOLD: f32 = 0.1;

/// Track the descent profile with the vertical PID.
///
/// Climbing cuts thrust so gravity arrests the climb; falling faster than
/// `emergency_speed_factor` times the target demands full thrust.
pub fn control_fall_speed(
    input: &FallSpeedInput,
    pid: &mut PidController,
    config: &AutopilotConfig,
    dt: f32,
) -> FallSpeedCommand {
    let target_speed =
        target_fall_speed(input.height, &config.descent, input.max_twr, input.gravity);
    let target_velocity = -target_speed;

    let mut correction = pid.update(target_velocity, input.vertical_velocity, dt);
    if (target_velocity - input.vertical_velocity).abs() > config.large_speed_error {
        correction *= config.large_speed_error_gain;
    }

    let fall_speed = -input.vertical_velocity;
    let desired = if input.vertical_velocity > ASCENT_THRESHOLD {
        0.0
    } else if fall_speed > target_speed * config.emergency_speed_factor {
        1.0
    } else {
        input.hover_thrust + correction
    };

    FallSpeedCommand {
        target_fall_speed: target_speed,
        thrust: rate_limit(input.current_thrust, desired, config.thrust_rate_limit * dt),
    }
}

/// Move `current` toward `desired` by at most `max_step`, clamped to [0, 1].
pub fn rate_limit(current: f32, desired: f32, max_step: f32) -> f32 {
    let current = if current.is_finite() { current } else { 0.0 };
    if !desired.is_finite() {
        return current.clamp(0.0, 1.0);
    }
    let step = max_step.max(0.0);
    (current + (desired - current).clamp(-step, step)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PidGains;

    const TWR: f32 = 2.0;
    const G: f32 = 9.81;

    #[test]
    fn test_breakpoints() {
        let p = DescentProfile::default();
        assert!((target_fall_speed(300.0, &p, TWR, G) - 10.0).abs() < 1e-5);
        assert!((target_fall_speed(100.0, &p, TWR, G) - 5.0).abs() < 1e-5);
        assert!((target_fall_speed(0.0, &p, TWR, G) - 3.0).abs() < 1e-5);
        assert!((target_fall_speed(200.0, &p, TWR, G) - 7.5).abs() < 1e-5);
    }

    #[test]
    fn test_physics_band_capped() {
        let p = DescentProfile::default();
        let a = braking_deceleration(TWR, G, p.braking_authority);
        let expected = (100.0_f32 + 2.0 * a * 200.0).sqrt();
        assert!((target_fall_speed(500.0, &p, TWR, G) - expected).abs() < 1e-3);
        assert_eq!(target_fall_speed(100_000.0, &p, TWR, G), p.max_safe_fall_speed);
    }

    #[test]
    fn test_weak_vehicle_falls_back_to_braking_speed() {
        let p = DescentProfile::default();
        // 1.05 * 0.9 < 1: no braking margin
        assert_eq!(braking_deceleration(1.05, G, p.braking_authority), 0.0);
        assert_eq!(target_fall_speed(800.0, &p, 1.05, G), p.braking_speed);
        assert_eq!(target_fall_speed(800.0, &p, f32::NAN, G), p.braking_speed);
    }

    #[test]
    fn test_below_reference_and_nan() {
        let p = DescentProfile::default();
        assert_eq!(target_fall_speed(-4.0, &p, TWR, G), p.final_landing_speed);
        assert_eq!(target_fall_speed(f32::NAN, &p, TWR, G), p.final_landing_speed);
    }

    #[test]
    fn test_rate_limit() {
        assert_eq!(rate_limit(0.5, 1.0, 0.1), 0.6);
        assert_eq!(rate_limit(0.5, 0.45, 0.1), 0.45);
        assert_eq!(rate_limit(0.95, 3.0, 0.5), 1.0);
        assert_eq!(rate_limit(0.5, f32::NAN, 0.1), 0.5);
    }

    fn input(height: f32, vy: f32) -> FallSpeedInput {
        FallSpeedInput {
            height,
            vertical_velocity: vy,
            hover_thrust: 0.5,
            max_twr: TWR,
            gravity: G,
            current_thrust: 0.5,
        }
    }

    #[test]
    fn test_climbing_cuts_thrust() {
        let config = AutopilotConfig::default();
        let mut pid = config.vertical_gains.controller();
        let cmd = control_fall_speed(&input(150.0, 3.0), &mut pid, &config, 0.1);
        // Rate limited toward zero
        assert!((cmd.thrust - (0.5 - config.thrust_rate_limit * 0.1)).abs() < 1e-6);
    }

    #[test]
    fn test_overspeed_demands_full_thrust() {
        let config = AutopilotConfig::default();
        let mut pid = config.vertical_gains.controller();
        let mut state = input(50.0, -40.0);
        let mut thrust = 0.0;
        for _ in 0..30 {
            let cmd = control_fall_speed(&state, &mut pid, &config, 0.1);
            state.current_thrust = cmd.thrust;
            thrust = cmd.thrust;
        }
        assert_eq!(thrust, 1.0);
    }

    #[test]
    fn test_on_profile_holds_hover() {
        let config = AutopilotConfig::default();
        let mut pid = config.vertical_gains.controller();
        let speed = target_fall_speed(150.0, &config.descent, TWR, G);
        // Settle the derivative term first
        control_fall_speed(&input(150.0, -speed), &mut pid, &config, 0.1);
        let cmd = control_fall_speed(&input(150.0, -speed), &mut pid, &config, 0.1);
        assert!((cmd.thrust - 0.5).abs() < 1e-4, "thrust {}", cmd.thrust);
    }

    #[test]
    fn test_large_speed_error_scales_correction() {
        let config = AutopilotConfig {
            vertical_gains: PidGains::new(0.02, 0.0, 0.0, 10.0, 1.0),
            thrust_rate_limit: 1000.0,
            ..Default::default()
        };
        let speed = target_fall_speed(150.0, &config.descent, TWR, G);

        // Falling slower than the profile: error is negative, below and above the threshold
        let mut pid = config.vertical_gains.controller();
        let small = control_fall_speed(&input(150.0, -speed + 4.9), &mut pid, &config, 0.1);
        let mut pid = config.vertical_gains.controller();
        let large = control_fall_speed(&input(150.0, -speed + 5.1), &mut pid, &config, 0.1);

        let small_correction = 0.5 - small.thrust;
        let large_correction = 0.5 - large.thrust;
        assert!((small_correction - 0.02 * 4.9).abs() < 1e-4, "got {small_correction}");
        let expected = config.large_speed_error_gain * 5.1 / 4.9;
        let ratio = large_correction / small_correction;
        assert!((ratio - expected).abs() < 1e-2, "ratio {ratio}, expected {expected}");
    }
}
