//! Autopilot configuration.

use serde::{Deserialize, Serialize};

use touchdown_core::constants::*;
use touchdown_core::enums::AutopilotPhase;

use crate::pid::PidController;

/// Gains and limits for one PID loop. Output is clamped symmetrically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    pub output_limit: f32,
    pub integral_limit: f32,
}

impl PidGains {
    pub const fn new(kp: f32, ki: f32, kd: f32, output_limit: f32, integral_limit: f32) -> Self {
        Self {
            kp,
            ki,
            kd,
            output_limit,
            integral_limit,
        }
    }

    pub fn controller(&self) -> PidController {
        PidController::new(
            self.kp,
            self.ki,
            self.kd,
            -self.output_limit,
            self.output_limit,
            self.integral_limit,
        )
    }

    fn is_sane(&self) -> bool {
        [self.kp, self.ki, self.kd].iter().all(|g| g.is_finite() && *g >= 0.0)
            && self.output_limit > 0.0
            && self.integral_limit >= 0.0
            && self.output_limit.is_finite()
            && self.integral_limit.is_finite()
    }
}

/// Vertical-speed correction, in thrust fraction per m/s of error.
pub const VERTICAL_GAINS: PidGains = PidGains::new(0.1, 0.02, 0.01, 1.0, 5.0);
/// Horizontal velocity tracking, in tilt per m/s of error.
pub const HORIZONTAL_GAINS: PidGains = PidGains::new(0.3, 0.05, 0.02, 1.0, 5.0);
/// Angular-velocity damping during surface alignment.
pub const ALIGNMENT_DAMPING_GAINS: PidGains = PidGains::new(0.4, 0.0, 0.02, 0.2, 1.0);
/// Residual rotation damping.
pub const STABILIZATION_GAINS: PidGains = PidGains::new(0.3, 0.01, 0.01, 0.2, 1.0);

/// Height-based descent profile (speeds positive downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescentProfile {
    pub braking_start_height: f32,
    pub slow_fall_height: f32,
    pub braking_speed: f32,
    pub slow_fall_speed: f32,
    pub final_landing_speed: f32,
    /// Ceiling on the physics-derived speed above `braking_start_height`.
    pub max_safe_fall_speed: f32,
    /// Fraction of full thrust assumed available for braking.
    pub braking_authority: f32,
}

impl Default for DescentProfile {
    fn default() -> Self {
        Self {
            braking_start_height: BRAKING_START_HEIGHT,
            slow_fall_height: SLOW_FALL_HEIGHT,
            braking_speed: BRAKING_SPEED,
            slow_fall_speed: SLOW_FALL_SPEED,
            final_landing_speed: FINAL_LANDING_SPEED,
            max_safe_fall_speed: MAX_SAFE_FALL_SPEED,
            braking_authority: BRAKING_AUTHORITY,
        }
    }
}

/// Tuning for the landing autopilot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutopilotConfig {
    pub descent: DescentProfile,

    // --- Vertical ---
    pub emergency_speed_factor: f32,
    pub large_speed_error: f32,
    pub large_speed_error_gain: f32,
    /// Maximum thrust fraction change per second.
    pub thrust_rate_limit: f32,
    pub min_twr: f32,

    // --- Phase thresholds ---
    pub braking_distance: f32,
    pub landing_entry_distance: f32,
    pub landing_entry_vertical: f32,
    pub touchdown_distance: f32,
    pub touchdown_vertical: f32,
    pub site_match_tolerance: f32,
    pub score_tie_epsilon: f32,

    // --- Horizontal ---
    pub approach_speed_gain: f32,
    pub approach_max_speed: f32,
    pub braking_max_speed: f32,
    pub landing_max_speed: f32,
    pub moving_away_speed: f32,
    /// Speed at which the deceleration override commands full tilt.
    pub deceleration_full_speed: f32,
    pub extreme_velocity_error: f32,

    // --- Activation ---
    pub excessive_fall_speed: f32,
    pub excessive_horizontal_speed: f32,

    // --- Attitude ---
    pub alignment_start_height: f32,
    pub alignment_tolerance_deg: f32,
    pub alignment_gain: f32,
    pub attitude_tilt_bias: f32,
    pub angular_velocity_epsilon: f32,
    pub min_base_thrust: f32,

    pub vertical_gains: PidGains,
    pub horizontal_gains: PidGains,
    pub alignment_gains: PidGains,
    pub stabilization_gains: PidGains,

    /// Ticks between periodic status log lines.
    pub status_log_interval: u64,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            descent: DescentProfile::default(),
            emergency_speed_factor: EMERGENCY_SPEED_FACTOR,
            large_speed_error: LARGE_SPEED_ERROR,
            large_speed_error_gain: LARGE_SPEED_ERROR_GAIN,
            thrust_rate_limit: THRUST_RATE_LIMIT,
            min_twr: MIN_TWR,
            braking_distance: BRAKING_DISTANCE,
            landing_entry_distance: LANDING_ENTRY_DISTANCE,
            landing_entry_vertical: LANDING_ENTRY_VERTICAL,
            touchdown_distance: TOUCHDOWN_DISTANCE,
            touchdown_vertical: TOUCHDOWN_VERTICAL,
            site_match_tolerance: SITE_MATCH_TOLERANCE,
            score_tie_epsilon: SITE_SCORE_TIE_EPSILON,
            approach_speed_gain: APPROACH_SPEED_GAIN,
            approach_max_speed: APPROACH_MAX_SPEED,
            braking_max_speed: BRAKING_MAX_SPEED,
            landing_max_speed: LANDING_MAX_SPEED,
            moving_away_speed: MOVING_AWAY_SPEED,
            deceleration_full_speed: DECELERATION_FULL_SPEED,
            extreme_velocity_error: EXTREME_VELOCITY_ERROR,
            excessive_fall_speed: EXCESSIVE_FALL_SPEED,
            excessive_horizontal_speed: EXCESSIVE_HORIZONTAL_SPEED,
            alignment_start_height: ALIGNMENT_START_HEIGHT,
            alignment_tolerance_deg: ALIGNMENT_TOLERANCE_DEG,
            alignment_gain: ALIGNMENT_GAIN,
            attitude_tilt_bias: ATTITUDE_TILT_BIAS,
            angular_velocity_epsilon: ANGULAR_VELOCITY_EPSILON,
            min_base_thrust: MIN_BASE_THRUST,
            vertical_gains: VERTICAL_GAINS,
            horizontal_gains: HORIZONTAL_GAINS,
            alignment_gains: ALIGNMENT_DAMPING_GAINS,
            stabilization_gains: STABILIZATION_GAINS,
            status_log_interval: STATUS_LOG_INTERVAL_TICKS,
        }
    }
}

fn ensure(name: &str, valid: bool, value: &mut f32, fallback: f32) {
    if !valid {
        log::warn!("autopilot {name} = {value} out of range, using {fallback}");
        *value = fallback;
    }
}

fn ensure_gains(name: &str, gains: &mut PidGains, fallback: PidGains) {
    if !gains.is_sane() {
        log::warn!("autopilot {name} {gains:?} out of range, using defaults");
        *gains = fallback;
    }
}

impl DescentProfile {
    /// Restore the ordering `braking_start > slow_fall > 0` and
    /// `braking_speed >= slow_fall_speed >= final_landing_speed > 0`.
    pub fn sanitized(mut self) -> Self {
        let defaults = DescentProfile::default();
        let heights_ok = self.slow_fall_height > 0.0
            && self.braking_start_height > self.slow_fall_height
            && self.braking_start_height.is_finite();
        if !heights_ok {
            log::warn!(
                "autopilot descent heights {} / {} out of order, using defaults",
                self.braking_start_height,
                self.slow_fall_height
            );
            self.braking_start_height = defaults.braking_start_height;
            self.slow_fall_height = defaults.slow_fall_height;
        }

        let speeds_ok = self.final_landing_speed > 0.0
            && self.slow_fall_speed >= self.final_landing_speed
            && self.braking_speed >= self.slow_fall_speed
            && self.braking_speed.is_finite();
        if !speeds_ok {
            log::warn!(
                "autopilot descent speeds {} / {} / {} out of order, using defaults",
                self.braking_speed,
                self.slow_fall_speed,
                self.final_landing_speed
            );
            self.braking_speed = defaults.braking_speed;
            self.slow_fall_speed = defaults.slow_fall_speed;
            self.final_landing_speed = defaults.final_landing_speed;
        }

        let braking_speed = self.braking_speed;
        ensure(
            "max_safe_fall_speed",
            self.max_safe_fall_speed >= braking_speed && self.max_safe_fall_speed.is_finite(),
            &mut self.max_safe_fall_speed,
            MAX_SAFE_FALL_SPEED.max(braking_speed),
        );
        ensure(
            "braking_authority",
            self.braking_authority > 0.0 && self.braking_authority <= 1.0,
            &mut self.braking_authority,
            BRAKING_AUTHORITY,
        );
        self
    }
}

impl AutopilotConfig {
    /// Clamp out-of-range values, logging each correction.
    pub fn sanitized(mut self) -> Self {
        self.descent = self.descent.sanitized();

        ensure(
            "emergency_speed_factor",
            self.emergency_speed_factor > 1.0,
            &mut self.emergency_speed_factor,
            EMERGENCY_SPEED_FACTOR,
        );
        ensure(
            "large_speed_error",
            self.large_speed_error > 0.0,
            &mut self.large_speed_error,
            LARGE_SPEED_ERROR,
        );
        ensure(
            "large_speed_error_gain",
            self.large_speed_error_gain >= 1.0,
            &mut self.large_speed_error_gain,
            LARGE_SPEED_ERROR_GAIN,
        );
        ensure(
            "thrust_rate_limit",
            self.thrust_rate_limit > 0.0,
            &mut self.thrust_rate_limit,
            THRUST_RATE_LIMIT,
        );
        ensure("min_twr", self.min_twr >= 1.0, &mut self.min_twr, MIN_TWR);

        ensure(
            "touchdown_distance",
            self.touchdown_distance > 0.0,
            &mut self.touchdown_distance,
            TOUCHDOWN_DISTANCE,
        );
        ensure(
            "touchdown_vertical",
            self.touchdown_vertical > 0.0,
            &mut self.touchdown_vertical,
            TOUCHDOWN_VERTICAL,
        );
        let touchdown = self.touchdown_distance;
        ensure(
            "landing_entry_distance",
            self.landing_entry_distance > touchdown,
            &mut self.landing_entry_distance,
            LANDING_ENTRY_DISTANCE.max(touchdown),
        );
        ensure(
            "landing_entry_vertical",
            self.landing_entry_vertical > 0.0,
            &mut self.landing_entry_vertical,
            LANDING_ENTRY_VERTICAL,
        );
        let entry = self.landing_entry_distance;
        ensure(
            "braking_distance",
            self.braking_distance > entry,
            &mut self.braking_distance,
            BRAKING_DISTANCE.max(entry),
        );
        ensure(
            "site_match_tolerance",
            self.site_match_tolerance > 0.0,
            &mut self.site_match_tolerance,
            SITE_MATCH_TOLERANCE,
        );
        ensure(
            "score_tie_epsilon",
            self.score_tie_epsilon >= 0.0,
            &mut self.score_tie_epsilon,
            SITE_SCORE_TIE_EPSILON,
        );

        ensure(
            "approach_speed_gain",
            self.approach_speed_gain > 0.0,
            &mut self.approach_speed_gain,
            APPROACH_SPEED_GAIN,
        );
        ensure(
            "landing_max_speed",
            self.landing_max_speed > 0.0,
            &mut self.landing_max_speed,
            LANDING_MAX_SPEED,
        );
        let landing_max = self.landing_max_speed;
        ensure(
            "braking_max_speed",
            self.braking_max_speed >= landing_max,
            &mut self.braking_max_speed,
            BRAKING_MAX_SPEED.max(landing_max),
        );
        let braking_max = self.braking_max_speed;
        ensure(
            "approach_max_speed",
            self.approach_max_speed >= braking_max,
            &mut self.approach_max_speed,
            APPROACH_MAX_SPEED.max(braking_max),
        );
        ensure(
            "moving_away_speed",
            self.moving_away_speed > 0.0,
            &mut self.moving_away_speed,
            MOVING_AWAY_SPEED,
        );
        ensure(
            "deceleration_full_speed",
            self.deceleration_full_speed > 0.0,
            &mut self.deceleration_full_speed,
            DECELERATION_FULL_SPEED,
        );
        ensure(
            "extreme_velocity_error",
            self.extreme_velocity_error > 0.0,
            &mut self.extreme_velocity_error,
            EXTREME_VELOCITY_ERROR,
        );
        ensure(
            "excessive_fall_speed",
            self.excessive_fall_speed > 0.0,
            &mut self.excessive_fall_speed,
            EXCESSIVE_FALL_SPEED,
        );
        ensure(
            "excessive_horizontal_speed",
            self.excessive_horizontal_speed > 0.0,
            &mut self.excessive_horizontal_speed,
            EXCESSIVE_HORIZONTAL_SPEED,
        );

        ensure(
            "alignment_start_height",
            self.alignment_start_height >= 0.0,
            &mut self.alignment_start_height,
            ALIGNMENT_START_HEIGHT,
        );
        ensure(
            "alignment_tolerance_deg",
            self.alignment_tolerance_deg >= 0.0 && self.alignment_tolerance_deg < 90.0,
            &mut self.alignment_tolerance_deg,
            ALIGNMENT_TOLERANCE_DEG,
        );
        ensure(
            "alignment_gain",
            self.alignment_gain >= 0.0 && self.alignment_gain.is_finite(),
            &mut self.alignment_gain,
            ALIGNMENT_GAIN,
        );
        ensure(
            "attitude_tilt_bias",
            (0.0..=1.0).contains(&self.attitude_tilt_bias),
            &mut self.attitude_tilt_bias,
            ATTITUDE_TILT_BIAS,
        );
        ensure(
            "angular_velocity_epsilon",
            self.angular_velocity_epsilon >= 0.0 && self.angular_velocity_epsilon.is_finite(),
            &mut self.angular_velocity_epsilon,
            ANGULAR_VELOCITY_EPSILON,
        );
        ensure(
            "min_base_thrust",
            (0.0..1.0).contains(&self.min_base_thrust),
            &mut self.min_base_thrust,
            MIN_BASE_THRUST,
        );

        ensure_gains("vertical_gains", &mut self.vertical_gains, VERTICAL_GAINS);
        ensure_gains("horizontal_gains", &mut self.horizontal_gains, HORIZONTAL_GAINS);
        ensure_gains("alignment_gains", &mut self.alignment_gains, ALIGNMENT_DAMPING_GAINS);
        ensure_gains(
            "stabilization_gains",
            &mut self.stabilization_gains,
            STABILIZATION_GAINS,
        );

        if self.status_log_interval == 0 {
            log::warn!("autopilot status_log_interval = 0, using {STATUS_LOG_INTERVAL_TICKS}");
            self.status_log_interval = STATUS_LOG_INTERVAL_TICKS;
        }
        self
    }

    /// Horizontal speed cap for a phase.
    pub fn max_speed_for(&self, phase: AutopilotPhase) -> f32 {
        match phase {
            AutopilotPhase::Approaching => self.approach_max_speed,
            AutopilotPhase::Braking => self.braking_max_speed,
            AutopilotPhase::Landing => self.landing_max_speed,
            AutopilotPhase::Idle | AutopilotPhase::WaitingForSite => 0.0,
        }
    }
}
