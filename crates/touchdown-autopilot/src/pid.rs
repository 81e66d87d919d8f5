//! Discrete PID controller with anti-windup and output clamping.

use serde::{Deserialize, Serialize};

/// Proportional-integral-derivative controller.
///
/// The caller supplies the timestep on every update; the controller never
/// reads a clock. The integral is clamped to `±integral_limit` and the
/// output to `[min_output, max_output]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PidController {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    min_output: f32,
    max_output: f32,
    integral_limit: f32,
    integral: f32,
    last_error: f32,
}

impl PidController {
    pub fn new(
        kp: f32,
        ki: f32,
        kd: f32,
        min_output: f32,
        max_output: f32,
        integral_limit: f32,
    ) -> Self {
        let (min_output, max_output) = if min_output <= max_output {
            (min_output, max_output)
        } else {
            (max_output, min_output)
        };
        Self {
            kp,
            ki,
            kd,
            min_output,
            max_output,
            integral_limit: integral_limit.abs(),
            integral: 0.0,
            last_error: 0.0,
        }
    }

    /// Advance one step and return the clamped control output.
    ///
    /// A non-positive or non-finite `dt` is a no-op that returns 0.
    pub fn update(&mut self, target: f32, current: f32, dt: f32) -> f32 {
        if !(dt > 0.0) || !dt.is_finite() {
            return 0.0;
        }
        let error = target - current;
        if !error.is_finite() {
            return 0.0_f32.clamp(self.min_output, self.max_output);
        }

        self.integral =
            (self.integral + error * dt).clamp(-self.integral_limit, self.integral_limit);
        let derivative = (error - self.last_error) / dt;
        self.last_error = error;

        let output = self.kp * error + self.ki * self.integral + self.kd * derivative;
        if output.is_nan() {
            return 0.0_f32.clamp(self.min_output, self.max_output);
        }
        output.clamp(self.min_output, self.max_output)
    }

    /// Zero the integral and the stored error.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.last_error = 0.0;
    }

    pub fn integral(&self) -> f32 {
        self.integral
    }

    pub fn last_error(&self) -> f32 {
        self.last_error
    }

    /// Preload the integral term, clamped to the integral limit.
    pub fn set_integral(&mut self, value: f32) {
        if value.is_finite() {
            self.integral = value.clamp(-self.integral_limit, self.integral_limit);
        }
    }

    pub fn output_range(&self) -> (f32, f32) {
        (self.min_output, self.max_output)
    }
}
