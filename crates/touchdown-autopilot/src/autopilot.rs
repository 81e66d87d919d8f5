//! The landing autopilot.
//!
//! `LandingAutopilot` owns the phase, the pursued target and all control
//! state. Each tick it re-validates the target against the scanner's live
//! list, evaluates the phase machine, then runs the vertical, horizontal
//! and attitude loops and writes engine and tilt commands to the vehicle.

use glam::{Vec2, Vec3};

use touchdown_core::enums::AutopilotPhase;
use touchdown_core::error::AutopilotError;
use touchdown_core::events::AutopilotEvent;
use touchdown_core::state::AutopilotSnapshot;
use touchdown_core::traits::{SiteProvider, Vehicle};
use touchdown_core::types::LandingSite;

use crate::attitude::AttitudeController;
use crate::config::AutopilotConfig;
use crate::descent::{control_fall_speed, FallSpeedInput};
use crate::fsm::{self, TargetGeometry};
use crate::lateral::LateralController;
use crate::mixer;
use crate::pid::PidController;

/// Staged landing controller.
#[derive(Debug, Clone)]
pub struct LandingAutopilot {
    config: AutopilotConfig,
    phase: AutopilotPhase,
    armed: bool,
    target: Option<LandingSite>,
    /// Base (collective) thrust fraction.
    thrust: f32,
    engine_thrust: Vec<f32>,
    tilt: Vec2,
    target_fall_speed: f32,
    vertical: PidController,
    lateral: LateralController,
    attitude: AttitudeController,
    ticks: u64,
    events: Vec<AutopilotEvent>,
}

impl Default for LandingAutopilot {
    fn default() -> Self {
        Self::new(AutopilotConfig::default())
    }
}

/// Hover thrust corrected for the thrust axis leaning off vertical.
fn tilted_hover_thrust(vehicle: &dyn Vehicle) -> f32 {
    let lean = vehicle.up().y.max(0.5);
    (vehicle.hover_thrust() / lean).min(1.0)
}

impl LandingAutopilot {
    pub fn new(config: AutopilotConfig) -> Self {
        let config = config.sanitized();
        Self {
            vertical: config.vertical_gains.controller(),
            lateral: LateralController::new(&config),
            attitude: AttitudeController::new(&config),
            config,
            phase: AutopilotPhase::Idle,
            armed: false,
            target: None,
            thrust: 0.0,
            engine_thrust: Vec::new(),
            tilt: Vec2::ZERO,
            target_fall_speed: 0.0,
            ticks: 0,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &AutopilotConfig {
        &self.config
    }

    pub fn phase(&self) -> AutopilotPhase {
        self.phase
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn target(&self) -> Option<&LandingSite> {
        self.target.as_ref()
    }

    /// Base thrust fraction.
    pub fn thrust(&self) -> f32 {
        self.thrust
    }

    pub fn engine_thrust(&self) -> &[f32] {
        &self.engine_thrust
    }

    pub fn tilt(&self) -> Vec2 {
        self.tilt
    }

    pub fn target_fall_speed(&self) -> f32 {
        self.target_fall_speed
    }

    pub(crate) fn vertical_integral(&self) -> f32 {
        self.vertical.integral()
    }

    /// Drain pending events.
    pub fn take_events(&mut self) -> Vec<AutopilotEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> AutopilotSnapshot {
        AutopilotSnapshot {
            phase: self.phase,
            armed: self.armed,
            target: self.target,
            thrust: self.thrust,
            engine_thrust: self.engine_thrust.clone(),
            tilt: self.tilt,
            target_fall_speed: self.target_fall_speed,
        }
    }

    /// Arm and begin the descent.
    ///
    /// Refused, leaving the autopilot idle, when the vehicle has no engines,
    /// an invalid mass, or a maximum thrust-to-weight ratio below
    /// `min_twr`. Calling it while already active does nothing.
    pub fn start_landing(&mut self, vehicle: &mut dyn Vehicle) -> Result<(), AutopilotError> {
        if self.phase.is_active() {
            return Ok(());
        }
        if let Err(err) = self.check_preconditions(vehicle) {
            log::warn!("landing start refused: {err}");
            self.events.push(AutopilotEvent::StartRefused {
                reason: err.to_string(),
            });
            return Err(err);
        }

        self.reset_controllers();
        self.target = None;
        self.target_fall_speed = 0.0;
        self.ticks = 0;

        let velocity = vehicle.velocity();
        self.thrust = if velocity.y > 0.0 {
            0.0
        } else {
            tilted_hover_thrust(vehicle)
        };

        if -velocity.y > self.config.excessive_fall_speed {
            self.vertical.set_integral(self.config.vertical_gains.integral_limit);
            log::debug!("excessive fall speed {:.1} m/s at start", -velocity.y);
        }

        self.tilt = Vec2::ZERO;
        let horizontal = Vec2::new(velocity.x, velocity.z);
        let speed = horizontal.length();
        if speed > self.config.excessive_horizontal_speed {
            let local = vehicle.to_local(Vec3::new(velocity.x, 0.0, velocity.z));
            let brake = (speed / self.config.deceleration_full_speed).min(1.0);
            self.tilt = -Vec2::new(local.x, local.z).normalize_or_zero() * brake;
            log::debug!("excessive horizontal speed {speed:.1} m/s at start");
        }

        self.engine_thrust = vec![self.thrust; vehicle.engine_count()];
        self.apply(vehicle);
        self.set_armed(vehicle, true);
        self.set_phase(AutopilotPhase::WaitingForSite);
        log::info!(
            "landing started at ({:.1}, {:.1}, {:.1}), TWR {:.2}",
            vehicle.position().x,
            vehicle.position().y,
            vehicle.position().z,
            vehicle.max_twr(),
        );
        Ok(())
    }

    /// Disarm immediately: zero every engine and the tilt command.
    pub fn stop_landing(&mut self, vehicle: &mut dyn Vehicle) {
        self.cut_actuators(vehicle);
        self.target = None;
        self.target_fall_speed = 0.0;
        self.reset_controllers();
        self.set_phase(AutopilotPhase::Idle);
        vehicle.set_autopilot_armed(false);
        if self.armed {
            self.armed = false;
            self.events.push(AutopilotEvent::ArmStateChanged { armed: false });
            log::info!("autopilot disarmed");
        }
    }

    /// Advance one tick. Does nothing while idle or for a non-positive `dt`.
    pub fn update(&mut self, vehicle: &mut dyn Vehicle, sites: &dyn SiteProvider, dt: f32) {
        if !self.phase.is_active() || !(dt > 0.0) || !dt.is_finite() {
            return;
        }
        self.ticks += 1;
        let position = vehicle.position();

        self.revalidate_target(sites);
        if self.phase == AutopilotPhase::WaitingForSite
            && self.target.is_none()
            && sites.results_presented()
        {
            self.select_target(sites, position);
        }

        let geometry = self
            .target
            .as_ref()
            .map(|target| TargetGeometry::between(position, target));
        let update = fsm::evaluate(self.phase, geometry, &self.config);
        if update.touchdown {
            self.touch_down(vehicle);
            return;
        }
        if update.phase_changed {
            self.set_phase(update.new_phase);
        }

        self.control(vehicle, sites, dt);

        if self.ticks % self.config.status_log_interval == 0 {
            log::debug!(
                "autopilot {:?}: pos ({:.1}, {:.1}, {:.1}) fall {:.2}/{:.2} thrust {:.2}",
                self.phase,
                position.x,
                position.y,
                position.z,
                -vehicle.velocity().y,
                self.target_fall_speed,
                self.thrust,
            );
        }
    }

    fn check_preconditions(&self, vehicle: &dyn Vehicle) -> Result<(), AutopilotError> {
        if vehicle.engine_count() == 0 {
            return Err(AutopilotError::NoEngines);
        }
        let mass = vehicle.mass();
        let weight = mass * vehicle.gravity();
        if !(mass > 0.0) || !(weight > 0.0) || !weight.is_finite() {
            return Err(AutopilotError::InvalidMass { mass });
        }
        let twr = vehicle.max_twr();
        if !(twr >= self.config.min_twr) {
            return Err(AutopilotError::InsufficientThrust {
                twr,
                required: self.config.min_twr,
            });
        }
        Ok(())
    }

    /// Drop the target if it left the live list; otherwise refresh it.
    fn revalidate_target(&mut self, sites: &dyn SiteProvider) {
        let Some(target) = self.target else {
            return;
        };
        match fsm::find_matching(sites.ranked_sites(), &target, self.config.site_match_tolerance) {
            Some(current) => self.target = Some(*current),
            None => {
                log::info!(
                    "target at ({:.1}, {:.1}, {:.1}) no longer available",
                    target.position.x,
                    target.position.y,
                    target.position.z,
                );
                self.events.push(AutopilotEvent::TargetLost {
                    position: target.position,
                });
                self.target = None;
            }
        }
    }

    fn select_target(&mut self, sites: &dyn SiteProvider, position: Vec3) {
        let Some(best) =
            fsm::select_best_site(sites.ranked_sites(), position, self.config.score_tie_epsilon)
        else {
            return;
        };
        log::info!(
            "target selected at ({:.1}, {:.1}, {:.1}), score {:.3}, size {:.1}",
            best.position.x,
            best.position.y,
            best.position.z,
            best.suitability_score,
            best.size,
        );
        self.events.push(AutopilotEvent::TargetSelected {
            position: best.position,
            score: best.suitability_score,
        });
        self.target = Some(best);
    }

    fn control(&mut self, vehicle: &mut dyn Vehicle, sites: &dyn SiteProvider, dt: f32) {
        let config = &self.config;
        let position = vehicle.position();
        let velocity = vehicle.velocity();
        let rotation = vehicle.rotation();
        let up = vehicle.up();

        let reference = self
            .target
            .map_or_else(|| sites.ground_height_below(), |t| t.position.y);
        let input = FallSpeedInput {
            height: position.y - reference,
            vertical_velocity: velocity.y,
            hover_thrust: tilted_hover_thrust(vehicle),
            max_twr: vehicle.max_twr(),
            gravity: vehicle.gravity(),
            current_thrust: self.thrust,
        };
        let fall = control_fall_speed(&input, &mut self.vertical, config, dt);
        self.thrust = fall.thrust;
        self.target_fall_speed = fall.target_fall_speed;

        let offset = self.target.map_or(Vec2::ZERO, |t| {
            t.ground_point() - Vec2::new(position.x, position.z)
        });
        let lateral = self.lateral.move_towards_target(
            offset,
            velocity,
            rotation,
            config.max_speed_for(self.phase),
            config,
            dt,
        );

        let angular_velocity = vehicle.to_local(vehicle.angular_velocity());
        let alignment = match self.target {
            Some(target) if position.y - target.position.y < config.alignment_start_height => self
                .attitude
                .align_to_surface_normal(
                    up,
                    target.surface_normal,
                    rotation,
                    angular_velocity,
                    config,
                    dt,
                ),
            _ => None,
        };
        let signal = alignment
            .or_else(|| self.attitude.stabilize_rotation(angular_velocity, config, dt));
        let bias = alignment.map_or(Vec2::ZERO, |s| s.tilt_bias(config.attitude_tilt_bias));
        self.tilt = (lateral.tilt + bias).clamp(Vec2::NEG_ONE, Vec2::ONE);

        if self.thrust > config.min_base_thrust {
            let desired = mixer::mix(
                self.thrust,
                signal.as_ref(),
                vehicle.engine_count(),
                config.min_base_thrust,
            );
            mixer::rate_limit_engines(
                &mut self.engine_thrust,
                &desired,
                config.thrust_rate_limit * dt,
            );
        } else {
            self.engine_thrust = vec![0.0; vehicle.engine_count()];
        }
        self.apply(vehicle);
    }

    fn touch_down(&mut self, vehicle: &mut dyn Vehicle) {
        let position = vehicle.position();
        log::info!(
            "touchdown at ({:.1}, {:.1}, {:.1}), vertical speed {:.2} m/s",
            position.x,
            position.y,
            position.z,
            -vehicle.velocity().y,
        );
        self.events.push(AutopilotEvent::Touchdown { position });
        self.stop_landing(vehicle);
    }

    fn apply(&self, vehicle: &mut dyn Vehicle) {
        for (index, thrust) in self.engine_thrust.iter().enumerate() {
            vehicle.set_engine_thrust(index, thrust.clamp(0.0, 1.0));
        }
        vehicle.set_tilt(self.tilt);
    }

    fn cut_actuators(&mut self, vehicle: &mut dyn Vehicle) {
        self.thrust = 0.0;
        self.tilt = Vec2::ZERO;
        self.engine_thrust = vec![0.0; vehicle.engine_count()];
        self.apply(vehicle);
    }

    fn reset_controllers(&mut self) {
        self.vertical.reset();
        self.lateral.reset();
        self.attitude.reset();
    }

    fn set_phase(&mut self, phase: AutopilotPhase) {
        if phase == self.phase {
            return;
        }
        log::info!("autopilot phase {:?} -> {:?}", self.phase, phase);
        self.events.push(AutopilotEvent::PhaseChanged {
            from: self.phase,
            to: phase,
        });
        self.phase = phase;
    }

    fn set_armed(&mut self, vehicle: &mut dyn Vehicle, armed: bool) {
        vehicle.set_autopilot_armed(armed);
        if self.armed != armed {
            self.armed = armed;
            self.events.push(AutopilotEvent::ArmStateChanged { armed });
            log::info!("autopilot {}", if armed { "armed" } else { "disarmed" });
        }
    }
}
