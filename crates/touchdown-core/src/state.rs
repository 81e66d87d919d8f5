//! Read-only snapshots for presentation layers.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{AutopilotEvent, ScanEvent};
use crate::types::{LandingSite, SimTime};

/// Autopilot state visible to the UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutopilotSnapshot {
    pub phase: AutopilotPhase,
    pub armed: bool,
    pub target: Option<LandingSite>,
    /// Base (collective) thrust fraction.
    pub thrust: f32,
    /// Commanded thrust per engine.
    pub engine_thrust: Vec<f32>,
    /// Lateral/longitudinal tilt command.
    pub tilt: Vec2,
    /// Current target descent speed (m/s, positive down).
    pub target_fall_speed: f32,
}

/// Scanner state visible to the UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScannerSnapshot {
    pub state: ScanState,
    /// Session progress in [0, 1]; 1 when idle.
    pub progress: f32,
    /// Live ranked sites.
    pub sites: Vec<LandingSite>,
    pub presented: bool,
    /// Rejection counts of the current (or last) session, indexed by
    /// `RejectReason::index`.
    pub reject_counts: [u32; 6],
}

/// Vehicle kinematic state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleView {
    pub position: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub up: Vec3,
}

/// Complete state emitted by the headless simulation each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub vehicle: VehicleView,
    pub autopilot: AutopilotSnapshot,
    pub scanner: ScannerSnapshot,
    pub autopilot_events: Vec<AutopilotEvent>,
    pub scan_events: Vec<ScanEvent>,
}
