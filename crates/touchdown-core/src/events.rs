//! Events emitted by the scanner and autopilot for UI feedback.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::AutopilotPhase;

/// Autopilot lifecycle notifications, drained by the caller each tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AutopilotEvent {
    /// The vehicle was armed or disarmed.
    ArmStateChanged { armed: bool },
    /// The state machine moved to a new phase.
    PhaseChanged {
        from: AutopilotPhase,
        to: AutopilotPhase,
    },
    /// A landing site was chosen.
    TargetSelected { position: Vec3, score: f32 },
    /// The chosen site disappeared from the live results.
    TargetLost { position: Vec3 },
    /// The vehicle reached the site and the autopilot disarmed.
    Touchdown { position: Vec3 },
    /// `start_landing` was refused.
    StartRefused { reason: String },
}

/// Scanner lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScanEvent {
    ScanStarted { points: usize },
    ScanCompleted { sites: usize },
    /// An in-progress session was abandoned for a fresh one.
    ScanCancelled { processed: usize },
    /// A result set was presented at this vehicle position.
    ResultsPresented { position: Vec3, sites: usize },
}
