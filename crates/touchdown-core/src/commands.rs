//! Operator commands.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AutopilotCommand {
    /// Arm the autopilot and begin the staged descent.
    StartLanding,
    /// Disarm immediately and zero all actuators.
    StopLanding,
}
