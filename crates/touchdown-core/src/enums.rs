//! Enumeration types used throughout the subsystem.

use serde::{Deserialize, Serialize};

/// Autopilot state machine phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AutopilotPhase {
    /// Disarmed, no commands issued.
    #[default]
    Idle,
    /// Armed, holding fall speed until the scanner presents a site.
    WaitingForSite,
    /// Flying toward the selected site.
    Approaching,
    /// Close to the site, horizontal speed capped low.
    Braking,
    /// Final vertical descent onto the site.
    Landing,
}

impl AutopilotPhase {
    /// Whether the autopilot issues commands in this phase.
    pub fn is_active(self) -> bool {
        !matches!(self, AutopilotPhase::Idle)
    }
}

/// Scanner scheduling state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanState {
    #[default]
    Idle,
    Scanning,
}

/// How candidate ground points are generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SamplingStrategyKind {
    /// Regular lattice clipped to the scan radius.
    #[default]
    Grid,
    /// Blue-noise points with a guaranteed minimum spacing.
    PoissonDisk,
    /// Lattice with coarse cells pre-excluded by a broad-phase obstacle query.
    ObstacleAwareGrid,
}

/// Why a candidate point was rejected, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RejectReason {
    /// An obstacle stands directly on the candidate point.
    ObstacleAtCenter,
    /// Height deviation around the point exceeds the flatness threshold.
    TooRough,
    /// Slope exceeds the maximum angle.
    TooSteep,
    /// Even the minimum radius is not usable.
    TooSmall,
    /// An obstacle footprint intersects the site disk.
    ObstacleInside,
    /// An obstacle is closer than the strict clearance.
    ObstacleTooClose,
}

impl RejectReason {
    pub const ALL: [RejectReason; 6] = [
        RejectReason::ObstacleAtCenter,
        RejectReason::TooRough,
        RejectReason::TooSteep,
        RejectReason::TooSmall,
        RejectReason::ObstacleInside,
        RejectReason::ObstacleTooClose,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}
