//! Error types.

/// Reasons the autopilot refuses to engage.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AutopilotError {
    /// Maximum thrust cannot arrest a fall.
    #[error("thrust-to-weight ratio {twr:.2} is below the required {required:.2}")]
    InsufficientThrust { twr: f32, required: f32 },

    /// The vehicle reports no engines.
    #[error("vehicle has no engines")]
    NoEngines,

    /// Mass or gravity is not a positive finite value.
    #[error("invalid vehicle mass {mass}")]
    InvalidMass { mass: f32 },
}
