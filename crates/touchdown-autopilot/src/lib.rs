//! Landing autopilot for TOUCHDOWN.
//!
//! A staged controller that picks the best presented landing site and
//! flies the vehicle down to it: an altitude-dependent fall-speed profile
//! drives the collective thrust, a horizontal PID pair drives tilt, and an
//! attitude loop aligns the thrust axis with the site's surface normal
//! through differential engine thrust.

pub mod attitude;
pub mod autopilot;
pub mod config;
pub mod descent;
pub mod fsm;
pub mod lateral;
pub mod mixer;
pub mod pid;

pub use touchdown_core as core;

pub use autopilot::LandingAutopilot;
pub use config::{AutopilotConfig, DescentProfile, PidGains};
pub use pid::PidController;
