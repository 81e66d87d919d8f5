//! Core types and definitions for the TOUCHDOWN landing subsystem.
//!
//! This crate defines the vocabulary shared across all other crates:
//! landing sites, geometry, collaborator traits, commands, events,
//! snapshots, errors and constants. It has no dependency on any
//! rendering or physics framework.

pub mod commands;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod obstacles;
pub mod state;
pub mod traits;
pub mod types;

pub use error::AutopilotError;
pub use types::{Aabb, BodyId, LandingSite, ObstacleHit};
