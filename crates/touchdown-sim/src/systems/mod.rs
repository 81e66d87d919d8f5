//! Per-tick systems of the headless simulation.
//!
//! Systems are free functions over the world and the vehicle; they own no
//! state of their own.

pub mod colliders;
pub mod dynamics;
pub mod snapshot;
