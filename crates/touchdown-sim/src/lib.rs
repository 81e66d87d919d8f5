//! Headless simulation for TOUCHDOWN.
//!
//! Owns a hecs world of obstacle colliders, a point-mass lander, the
//! terrain, the landing-site scanner and the autopilot, runs them at a
//! fixed tick rate and produces `SimSnapshot`s.

pub mod engine;
pub mod obstacle_world;
pub mod systems;
pub mod vehicle;
pub mod world_setup;

pub use touchdown_core as core;
pub use engine::{SimConfig, SimulationEngine};
pub use obstacle_world::{ObstacleBody, ObstacleWorld};
pub use vehicle::{PointMassVehicle, VehicleParams};
