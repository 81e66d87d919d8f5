//! Procedural terrain for TOUCHDOWN.
//!
//! An infinite height field built from elliptical hills scattered one per
//! grid cell, generated deterministically from cell coordinates and cached
//! per sector.

pub use touchdown_core as core;

pub mod height_field;
pub mod hills;

// Re-export key types for convenience.
pub use height_field::{SectorCoord, TerrainConfig, TerrainHeightField};
pub use hills::Hill;
