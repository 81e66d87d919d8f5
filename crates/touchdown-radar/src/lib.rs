//! Landing-site radar for TOUCHDOWN.
//!
//! Samples the ground around the vehicle, rejects unusable points, scores
//! and clusters the survivors, and keeps a ranked list of candidates.
//! Scanning is time-sliced: each update evaluates a bounded number of
//! points and resumes from a stored cursor on the next.

pub mod clustering;
pub mod config;
pub mod evaluation;
pub mod obstacles;
pub mod sampling;
pub mod scanner;
pub mod scoring;

pub use touchdown_core as core;

pub use config::ScannerConfig;
pub use evaluation::{evaluate_site, ScanContext};
pub use sampling::Sampler;
pub use scanner::{LandingSiteScanner, ScanTick};

#[cfg(test)]
mod tests;
