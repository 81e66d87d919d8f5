//! Scanner configuration.

use serde::{Deserialize, Serialize};

use touchdown_core::constants::*;
use touchdown_core::enums::SamplingStrategyKind;

/// Tuning for sampling, evaluation, scoring and scheduling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerConfig {
    // --- Sampling ---
    pub strategy: SamplingStrategyKind,
    pub scan_radius: f32,
    pub grid_resolution: f32,
    pub poisson_attempts_per_point: u32,
    pub poisson_seed: u64,
    /// Coarse cell size of the obstacle-aware grid, in fine steps.
    pub coarse_factor: u32,
    pub coarse_inflation: f32,

    // --- Scheduling ---
    pub max_points_per_frame: usize,
    pub scan_interval: f32,
    pub rescan_distance: f32,
    pub group_sites_every: usize,
    pub max_results: usize,
    pub min_distance_between_sites: f32,

    // --- Evaluation ---
    pub early_obstacle_check: bool,
    pub early_obstacle_radius: f32,
    pub flatness_sample_radius: f32,
    pub flatness_samples: usize,
    pub max_flatness_deviation: f32,
    pub slope_sample_distance: f32,
    pub max_slope_deg: f32,
    pub min_site_size: f32,
    pub max_site_size: f32,
    pub size_step: f32,
    pub size_ring_samples: usize,
    pub size_min_valid_fraction: f32,

    // --- Obstacles ---
    pub obstacle_check_height: f32,
    pub obstacle_min_height: f32,
    pub min_obstacle_clearance: f32,
    pub strict_clearance_fraction: f32,
    pub obstacle_search_radius: f32,
    pub max_obstacle_footprint: f32,
    pub max_query_results: usize,
    pub excluded_keywords: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            strategy: SamplingStrategyKind::default(),
            scan_radius: SCAN_RADIUS,
            grid_resolution: GRID_RESOLUTION,
            poisson_attempts_per_point: POISSON_ATTEMPTS_PER_POINT,
            poisson_seed: POISSON_SEED,
            coarse_factor: OBSTACLE_GRID_COARSE_FACTOR,
            coarse_inflation: OBSTACLE_GRID_INFLATION,
            max_points_per_frame: MAX_POINTS_PER_FRAME,
            scan_interval: SCAN_INTERVAL_SECS,
            rescan_distance: RESCAN_DISTANCE,
            group_sites_every: GROUP_SITES_EVERY,
            max_results: MAX_RESULTS,
            min_distance_between_sites: MIN_DISTANCE_BETWEEN_SITES,
            early_obstacle_check: true,
            early_obstacle_radius: EARLY_OBSTACLE_CHECK_RADIUS,
            flatness_sample_radius: FLATNESS_SAMPLE_RADIUS,
            flatness_samples: FLATNESS_SAMPLES,
            max_flatness_deviation: MAX_FLATNESS_DEVIATION,
            slope_sample_distance: SLOPE_SAMPLE_DISTANCE,
            max_slope_deg: MAX_SLOPE_DEG,
            min_site_size: MIN_SITE_SIZE,
            max_site_size: MAX_SITE_SIZE,
            size_step: SITE_SIZE_STEP,
            size_ring_samples: SITE_SIZE_RING_SAMPLES,
            size_min_valid_fraction: SITE_SIZE_MIN_VALID_FRACTION,
            obstacle_check_height: OBSTACLE_CHECK_HEIGHT,
            obstacle_min_height: OBSTACLE_MIN_HEIGHT,
            min_obstacle_clearance: MIN_OBSTACLE_CLEARANCE,
            strict_clearance_fraction: STRICT_CLEARANCE_FRACTION,
            obstacle_search_radius: OBSTACLE_SEARCH_RADIUS,
            max_obstacle_footprint: MAX_OBSTACLE_FOOTPRINT,
            max_query_results: MAX_QUERY_RESULTS,
            excluded_keywords: EXCLUDED_OBSTACLE_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

/// Replace `value` with `fallback` when `valid` fails, logging the change.
fn ensure(name: &str, valid: bool, value: &mut f32, fallback: f32) {
    if !valid {
        log::warn!("scanner {name} = {value} out of range, using {fallback}");
        *value = fallback;
    }
}

impl ScannerConfig {
    /// Clamp out-of-range values, logging each correction.
    pub fn sanitized(mut self) -> Self {
        ensure(
            "scan_radius",
            self.scan_radius > 0.0,
            &mut self.scan_radius,
            SCAN_RADIUS,
        );
        ensure(
            "grid_resolution",
            self.grid_resolution >= 0.5,
            &mut self.grid_resolution,
            GRID_RESOLUTION.min(self.scan_radius),
        );
        ensure(
            "coarse_inflation",
            self.coarse_inflation >= 1.0,
            &mut self.coarse_inflation,
            OBSTACLE_GRID_INFLATION,
        );
        ensure(
            "scan_interval",
            self.scan_interval >= 0.0,
            &mut self.scan_interval,
            SCAN_INTERVAL_SECS,
        );
        ensure(
            "rescan_distance",
            self.rescan_distance > 0.0,
            &mut self.rescan_distance,
            RESCAN_DISTANCE,
        );
        ensure(
            "min_distance_between_sites",
            self.min_distance_between_sites >= 0.0,
            &mut self.min_distance_between_sites,
            MIN_DISTANCE_BETWEEN_SITES,
        );
        ensure(
            "early_obstacle_radius",
            self.early_obstacle_radius > 0.0,
            &mut self.early_obstacle_radius,
            EARLY_OBSTACLE_CHECK_RADIUS,
        );
        ensure(
            "flatness_sample_radius",
            self.flatness_sample_radius > 0.0,
            &mut self.flatness_sample_radius,
            FLATNESS_SAMPLE_RADIUS,
        );
        ensure(
            "max_flatness_deviation",
            self.max_flatness_deviation > 0.0,
            &mut self.max_flatness_deviation,
            MAX_FLATNESS_DEVIATION,
        );
        ensure(
            "slope_sample_distance",
            self.slope_sample_distance > 0.0,
            &mut self.slope_sample_distance,
            SLOPE_SAMPLE_DISTANCE,
        );
        ensure(
            "max_slope_deg",
            self.max_slope_deg > 0.0 && self.max_slope_deg < 90.0,
            &mut self.max_slope_deg,
            MAX_SLOPE_DEG,
        );
        ensure(
            "min_site_size",
            self.min_site_size > 0.0,
            &mut self.min_site_size,
            MIN_SITE_SIZE,
        );
        let min_size = self.min_site_size;
        ensure(
            "max_site_size",
            self.max_site_size >= min_size,
            &mut self.max_site_size,
            MAX_SITE_SIZE.max(min_size),
        );
        ensure(
            "size_step",
            self.size_step > 0.0,
            &mut self.size_step,
            SITE_SIZE_STEP,
        );
        ensure(
            "size_min_valid_fraction",
            (0.0..=1.0).contains(&self.size_min_valid_fraction),
            &mut self.size_min_valid_fraction,
            SITE_SIZE_MIN_VALID_FRACTION,
        );
        ensure(
            "obstacle_min_height",
            self.obstacle_min_height >= 0.0,
            &mut self.obstacle_min_height,
            OBSTACLE_MIN_HEIGHT,
        );
        ensure(
            "obstacle_check_height",
            self.obstacle_check_height > self.obstacle_min_height,
            &mut self.obstacle_check_height,
            OBSTACLE_CHECK_HEIGHT.max(self.obstacle_min_height + 1.0),
        );
        ensure(
            "min_obstacle_clearance",
            self.min_obstacle_clearance > 0.0,
            &mut self.min_obstacle_clearance,
            MIN_OBSTACLE_CLEARANCE,
        );
        ensure(
            "strict_clearance_fraction",
            (0.0..=1.0).contains(&self.strict_clearance_fraction),
            &mut self.strict_clearance_fraction,
            STRICT_CLEARANCE_FRACTION,
        );
        ensure(
            "obstacle_search_radius",
            self.obstacle_search_radius > 0.0,
            &mut self.obstacle_search_radius,
            OBSTACLE_SEARCH_RADIUS,
        );
        ensure(
            "max_obstacle_footprint",
            self.max_obstacle_footprint > 0.0,
            &mut self.max_obstacle_footprint,
            MAX_OBSTACLE_FOOTPRINT,
        );

        if self.max_points_per_frame == 0 {
            log::warn!("scanner max_points_per_frame = 0, using {MAX_POINTS_PER_FRAME}");
            self.max_points_per_frame = MAX_POINTS_PER_FRAME;
        }
        if self.group_sites_every == 0 {
            log::warn!("scanner group_sites_every = 0, using {GROUP_SITES_EVERY}");
            self.group_sites_every = GROUP_SITES_EVERY;
        }
        if self.max_results == 0 {
            log::warn!("scanner max_results = 0, using {MAX_RESULTS}");
            self.max_results = MAX_RESULTS;
        }
        if self.poisson_attempts_per_point == 0 {
            log::warn!(
                "scanner poisson_attempts_per_point = 0, using {POISSON_ATTEMPTS_PER_POINT}"
            );
            self.poisson_attempts_per_point = POISSON_ATTEMPTS_PER_POINT;
        }
        if self.coarse_factor == 0 {
            log::warn!("scanner coarse_factor = 0, using {OBSTACLE_GRID_COARSE_FACTOR}");
            self.coarse_factor = OBSTACLE_GRID_COARSE_FACTOR;
        }
        if self.flatness_samples < 3 {
            log::warn!(
                "scanner flatness_samples = {} too few, using {FLATNESS_SAMPLES}",
                self.flatness_samples
            );
            self.flatness_samples = FLATNESS_SAMPLES;
        }
        if self.size_ring_samples < 4 {
            log::warn!(
                "scanner size_ring_samples = {} too few, using {SITE_SIZE_RING_SAMPLES}",
                self.size_ring_samples
            );
            self.size_ring_samples = SITE_SIZE_RING_SAMPLES;
        }
        if self.max_query_results == 0 {
            log::warn!("scanner max_query_results = 0, using {MAX_QUERY_RESULTS}");
            self.max_query_results = MAX_QUERY_RESULTS;
        }
        for keyword in &mut self.excluded_keywords {
            *keyword = keyword.to_ascii_lowercase();
        }
        self
    }
}
