//! Tuning parameters and defaults.
//!
//! Every configurable value has its default here; the config structs in
//! the terrain, radar and autopilot crates are built from these.

/// Default simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick at the default rate.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

/// Standard gravity (m/s²).
pub const STANDARD_GRAVITY: f32 = 9.81;

/// Ticks between periodic status log lines.
pub const STATUS_LOG_INTERVAL_TICKS: u64 = 120;

// --- Terrain ---

/// Side length of a hill generation cell/sector (meters).
pub const HILL_SPACING: f32 = 1000.0;

/// Probability that a cell spawns a hill.
pub const HILL_SPAWN_CHANCE: f32 = 0.9;

/// Maximum hill center offset as a fraction of the spacing.
pub const HILL_OFFSET_FRACTION: f32 = 0.3;

pub const HILL_MIN_RADIUS: f32 = 80.0;
pub const HILL_MAX_RADIUS: f32 = 1000.0;
pub const HILL_MIN_PEAK: f32 = 30.0;
pub const HILL_MAX_PEAK: f32 = 200.0;

/// Default world seed for hill generation.
pub const TERRAIN_SEED: u64 = 0x5EED_1A4D;

// --- Scanner: sampling ---

/// Radius around the vehicle's ground projection that is sampled (meters).
pub const SCAN_RADIUS: f32 = 200.0;

/// Lattice spacing / Poisson minimum spacing (meters).
pub const GRID_RESOLUTION: f32 = 5.0;

/// Poisson-disk candidate attempts before an active point is retired.
pub const POISSON_ATTEMPTS_PER_POINT: u32 = 30;

/// Seed for the Poisson-disk sampler.
pub const POISSON_SEED: u64 = 1337;

/// Coarse cell size of the obstacle-aware grid, in fine-grid steps.
pub const OBSTACLE_GRID_COARSE_FACTOR: u32 = 4;

/// Inflation applied to coarse cells for the broad-phase query.
pub const OBSTACLE_GRID_INFLATION: f32 = 1.5;

// --- Scanner: scheduling ---

/// Points evaluated per scanner update.
pub const MAX_POINTS_PER_FRAME: usize = 50;

/// Seconds between completed scans.
pub const SCAN_INTERVAL_SECS: f32 = 5.0;

/// Horizontal distance from the presented position that forces a rescan.
pub const RESCAN_DISTANCE: f32 = 50.0;

/// Accepted sites between intermediate clustering passes.
pub const GROUP_SITES_EVERY: usize = 10;

/// Maximum ranked sites kept after clustering.
pub const MAX_RESULTS: usize = 10;

/// Margin added to the summed site radii when clustering (meters).
pub const MIN_DISTANCE_BETWEEN_SITES: f32 = 5.0;

// --- Scanner: evaluation ---

/// Ring radius for flatness sampling (meters).
pub const FLATNESS_SAMPLE_RADIUS: f32 = 3.0;

/// Ring sample count for flatness.
pub const FLATNESS_SAMPLES: usize = 8;

/// Maximum standard deviation of heights (meters).
pub const MAX_FLATNESS_DEVIATION: f32 = 0.5;

/// Offset for slope sampling (meters).
pub const SLOPE_SAMPLE_DISTANCE: f32 = 2.0;

/// Maximum acceptable slope (degrees).
pub const MAX_SLOPE_DEG: f32 = 15.0;

/// Minimum usable site radius (meters).
pub const MIN_SITE_SIZE: f32 = 5.0;

/// Upper bound on the grown site radius (meters).
pub const MAX_SITE_SIZE: f32 = 20.0;

/// Radius growth step (meters).
pub const SITE_SIZE_STEP: f32 = 1.0;

/// Ring samples per size step.
pub const SITE_SIZE_RING_SAMPLES: usize = 12;

/// Fraction of ring samples that must be within tolerance.
pub const SITE_SIZE_MIN_VALID_FRACTION: f32 = 0.75;

/// Height above ground swept by obstacle queries (meters).
pub const OBSTACLE_CHECK_HEIGHT: f32 = 10.0;

/// Minimum height an obstacle must rise above ground to count (meters).
pub const OBSTACLE_MIN_HEIGHT: f32 = 0.5;

/// Radius of the early centre capsule check (meters).
pub const EARLY_OBSTACLE_CHECK_RADIUS: f32 = 1.0;

/// Desired clearance to the nearest obstacle (meters).
pub const MIN_OBSTACLE_CLEARANCE: f32 = 10.0;

/// Fraction of the clearance below which a site is rejected outright.
pub const STRICT_CLEARANCE_FRACTION: f32 = 0.5;

/// Search radius for the clearance query (meters).
pub const OBSTACLE_SEARCH_RADIUS: f32 = 30.0;

/// Colliders wider than this are treated as ground, not obstacles (meters).
pub const MAX_OBSTACLE_FOOTPRINT: f32 = 200.0;

/// Upper bound on overlap query results.
pub const MAX_QUERY_RESULTS: usize = 64;

/// Collider names containing these keywords never count as obstacles.
pub const EXCLUDED_OBSTACLE_KEYWORDS: [&str; 3] = ["ground", "terrain", "platform"];

// --- Scoring ---

pub const SCORE_WEIGHT_FLATNESS: f32 = 0.3;
pub const SCORE_WEIGHT_SLOPE: f32 = 0.3;
pub const SCORE_WEIGHT_SIZE: f32 = 0.2;
pub const SCORE_WEIGHT_CLEARANCE: f32 = 0.2;

// --- Autopilot: descent profile ---

/// Height above target at which braking begins (meters).
pub const BRAKING_START_HEIGHT: f32 = 300.0;

/// Height above target below which the slow fall begins (meters).
pub const SLOW_FALL_HEIGHT: f32 = 100.0;

/// Target fall speed at the braking-start height (m/s).
pub const BRAKING_SPEED: f32 = 10.0;

/// Target fall speed at the slow-fall height (m/s).
pub const SLOW_FALL_SPEED: f32 = 5.0;

/// Target fall speed at touchdown (m/s).
pub const FINAL_LANDING_SPEED: f32 = 3.0;

/// Ceiling on the physics-derived fall speed (m/s).
pub const MAX_SAFE_FALL_SPEED: f32 = 100.0;

/// Share of maximum thrust assumed available for braking.
pub const BRAKING_AUTHORITY: f32 = 0.9;

/// Descent faster than this multiple of the target forces full thrust.
pub const EMERGENCY_SPEED_FACTOR: f32 = 1.5;

/// Vertical speed error above which the correction is amplified (m/s).
pub const LARGE_SPEED_ERROR: f32 = 5.0;

/// Correction multiplier for large speed errors.
pub const LARGE_SPEED_ERROR_GAIN: f32 = 2.0;

/// Maximum change of thrust fraction per second.
pub const THRUST_RATE_LIMIT: f32 = 2.0;

/// Minimum thrust-to-weight ratio required to engage.
pub const MIN_TWR: f32 = 1.0;

// --- Autopilot: phase thresholds ---

/// 3D distance at which Approaching becomes Braking (meters).
pub const BRAKING_DISTANCE: f32 = 50.0;

pub const LANDING_ENTRY_DISTANCE: f32 = 5.0;
pub const LANDING_ENTRY_VERTICAL: f32 = 3.0;
pub const TOUCHDOWN_DISTANCE: f32 = 0.5;
pub const TOUCHDOWN_VERTICAL: f32 = 0.2;

/// Position tolerance when matching the target against fresh scan results.
pub const SITE_MATCH_TOLERANCE: f32 = 1.0;

/// Scores closer than this are treated as tied during selection.
pub const SITE_SCORE_TIE_EPSILON: f32 = 1e-4;

// --- Autopilot: horizontal guidance ---

/// Desired speed per meter of remaining horizontal distance.
pub const APPROACH_SPEED_GAIN: f32 = 0.3;

pub const APPROACH_MAX_SPEED: f32 = 20.0;
pub const BRAKING_MAX_SPEED: f32 = 5.0;
pub const LANDING_MAX_SPEED: f32 = 2.0;

/// Horizontal speed above which moving away from the target overrides PID (m/s).
pub const MOVING_AWAY_SPEED: f32 = 2.0;

/// Speed at which the deceleration override reaches full tilt (m/s).
pub const DECELERATION_FULL_SPEED: f32 = 5.0;

/// Velocity error magnitude that forces pure deceleration (m/s).
pub const EXTREME_VELOCITY_ERROR: f32 = 20.0;

// --- Autopilot: activation ---

/// Initial descent speed treated as excessive (m/s).
pub const EXCESSIVE_FALL_SPEED: f32 = 20.0;

/// Initial horizontal speed treated as excessive (m/s).
pub const EXCESSIVE_HORIZONTAL_SPEED: f32 = 5.0;

// --- Autopilot: attitude ---

/// Height above target at which surface alignment starts (meters).
pub const ALIGNMENT_START_HEIGHT: f32 = 50.0;

/// Alignment dead band (degrees).
pub const ALIGNMENT_TOLERANCE_DEG: f32 = 2.0;

/// Gain from alignment error (radians) to correction signal.
pub const ALIGNMENT_GAIN: f32 = 0.5;

/// Gain from attitude signals to tilt bias.
pub const ATTITUDE_TILT_BIAS: f32 = 0.5;

/// Angular speed below which stabilization is skipped (rad/s).
pub const ANGULAR_VELOCITY_EPSILON: f32 = 0.01;

/// Thrust below which differential offsets are suppressed.
pub const MIN_BASE_THRUST: f32 = 1e-3;

// --- Simulation ---

/// Default RNG seed for obstacle placement.
pub const SIM_SEED: u64 = 42;

pub const VEHICLE_MASS: f32 = 1000.0;

/// Per-engine maximum thrust (N). Four engines give a TWR of about 2.
pub const VEHICLE_ENGINE_THRUST: f32 = 5000.0;

pub const VEHICLE_ENGINE_COUNT: usize = 4;

/// Distance of each engine from the center along both local axes (meters).
pub const VEHICLE_ARM_LENGTH: f32 = 2.0;

/// Principal moments of inertia about local x, y, z (kg·m²).
pub const VEHICLE_INERTIA: [f32; 3] = [2000.0, 2500.0, 2000.0];

/// Yaw torque per newton of differential thrust (N·m/N).
pub const VEHICLE_YAW_TORQUE_FACTOR: f32 = 0.1;

/// Lateral acceleration at full tilt command (m/s²).
pub const VEHICLE_TILT_ACCELERATION: f32 = 5.0;

/// Angular velocity decay rate (1/s).
pub const VEHICLE_ANGULAR_DAMPING: f32 = 0.5;

/// Half extents of the vehicle's own collider (meters).
pub const VEHICLE_COLLIDER_HALF_EXTENTS: [f32; 3] = [2.5, 1.5, 2.5];

pub const SPAWN_HEIGHT: f32 = 150.0;

/// Rocks scattered around the spawn point.
pub const ROCK_COUNT: usize = 12;

/// Radius of the rock field around the spawn point (meters).
pub const ROCK_FIELD_RADIUS: f32 = 150.0;

/// Rocks never spawn closer than this to the spawn point (meters).
pub const ROCK_FIELD_CLEAR_RADIUS: f32 = 25.0;

pub const ROCK_MIN_HALF_WIDTH: f32 = 0.5;
pub const ROCK_MAX_HALF_WIDTH: f32 = 3.0;
pub const ROCK_MIN_HEIGHT: f32 = 1.0;
pub const ROCK_MAX_HEIGHT: f32 = 6.0;
