//! Fundamental geometric and simulation types.
//!
//! World space is right-handed with +Y up. Horizontal positions are
//! expressed as `Vec2(x, z)`.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Opaque identifier of a physical body, used for self-exclusion in
/// obstacle queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u64);

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box centered at `center` with half extents `half`.
    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        let half = half.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Largest horizontal extent (X or Z).
    pub fn footprint(&self) -> f32 {
        let s = self.size();
        s.x.max(s.z)
    }

    /// Horizontal distance from a ground point to the box footprint.
    /// Zero when the point lies inside the footprint.
    pub fn horizontal_distance_to(&self, point: Vec2) -> f32 {
        let dx = (self.min.x - point.x).max(point.x - self.max.x).max(0.0);
        let dz = (self.min.z - point.y).max(point.y - self.max.z).max(0.0);
        (dx * dx + dz * dz).sqrt()
    }

    /// Closest point on or inside the box.
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        p.clamp(self.min, self.max)
    }

    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.closest_point(center).distance_squared(center) <= radius * radius
    }

    /// Swept-sphere test against the segment `a..b`.
    ///
    /// Uses a slab test against the box inflated by `radius`, which is
    /// slightly generous at the corners.
    pub fn intersects_capsule(&self, a: Vec3, b: Vec3, radius: f32) -> bool {
        let min = self.min - Vec3::splat(radius);
        let max = self.max + Vec3::splat(radius);
        let dir = b - a;
        let mut t_min = 0.0_f32;
        let mut t_max = 1.0_f32;

        for axis in 0..3 {
            let origin = a[axis];
            let d = dir[axis];
            if d.abs() < 1e-9 {
                if origin < min[axis] || origin > max[axis] {
                    return false;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (min[axis] - origin) * inv;
            let mut t1 = (max[axis] - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return false;
            }
        }
        true
    }
}

/// A body returned by an obstacle overlap query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleHit {
    /// World-space bounds of the collider.
    pub bounds: Aabb,
    /// Scene name, used for keyword exclusion.
    pub name: String,
    /// Owning rigid body, if any.
    pub owner: Option<BodyId>,
}

impl ObstacleHit {
    pub fn new(name: impl Into<String>, bounds: Aabb) -> Self {
        Self {
            bounds,
            name: name.into(),
            owner: None,
        }
    }

    pub fn with_owner(mut self, owner: BodyId) -> Self {
        self.owner = Some(owner);
        self
    }
}

/// A scored landing candidate.
///
/// Produced only by site evaluation. Sites are recomputed on every scan, so
/// two sites are "the same" when their positions match, never by identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandingSite {
    /// Ground point at the site center (y = terrain height).
    pub position: Vec3,
    /// Composite suitability in [0, 1].
    pub suitability_score: f32,
    /// Usable radius in meters.
    pub size: f32,
    /// Steepest sampled slope in degrees.
    pub slope_angle: f32,
    /// Standard deviation of sampled heights in meters.
    pub flatness: f32,
    /// Horizontal distance from the center to the nearest valid obstacle.
    pub distance_to_obstacle: f32,
    /// Distance from the vehicle at evaluation time.
    pub distance_from_ship: f32,
    /// Whether a valid obstacle lies inside the minimum clearance.
    pub has_obstacles: bool,
    /// Unit terrain normal at the center.
    pub surface_normal: Vec3,
}

impl Default for LandingSite {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            suitability_score: 0.0,
            size: 0.0,
            slope_angle: 0.0,
            flatness: 0.0,
            distance_to_obstacle: 0.0,
            distance_from_ship: 0.0,
            has_obstacles: false,
            surface_normal: Vec3::Y,
        }
    }
}

impl LandingSite {
    /// Normalize a surface normal, falling back to up when degenerate.
    pub fn sanitize_normal(normal: Vec3) -> Vec3 {
        let n = normal.normalize_or_zero();
        if n == Vec3::ZERO || !n.is_finite() {
            Vec3::Y
        } else {
            n
        }
    }

    /// Horizontal (x, z) position.
    pub fn ground_point(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.z)
    }

    /// Position-based equality within `tolerance` meters.
    pub fn matches(&self, other: &LandingSite, tolerance: f32) -> bool {
        self.position.distance(other.position) < tolerance
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.tick += 1;
        self.elapsed_secs += dt as f64;
    }
}
