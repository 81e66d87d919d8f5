//! In-memory obstacle set.

use glam::Vec3;

use crate::traits::ObstacleQuery;
use crate::types::ObstacleHit;

/// A flat list of colliders answering overlap queries by brute force.
#[derive(Debug, Clone, Default)]
pub struct ObstacleList {
    pub obstacles: Vec<ObstacleHit>,
}

impl ObstacleList {
    pub fn new(obstacles: Vec<ObstacleHit>) -> Self {
        Self { obstacles }
    }

    pub fn push(&mut self, hit: ObstacleHit) {
        self.obstacles.push(hit);
    }
}

impl ObstacleQuery for ObstacleList {
    fn overlap_capsule(
        &self,
        a: Vec3,
        b: Vec3,
        radius: f32,
        max_results: usize,
    ) -> Vec<ObstacleHit> {
        self.obstacles
            .iter()
            .filter(|o| o.bounds.intersects_capsule(a, b, radius))
            .take(max_results)
            .cloned()
            .collect()
    }

    fn overlap_sphere(&self, center: Vec3, radius: f32, max_results: usize) -> Vec<ObstacleHit> {
        self.obstacles
            .iter()
            .filter(|o| o.bounds.intersects_sphere(center, radius))
            .take(max_results)
            .cloned()
            .collect()
    }
}
