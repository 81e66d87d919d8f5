//! Scene colliders stored in the ECS world.
//!
//! Every obstacle is an entity with an [`ObstacleBody`] and an [`Aabb`].
//! [`ObstacleWorld`] borrows the world and answers the scanner's overlap
//! queries against those entities.

use glam::Vec3;
use hecs::World;

use touchdown_core::traits::ObstacleQuery;
use touchdown_core::types::{Aabb, BodyId, ObstacleHit};

/// Collider identity component.
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleBody {
    pub name: String,
    /// Body the collider belongs to, if any.
    pub owner: Option<BodyId>,
}

impl ObstacleBody {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: None,
        }
    }

    pub fn owned_by(name: impl Into<String>, owner: BodyId) -> Self {
        Self {
            name: name.into(),
            owner: Some(owner),
        }
    }

    fn hit(&self, bounds: Aabb) -> ObstacleHit {
        let hit = ObstacleHit::new(self.name.clone(), bounds);
        match self.owner {
            Some(owner) => hit.with_owner(owner),
            None => hit,
        }
    }
}

/// Read-only obstacle view over a hecs world.
pub struct ObstacleWorld<'w> {
    world: &'w World,
}

impl<'w> ObstacleWorld<'w> {
    pub fn new(world: &'w World) -> Self {
        Self { world }
    }

    fn collect(&self, overlaps: impl Fn(&Aabb) -> bool, max_results: usize) -> Vec<ObstacleHit> {
        let mut query = self.world.query::<(&ObstacleBody, &Aabb)>();
        query
            .iter()
            .filter(|(_, (_, bounds))| overlaps(*bounds))
            .take(max_results)
            .map(|(_, (body, bounds))| body.hit(*bounds))
            .collect()
    }
}

impl ObstacleQuery for ObstacleWorld<'_> {
    fn overlap_capsule(
        &self,
        a: Vec3,
        b: Vec3,
        radius: f32,
        max_results: usize,
    ) -> Vec<ObstacleHit> {
        self.collect(|bounds| bounds.intersects_capsule(a, b, radius), max_results)
    }

    fn overlap_sphere(&self, center: Vec3, radius: f32, max_results: usize) -> Vec<ObstacleHit> {
        self.collect(|bounds| bounds.intersects_sphere(center, radius), max_results)
    }
}
