//! Query world holding one static collider per colony planet.

use std::collections::HashMap;

use engine_core::Vec3;
use rapier3d::prelude::*;

#[derive(Debug, Clone, Copy)]
struct PlanetBody {
    handle: ColliderHandle,
    center: Vec3,
    radius: f32,
}

/// Planet surfaces for ray queries. Nothing here is ever stepped; colliders are fixed in world.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub island_manager: IslandManager,
    pub query_pipeline: QueryPipeline,
    planets: HashMap<String, PlanetBody>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            island_manager: IslandManager::new(),
            query_pipeline: QueryPipeline::new(),
            planets: HashMap::new(),
        }
    }

    /// Update query pipeline for raycasting.
    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add or move a planet's sphere collider. Unchanged planets are left alone.
    pub fn upsert_planet(&mut self, id: &str, center: Vec3, radius: f32) -> ColliderHandle {
        let radius = radius.abs().max(0.01);
        if let Some(body) = self.planets.get(id) {
            if body.center == center && body.radius == radius {
                return body.handle;
            }
        }
        self.remove_collider(id);

        let collider = ColliderBuilder::ball(radius)
            .translation(vector![center.x, center.y, center.z])
            .build();
        let handle = self.collider_set.insert(collider);
        self.planets.insert(
            id.to_string(),
            PlanetBody {
                handle,
                center,
                radius,
            },
        );
        self.update_query_pipeline();
        log::debug!("Planet collider {} at {:?} r={}", id, center, radius);
        handle
    }

    pub fn remove_planet(&mut self, id: &str) -> bool {
        let removed = self.remove_collider(id);
        if removed {
            self.update_query_pipeline();
        }
        removed
    }

    /// Drop every planet whose id fails `keep`.
    pub fn retain_planets(&mut self, keep: impl Fn(&str) -> bool) {
        let stale: Vec<String> = self
            .planets
            .keys()
            .filter(|id| !keep(id.as_str()))
            .cloned()
            .collect();
        for id in &stale {
            self.remove_collider(id);
        }
        if !stale.is_empty() {
            self.update_query_pipeline();
        }
    }

    pub fn planet_handle(&self, id: &str) -> Option<ColliderHandle> {
        self.planets.get(id).map(|body| body.handle)
    }

    pub fn planet_count(&self) -> usize {
        self.planets.len()
    }

    fn remove_collider(&mut self, id: &str) -> bool {
        match self.planets.remove(id) {
            Some(body) => {
                self.collider_set.remove(
                    body.handle,
                    &mut self.island_manager,
                    &mut self.rigid_body_set,
                    false,
                );
                true
            }
            None => false,
        }
    }
}
