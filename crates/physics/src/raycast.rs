//! Surface ray queries: the geometry collaborator used for structure placement.

use crate::PhysicsWorld;
use engine_core::Vec3;
use rapier3d::prelude::*;

/// Where a ray met a planet surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// World position of the hit.
    pub point: Vec3,
    /// Outward surface normal at the hit point.
    pub normal: Vec3,
    /// Distance along the ray to the hit point.
    pub distance: f32,
}

/// Ray intersection against a named planet mesh.
pub trait SurfaceGeometry {
    /// First hit on `mesh` along the ray, or `None` on a miss (including unknown meshes).
    fn intersect(
        &self,
        mesh: &str,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<SurfaceHit>;
}

impl SurfaceGeometry for PhysicsWorld {
    fn intersect(
        &self,
        mesh: &str,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<SurfaceHit> {
        let target = self.planet_handle(mesh)?;
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );
        // Only the named planet counts; a neighbour in the way must not steal the hit.
        let only_target = |handle: ColliderHandle, _: &Collider| handle == target;
        let filter = QueryFilter::default().predicate(&only_target);

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                filter,
            )
            .map(|(_, intersection)| {
                let point = ray.point_at(intersection.time_of_impact);
                SurfaceHit {
                    point: Vec3::new(point.x, point.y, point.z),
                    normal: Vec3::new(
                        intersection.normal.x,
                        intersection.normal.y,
                        intersection.normal.z,
                    ),
                    distance: intersection.time_of_impact,
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_hits_sphere_surface() {
        let mut world = PhysicsWorld::new();
        world.upsert_planet("p", Vec3::new(10.0, 0.0, 0.0), 2.0);
        let hit = world
            .intersect("p", Vec3::new(30.0, 0.0, 0.0), -Vec3::X, 40.0)
            .unwrap();
        assert!((hit.point - Vec3::new(12.0, 0.0, 0.0)).length() < 1e-3);
        assert!((hit.normal - Vec3::X).length() < 1e-3);
        assert!((hit.distance - 18.0).abs() < 1e-3);
    }

    #[test]
    fn intersect_ignores_other_planets() {
        let mut world = PhysicsWorld::new();
        world.upsert_planet("near", Vec3::new(20.0, 0.0, 0.0), 2.0);
        world.upsert_planet("far", Vec3::ZERO, 2.0);
        let hit = world
            .intersect("far", Vec3::new(30.0, 0.0, 0.0), -Vec3::X, 60.0)
            .unwrap();
        assert!((hit.point - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn intersect_misses_unknown_mesh_and_wrong_direction() {
        let mut world = PhysicsWorld::new();
        world.upsert_planet("p", Vec3::ZERO, 1.0);
        assert!(world.intersect("q", Vec3::new(5.0, 0.0, 0.0), -Vec3::X, 10.0).is_none());
        assert!(world.intersect("p", Vec3::new(5.0, 0.0, 0.0), Vec3::X, 10.0).is_none());
    }
}
