//! Structure placement on planet surfaces.
//!
//! A 2D surface coordinate becomes a direction from the planet center; a ray from far
//! outside the planet back toward the center yields the anchor point and normal. Misses
//! stay pending and are retried on the next update.

use std::collections::HashMap;

use engine_core::{
    align_up, spherical_direction, PlanetFrame, Quat, Transform, Vec2, Vec3, SURFACE_COORD_SCALE,
};

use crate::raycast::SurfaceGeometry;

/// Rays start this many planet radii out from the center.
pub const RAY_START_FACTOR: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureKind {
    MainBase,
    OilPump,
    SteelFactory,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructureKey {
    pub colony_id: String,
    pub kind: StructureKind,
    /// Facility id; the colony id for the main base.
    pub id: String,
}

impl StructureKey {
    pub fn main_base(colony_id: &str) -> Self {
        Self {
            colony_id: colony_id.to_string(),
            kind: StructureKind::MainBase,
            id: colony_id.to_string(),
        }
    }

    pub fn facility(colony_id: &str, kind: StructureKind, id: &str) -> Self {
        Self {
            colony_id: colony_id.to_string(),
            kind,
            id: id.to_string(),
        }
    }
}

/// A resolved surface attachment point. Local +Y of the structure follows the normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceAnchor {
    pub point: Vec3,
    pub normal: Vec3,
    pub rotation: Quat,
}

impl SurfaceAnchor {
    pub fn transform(&self, scale: f32) -> Transform {
        Transform {
            position: self.point,
            rotation: self.rotation,
            scale: Vec3::splat(scale),
        }
    }
}

/// Cast toward the planet center along the surface coordinate's direction.
pub fn resolve_anchor(
    geometry: &impl SurfaceGeometry,
    mesh: &str,
    planet: &PlanetFrame,
    coord: Vec2,
) -> Option<SurfaceAnchor> {
    let local_dir = spherical_direction(coord, SURFACE_COORD_SCALE);
    let dir = planet.direction_to_world(local_dir).normalize_or(Vec3::X);
    let reach = planet.scale.abs().max(1.0) * RAY_START_FACTOR;
    let origin = planet.center + dir * reach;

    geometry
        .intersect(mesh, origin, -dir, reach * 2.0)
        .map(|hit| SurfaceAnchor {
            point: hit.point,
            normal: hit.normal,
            rotation: align_up(hit.normal),
        })
}

/// Colony id to main-base anchor position, used by weapons to aim at colonies.
pub trait AnchorLookup {
    fn anchor_position(&self, colony_id: &str) -> Option<Vec3>;
}

/// Placement requests and their resolved anchors, owned by the placement component.
#[derive(Debug, Default)]
pub struct SurfacePlacement {
    requests: HashMap<StructureKey, (String, PlanetFrame, Vec2)>,
    anchors: HashMap<StructureKey, SurfaceAnchor>,
}

impl SurfacePlacement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or refresh) what a structure should sit on. A changed request drops the stale anchor.
    pub fn request(&mut self, key: StructureKey, mesh: &str, planet: PlanetFrame, coord: Vec2) {
        let next = (mesh.to_string(), planet, coord);
        if self.requests.get(&key) == Some(&next) {
            return;
        }
        self.anchors.remove(&key);
        self.requests.insert(key, next);
    }

    /// Resolve every pending request. Returns how many resolved this call.
    pub fn update(&mut self, geometry: &impl SurfaceGeometry) -> usize {
        let mut resolved = 0;
        for (key, (mesh, planet, coord)) in &self.requests {
            if self.anchors.contains_key(key) {
                continue;
            }
            match resolve_anchor(geometry, mesh, planet, *coord) {
                Some(anchor) => {
                    self.anchors.insert(key.clone(), anchor);
                    resolved += 1;
                }
                None => log::debug!("Surface miss for {:?}; retrying next update", key),
            }
        }
        resolved
    }

    /// Forget structures whose key fails `keep`.
    pub fn retain(&mut self, keep: impl Fn(&StructureKey) -> bool) {
        self.requests.retain(|key, _| keep(key));
        self.anchors.retain(|key, _| keep(key));
    }

    pub fn anchor(&self, key: &StructureKey) -> Option<&SurfaceAnchor> {
        self.anchors.get(key)
    }

    pub fn anchors(&self) -> impl Iterator<Item = (&StructureKey, &SurfaceAnchor)> {
        self.anchors.iter()
    }

    pub fn pending_count(&self) -> usize {
        self.requests
            .keys()
            .filter(|key| !self.anchors.contains_key(*key))
            .count()
    }
}

impl AnchorLookup for SurfacePlacement {
    fn anchor_position(&self, colony_id: &str) -> Option<Vec3> {
        self.anchors
            .get(&StructureKey::main_base(colony_id))
            .map(|anchor| anchor.point)
    }
}
