//! Partial colony updates delivered in `update` messages.
//!
//! Top-level colony fields merge shallowly. The planet's position, rotation, main base and
//! natural resources merge field by field; the fleet list is replaced wholesale.

use serde::{Deserialize, Serialize};

use crate::model::{
    Colony, ColonyLevel, Facility, Fleet, NaturalResources, Planet, ResourceStation, Vector2,
    Vector3,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2Patch {
    pub x: Option<f32>,
    pub y: Option<f32>,
}

impl Vector2Patch {
    pub fn apply(&self, v: &mut Vector2) {
        if let Some(x) = self.x {
            v.x = x;
        }
        if let Some(y) = self.y {
            v.y = y;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3Patch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

impl Vector3Patch {
    pub fn apply(&self, v: &mut Vector3) {
        if let Some(x) = self.x {
            v.x = x;
        }
        if let Some(y) = self.y {
            v.y = y;
        }
        if let Some(z) = self.z {
            v.z = z;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesPatch {
    pub oil: Option<f32>,
    pub steel: Option<f32>,
    pub water: Option<f32>,
    pub temperature: Option<f32>,
    pub oil_storage: Option<f32>,
    pub steel_storage: Option<f32>,
    pub water_storage: Option<f32>,
}

impl ResourcesPatch {
    pub fn apply(&self, r: &mut NaturalResources) {
        let fields = [
            (self.oil, &mut r.oil),
            (self.steel, &mut r.steel),
            (self.water, &mut r.water),
            (self.temperature, &mut r.temperature),
            (self.oil_storage, &mut r.oil_storage),
            (self.steel_storage, &mut r.steel_storage),
            (self.water_storage, &mut r.water_storage),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetPatch {
    pub position: Option<Vector3Patch>,
    pub scale: Option<f32>,
    pub rot: Option<Vector3Patch>,
    pub planet_model_name: Option<String>,
    pub planet_main_base: Option<Vector2Patch>,
    pub planet_natural_resources: Option<ResourcesPatch>,
    pub planet_resource_station: Option<Vec<ResourceStation>>,
    pub oil_pumps: Option<Vec<Facility>>,
    pub steel_factories: Option<Vec<Facility>>,
}

impl PlanetPatch {
    pub fn apply(&self, planet: &mut Planet) {
        if let Some(p) = &self.position {
            p.apply(&mut planet.position);
        }
        if let Some(scale) = self.scale {
            planet.scale = scale;
        }
        if let Some(r) = &self.rot {
            r.apply(&mut planet.rot);
        }
        if let Some(name) = &self.planet_model_name {
            planet.planet_model_name = name.clone();
        }
        if let Some(base) = &self.planet_main_base {
            base.apply(&mut planet.planet_main_base);
        }
        if let Some(res) = &self.planet_natural_resources {
            res.apply(&mut planet.planet_natural_resources);
        }
        if let Some(stations) = &self.planet_resource_station {
            planet.planet_resource_station = Some(stations.clone());
        }
        if let Some(pumps) = &self.oil_pumps {
            planet.oil_pumps = Some(pumps.clone());
        }
        if let Some(factories) = &self.steel_factories {
            planet.steel_factories = Some(factories.clone());
        }
    }
}

/// A partial update to one colony, identified by `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColonyPatch {
    pub id: String,
    pub name: Option<String>,
    pub residents: Option<u32>,
    pub color: Option<String>,
    pub planet: Option<PlanetPatch>,
    pub colony_level: Option<ColonyLevel>,
    /// Always the complete fleet list for the colony when present.
    pub colony_fleet: Option<Vec<Fleet>>,
}

impl ColonyPatch {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// The colony with this patch applied. `base` is left untouched.
    pub fn merged(&self, base: &Colony) -> Colony {
        let mut next = base.clone();
        if let Some(name) = &self.name {
            next.name = name.clone();
        }
        if let Some(residents) = self.residents {
            next.residents = residents;
        }
        if let Some(color) = &self.color {
            next.color = color.clone();
        }
        if let Some(planet) = &self.planet {
            planet.apply(&mut next.planet);
        }
        if let Some(level) = self.colony_level {
            next.colony_level = level;
        }
        if let Some(fleets) = &self.colony_fleet {
            next.colony_fleet = Some(fleets.clone());
        }
        next
    }
}
