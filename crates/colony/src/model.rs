//! Wire data model: colonies, planets, fleets, orders and action events.
//!
//! Field names follow the server's camelCase JSON. Surface coordinates are kept as 2D
//! values and only ever resolved through `engine_core::spherical_direction`.

use engine_core::PlanetFrame;
use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Vector2> for Vec2 {
    fn from(v: Vector2) -> Self {
        Vec2::new(v.x, v.y)
    }
}

impl From<Vec2> for Vector2 {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<Vector3> for Vec3 {
    fn from(v: Vector3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for Vector3 {
    fn from(v: Vec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

/// Orientation quaternion as sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl From<Orientation> for Quat {
    fn from(o: Orientation) -> Self {
        let q = Quat::from_xyzw(o.x, o.y, o.z, o.w);
        if q.length_squared() > f32::EPSILON {
            q.normalize()
        } else {
            Quat::IDENTITY
        }
    }
}

impl From<Quat> for Orientation {
    fn from(q: Quat) -> Self {
        Self { x: q.x, y: q.y, z: q.z, w: q.w }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NaturalResources {
    /// Generation rates per server tick.
    pub oil: f32,
    pub steel: f32,
    pub water: f32,
    /// Environmental factor; affects growth, never stored.
    pub temperature: f32,
    #[serde(default)]
    pub oil_storage: f32,
    #[serde(default)]
    pub steel_storage: f32,
    #[serde(default)]
    pub water_storage: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Oil,
    Steel,
    Water,
    Temperature,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceStation {
    pub position: Vector2,
    pub resource_type: ResourceKind,
}

/// A secondary surface structure (oil pump, steel factory).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: String,
    pub position: Vector2,
    /// Output per server tick.
    #[serde(default)]
    pub production: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Planet {
    pub position: Vector3,
    pub scale: f32,
    /// Euler angles, radians, XYZ order.
    pub rot: Vector3,
    pub planet_model_name: String,
    pub planet_main_base: Vector2,
    pub planet_natural_resources: NaturalResources,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planet_resource_station: Option<Vec<ResourceStation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oil_pumps: Option<Vec<Facility>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steel_factories: Option<Vec<Facility>>,
}

impl Planet {
    pub fn frame(&self) -> PlanetFrame {
        PlanetFrame::from_euler(self.position.into(), self.scale, self.rot.into())
    }

    pub fn oil_pumps(&self) -> &[Facility] {
        self.oil_pumps.as_deref().unwrap_or_default()
    }

    pub fn steel_factories(&self) -> &[Facility] {
        self.steel_factories.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColonyLevel {
    #[default]
    Colony,
    Settlement,
    Township,
    Metropolis,
    #[serde(rename = "Starport Hub")]
    StarportHub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FleetType {
    Attacker,
    Flanker,
    Fighter,
    Bomber,
    Scout,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FleetState {
    #[default]
    Idle,
    Moving,
    Attacking,
    Retreating,
    Patrolling,
    Docking,
}

impl FleetState {
    /// States in which a fleet holds its orbit shell.
    pub fn requires_orbit(self) -> bool {
        matches!(self, FleetState::Idle | FleetState::Patrolling)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tactic {
    #[default]
    Offensive,
    Defensive,
    Skirmish,
    Kite,
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Move,
    Attack,
    Patrol,
    Hold,
    Retreat,
    Dock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetOrder {
    #[serde(rename = "type")]
    pub kind: OrderType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_pos: Option<Vector3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl FleetOrder {
    pub fn move_to(target: Vec3) -> Self {
        Self {
            kind: OrderType::Move,
            target_id: None,
            target_pos: Some(target.into()),
            timestamp: None,
        }
    }

    /// World-space destination if this is a Move order with a position.
    pub fn move_target(&self) -> Option<Vec3> {
        match (self.kind, self.target_pos) {
            (OrderType::Move, Some(pos)) => Some(pos.into()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vector3>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fleet {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FleetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Ships in the fleet; absent or zero means one.
    #[serde(default)]
    pub count: Option<u32>,
    pub position: Vector3,
    pub velocity: Vector3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Orientation>,
    pub state: FleetState,
    pub tactic: Tactic,
    #[serde(default)]
    pub order: Option<FleetOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp_pool: Option<f32>,
    #[serde(default)]
    pub target: Option<FleetTarget>,
    #[serde(default)]
    pub is_attacking: bool,
}

impl Fleet {
    pub fn new(id: impl Into<String>, kind: FleetType, position: Vec3) -> Self {
        Self {
            id: id.into(),
            kind,
            label: None,
            count: Some(1),
            position: position.into(),
            velocity: Vector3::default(),
            rotation: None,
            state: FleetState::Idle,
            tactic: Tactic::default(),
            order: None,
            leader_id: None,
            hp_pool: None,
            target: None,
            is_attacking: false,
        }
    }

    pub fn unit_count(&self) -> u32 {
        self.count.unwrap_or(1).max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Colony {
    pub id: String,
    pub name: String,
    pub residents: u32,
    pub color: String,
    pub planet: Planet,
    pub colony_level: ColonyLevel,
    #[serde(default)]
    pub colony_fleet: Option<Vec<Fleet>>,
}

impl Colony {
    pub fn fleets(&self) -> &[Fleet] {
        self.colony_fleet.as_deref().unwrap_or_default()
    }

    pub fn fleet(&self, fleet_id: &str) -> Option<&Fleet> {
        self.fleets().iter().find(|f| f.id == fleet_id)
    }

    pub fn fleet_mut(&mut self, fleet_id: &str) -> Option<&mut Fleet> {
        self.colony_fleet
            .as_mut()
            .and_then(|fleets| fleets.iter_mut().find(|f| f.id == fleet_id))
    }

    pub fn add_fleet(&mut self, fleet: Fleet) {
        self.colony_fleet.get_or_insert_with(Vec::new).push(fleet);
    }

    pub fn remove_fleet(&mut self, fleet_id: &str) {
        if let Some(fleets) = self.colony_fleet.as_mut() {
            fleets.retain(|f| f.id != fleet_id);
        }
    }

    /// Adjust residents, never going below zero.
    pub fn change_residents(&mut self, delta: i64) {
        let next = (self.residents as i64 + delta).clamp(0, u32::MAX as i64);
        self.residents = next as u32;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    Build,
    Upgrade,
    Attack,
    Destroy,
    LevelUp,
    #[default]
    #[serde(other)]
    General,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEvent {
    pub id: String,
    pub timestamp: i64,
    pub colony_id: String,
    pub colony_name: String,
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: ActionKind,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fleet_parses_server_json() {
        let json = r#"{
            "id": "f1", "type": "Bomber", "count": null,
            "position": {"x": 1, "y": 2, "z": 3},
            "velocity": {"x": 0, "y": 0, "z": 0},
            "state": "Patrolling", "tactic": "Kite",
            "order": {"type": "Move", "targetPos": {"x": 5, "y": 0, "z": 0}},
            "isAttacking": true
        }"#;
        let fleet: Fleet = serde_json::from_str(json).unwrap();
        assert_eq!(fleet.kind, FleetType::Bomber);
        assert_eq!(fleet.unit_count(), 1);
        assert_eq!(fleet.state, FleetState::Patrolling);
        assert!(fleet.is_attacking);
        assert_eq!(
            fleet.order.unwrap().move_target(),
            Some(Vec3::new(5.0, 0.0, 0.0))
        );
    }

    #[test]
    fn colony_level_uses_display_names() {
        let level: ColonyLevel = serde_json::from_str("\"Starport Hub\"").unwrap();
        assert_eq!(level, ColonyLevel::StarportHub);
    }

    #[test]
    fn action_kind_falls_back_to_general() {
        let kind: ActionKind = serde_json::from_str("\"level-up\"").unwrap();
        assert_eq!(kind, ActionKind::LevelUp);
        let kind: ActionKind = serde_json::from_str("\"celebrate\"").unwrap();
        assert_eq!(kind, ActionKind::General);
    }

    #[test]
    fn colony_change_residents_saturates() {
        let mut c = fixtures::colony("c1", "Alpha");
        c.change_residents(-500);
        assert_eq!(c.residents, 0);
        c.change_residents(42);
        assert_eq!(c.residents, 42);
    }

    #[test]
    fn colony_add_and_remove_fleet() {
        let mut c = fixtures::colony("c1", "Alpha");
        c.add_fleet(Fleet::new("f1", FleetType::Scout, Vec3::X));
        c.add_fleet(Fleet::new("f2", FleetType::Fighter, Vec3::Y));
        assert_eq!(c.fleets().len(), 2);
        c.remove_fleet("f1");
        assert!(c.fleet("f1").is_none());
        assert!(c.fleet("f2").is_some());
    }

    #[test]
    fn fleet_zero_count_means_one_ship() {
        let mut f = Fleet::new("f", FleetType::Attacker, Vec3::ZERO);
        f.count = Some(0);
        assert_eq!(f.unit_count(), 1);
    }
}
