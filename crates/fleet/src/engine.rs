//! Fleet simulation: client-side prediction of fleet poses between authoritative updates.
//!
//! The simulation owns each fleet's predicted pose (position, velocity, orientation, state).
//! The colony store owns the authoritative record; [`FleetTrack::reconciled`] is the only
//! bridge between the two. Integration happens in each colony's wrapper frame.

use std::collections::{BTreeMap, HashMap, HashSet};

use colony::{
    Colony, Fleet, FleetOrder, FleetState, FleetTarget, FleetType, OrderType, Orientation, Vector3,
};
use engine_core::{
    look_at, look_rotation, reject_from, slerp_toward, Quat, Throttle, Vec3, WrapperFrame,
    LENGTH_EPSILON,
};
use physics::AnchorLookup;
use serde::Serialize;

use crate::formation::ship_positions;
use crate::tuning::SimTuning;

/// Up reference for travel orientation. Fixed so the target orientation can converge.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// One fleet's predicted state.
#[derive(Debug, Clone)]
pub struct FleetTrack {
    pub id: String,
    pub colony_id: String,
    pub kind: FleetType,
    pub count: u32,
    /// Wrapper-local position.
    pub position: Vec3,
    /// Wrapper-local velocity.
    pub velocity: Vec3,
    pub rotation: Quat,
    pub state: FleetState,
    pub order: Option<FleetOrder>,
    /// Shell radius held while Idle or Patrolling. `None` until established.
    pub orbit_radius: Option<f32>,
    pub is_attacking: bool,
    pub target: Option<FleetTarget>,
    authoritative: Fleet,
    throttle: Throttle,
}

impl FleetTrack {
    pub fn from_authoritative(
        colony_id: &str,
        fleet: &Fleet,
        frame: &WrapperFrame,
        tuning: &SimTuning,
    ) -> Self {
        Self {
            id: fleet.id.clone(),
            colony_id: colony_id.to_string(),
            kind: fleet.kind,
            count: fleet.unit_count(),
            position: frame.world_to_local_point(fleet.position.into()),
            velocity: frame.world_to_local_vector(fleet.velocity.into()),
            rotation: fleet.rotation.map(Quat::from).unwrap_or(Quat::IDENTITY),
            state: fleet.state,
            order: fleet.order.clone(),
            orbit_radius: None,
            is_attacking: fleet.is_attacking,
            target: fleet.target.clone(),
            authoritative: fleet.clone(),
            throttle: Throttle::new(tuning.report_interval),
        }
    }

    /// The last authoritative record this track was reconciled against.
    pub fn authoritative(&self) -> &Fleet {
        &self.authoritative
    }

    /// World-space destination of the current Move order, if any.
    pub fn move_target(&self) -> Option<Vec3> {
        self.order.as_ref().and_then(FleetOrder::move_target)
    }

    /// This track merged with a newer authoritative record.
    ///
    /// - Type, count, attack flag and target always follow the record.
    /// - A changed, non-empty authoritative order replaces the local one; the server
    ///   never completes a local order by sending none.
    /// - Without an active move, the orbit radius, state and velocity follow the record.
    /// - Position snaps to the record only when the prediction is off by more than
    ///   `snap_threshold` world units. Orientation is never snapped.
    pub fn reconciled(&self, auth: &Fleet, frame: &WrapperFrame, tuning: &SimTuning) -> Self {
        let mut next = self.clone();
        next.kind = auth.kind;
        next.count = auth.unit_count();
        next.is_attacking = auth.is_attacking;
        next.target = auth.target.clone();

        if auth.order != self.authoritative.order {
            if let Some(order) = &auth.order {
                next.order = Some(order.clone());
            }
        }

        let auth_local = frame.world_to_local_point(auth.position.into());
        if next.move_target().is_none() {
            let radius = auth_local.length();
            if radius > LENGTH_EPSILON {
                next.orbit_radius = Some(radius);
            }
            next.state = auth.state;
            next.velocity = frame.world_to_local_vector(auth.velocity.into());
        }

        let drift = frame.local_to_world_vector(auth_local - self.position).length();
        if drift > tuning.snap_threshold {
            log::debug!("Fleet {} drifted {:.2}; snapping to authoritative", self.id, drift);
            next.position = auth_local;
        }

        next.authoritative = auth.clone();
        next
    }
}

/// What the renderer needs for one fleet, in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct FleetPose {
    pub fleet_id: String,
    pub colony_id: String,
    pub kind: FleetType,
    pub position: Vec3,
    pub rotation: Quat,
    pub state: FleetState,
    /// One entry per ship, formation applied.
    pub ships: Vec<Vec3>,
}

/// Throttled upstream report of a predicted fleet pose (world space).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetReport {
    pub colony_id: String,
    pub fleet_id: String,
    pub position: Vector3,
    pub velocity: Vector3,
    pub rotation: Orientation,
    pub state: FleetState,
}

/// Fleets that appeared or vanished during a sync.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncOutcome {
    pub spawned: Vec<String>,
    pub despawned: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
struct StepOutcome {
    arrived: bool,
    changed: bool,
}

pub struct FleetSimulation {
    tuning: SimTuning,
    tracks: BTreeMap<String, FleetTrack>,
    frames: HashMap<String, WrapperFrame>,
    clock: f32,
    reports: Vec<FleetReport>,
}

impl Default for FleetSimulation {
    fn default() -> Self {
        Self::new(SimTuning::default())
    }
}

impl FleetSimulation {
    pub fn new(tuning: SimTuning) -> Self {
        Self {
            tuning,
            tracks: BTreeMap::new(),
            frames: HashMap::new(),
            clock: 0.0,
            reports: Vec::new(),
        }
    }

    pub fn tuning(&self) -> &SimTuning {
        &self.tuning
    }

    pub fn track(&self, fleet_id: &str) -> Option<&FleetTrack> {
        self.tracks.get(fleet_id)
    }

    pub fn tracks(&self) -> impl Iterator<Item = &FleetTrack> {
        self.tracks.values()
    }

    pub fn frame(&self, colony_id: &str) -> WrapperFrame {
        self.frames.get(colony_id).copied().unwrap_or_default()
    }

    /// Bring tracks in line with the store: spawn new fleets, reconcile changed records,
    /// drop fleets that are gone.
    pub fn sync(&mut self, colonies: &[Colony]) -> SyncOutcome {
        let mut outcome = SyncOutcome::default();
        let mut seen = HashSet::new();

        for colony in colonies {
            let frame = colony.planet.frame().wrapper();
            self.frames.insert(colony.id.clone(), frame);

            for fleet in colony.fleets() {
                seen.insert(fleet.id.clone());
                match self.tracks.get_mut(&fleet.id) {
                    Some(track) if track.colony_id != colony.id => {
                        *track = FleetTrack::from_authoritative(&colony.id, fleet, &frame, &self.tuning);
                    }
                    Some(track) => {
                        if track.authoritative != *fleet {
                            *track = track.reconciled(fleet, &frame, &self.tuning);
                        }
                    }
                    None => {
                        let track =
                            FleetTrack::from_authoritative(&colony.id, fleet, &frame, &self.tuning);
                        self.tracks.insert(fleet.id.clone(), track);
                        outcome.spawned.push(fleet.id.clone());
                    }
                }
            }
        }

        let colony_ids: HashSet<&str> = colonies.iter().map(|c| c.id.as_str()).collect();
        self.frames.retain(|id, _| colony_ids.contains(id.as_str()));

        self.tracks.retain(|id, _| {
            let keep = seen.contains(id);
            if !keep {
                outcome.despawned.push(id.clone());
            }
            keep
        });

        if !outcome.spawned.is_empty() || !outcome.despawned.is_empty() {
            log::debug!(
                "Fleet sync: +{} -{}",
                outcome.spawned.len(),
                outcome.despawned.len()
            );
        }
        outcome
    }

    /// Apply a player order before the server confirms it. Returns false for unknown fleets.
    pub fn issue_order(&mut self, fleet_id: &str, order: FleetOrder) -> bool {
        let Some(track) = self.tracks.get_mut(fleet_id) else {
            log::warn!("Order for unknown fleet {}", fleet_id);
            return false;
        };
        if order.kind == OrderType::Hold {
            track.velocity = Vec3::ZERO;
        }
        log::debug!("Fleet {} ordered {:?}", fleet_id, order.kind);
        track.order = Some(order);
        true
    }

    /// Advance every fleet by `dt` seconds.
    pub fn tick(&mut self, dt: f32, anchors: &impl AnchorLookup) {
        if dt <= 0.0 {
            return;
        }
        self.clock += dt;

        // Resolve attack targets before any track moves so every fleet aims at the same snapshot.
        let targets: HashMap<String, Vec3> = self
            .tracks
            .values()
            .filter(|t| t.is_attacking)
            .filter_map(|t| self.resolve_target(t, anchors).map(|p| (t.id.clone(), p)))
            .collect();

        for track in self.tracks.values_mut() {
            let frame = self.frames.get(&track.colony_id).copied().unwrap_or_default();
            let attack_target = targets
                .get(&track.id)
                .map(|world| frame.world_to_local_point(*world));
            let outcome = step_track(track, &frame, attack_target, dt, &self.tuning);

            let report = if outcome.arrived {
                track.throttle.force(self.clock);
                log::debug!("Fleet {} arrived", track.id);
                true
            } else {
                outcome.changed && track.throttle.ready(self.clock)
            };
            if report {
                self.reports.push(report_for(track, &frame));
            }
        }
    }

    /// Reports produced since the last drain.
    pub fn drain_reports(&mut self) -> Vec<FleetReport> {
        std::mem::take(&mut self.reports)
    }

    /// World-space point a track is attacking: explicit position, else a colony anchor,
    /// else another fleet.
    pub fn resolve_target(&self, track: &FleetTrack, anchors: &impl AnchorLookup) -> Option<Vec3> {
        let target = track.target.as_ref()?;
        if let Some(position) = target.position {
            return Some(position.into());
        }
        let id = target.id.as_deref()?;
        anchors
            .anchor_position(id)
            .or_else(|| self.world_position(id))
    }

    pub fn world_position(&self, fleet_id: &str) -> Option<Vec3> {
        let track = self.tracks.get(fleet_id)?;
        Some(self.frame(&track.colony_id).local_to_world_point(track.position))
    }

    pub fn pose(&self, fleet_id: &str) -> Option<FleetPose> {
        self.tracks.get(fleet_id).map(|track| self.pose_of(track))
    }

    pub fn poses(&self) -> Vec<FleetPose> {
        self.tracks.values().map(|track| self.pose_of(track)).collect()
    }

    fn pose_of(&self, track: &FleetTrack) -> FleetPose {
        let frame = self.frame(&track.colony_id);
        let ships = ship_positions(track.position, track.rotation, track.kind, track.count)
            .into_iter()
            .map(|local| frame.local_to_world_point(local))
            .collect();
        FleetPose {
            fleet_id: track.id.clone(),
            colony_id: track.colony_id.clone(),
            kind: track.kind,
            position: frame.local_to_world_point(track.position),
            rotation: track.rotation,
            state: track.state,
            ships,
        }
    }

    /// Drop every track (connection teardown).
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.frames.clear();
        self.reports.clear();
    }
}

fn report_for(track: &FleetTrack, frame: &WrapperFrame) -> FleetReport {
    FleetReport {
        colony_id: track.colony_id.clone(),
        fleet_id: track.id.clone(),
        position: frame.local_to_world_point(track.position).into(),
        velocity: frame.local_to_world_vector(track.velocity).into(),
        rotation: track.rotation.into(),
        state: track.state,
    }
}

/// One integration step for one fleet. Tuning distances and speeds are world units;
/// the track lives in its wrapper frame, so they are rescaled here.
fn step_track(
    track: &mut FleetTrack,
    frame: &WrapperFrame,
    attack_target: Option<Vec3>,
    dt: f32,
    tuning: &SimTuning,
) -> StepOutcome {
    let start_position = track.position;
    let start_state = track.state;
    let max_speed = tuning.max_speed / frame.scale;
    let arrival_threshold = tuning.arrival_threshold / frame.scale;

    if track.state.requires_orbit() && track.orbit_radius.is_none() {
        let radius = track.position.length();
        track.orbit_radius = Some(if radius > LENGTH_EPSILON {
            radius
        } else {
            tuning.fallback_orbit_radius / frame.scale
        });
    }

    let mut arrived = false;
    let mut destination = None;
    if let Some(target_world) = track.move_target() {
        let target = frame.world_to_local_point(target_world);
        let to_target = target - track.position;
        let distance = to_target.length();
        if distance > arrival_threshold {
            track.velocity = to_target / distance * max_speed;
            track.state = FleetState::Moving;
            // Settle into a fresh shell wherever the move ends.
            track.orbit_radius = None;
            destination = Some((target, distance));
        } else {
            track.velocity = Vec3::ZERO;
            track.order = None;
            track.state = FleetState::Idle;
            arrived = true;
        }
    }

    let step = track.velocity * dt;
    match destination {
        Some((target, distance)) if step.length() >= distance => track.position = target,
        _ => track.position += step,
    }

    let orbiting = track.state.requires_orbit();
    if orbiting {
        if let Some(radius) = track.orbit_radius {
            track.position = track.position.normalize_or(Vec3::X) * radius;
        }
    }

    let effective = if orbiting {
        reject_from(track.velocity, track.position)
    } else {
        track.velocity
    };

    let desired = if effective.length() > tuning.orient_epsilon {
        look_rotation(effective, WORLD_UP)
    } else if track.is_attacking && track.state != FleetState::Moving {
        attack_target.and_then(|target| look_at(track.position, target, WORLD_UP))
    } else {
        None
    };
    if let Some(desired) = desired {
        track.rotation = slerp_toward(track.rotation, desired, tuning.turn_rate, dt);
    }

    StepOutcome {
        arrived,
        changed: arrived || track.position != start_position || track.state != start_state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colony::{ColonyLevel, NaturalResources, Planet, Vector2};

    struct NoAnchors;

    impl AnchorLookup for NoAnchors {
        fn anchor_position(&self, _: &str) -> Option<Vec3> {
            None
        }
    }

    fn colony_with(fleets: Vec<Fleet>, center: Vec3, scale: f32) -> Colony {
        Colony {
            id: "c1".into(),
            name: "New Terra".into(),
            residents: 10,
            color: "#00ff00".into(),
            planet: Planet {
                position: center.into(),
                scale,
                rot: Vector3::new(0.4, 1.1, 0.0),
                planet_model_name: "Planet_A".into(),
                planet_main_base: Vector2::default(),
                planet_natural_resources: NaturalResources::default(),
                planet_resource_station: None,
                oil_pumps: None,
                steel_factories: None,
            },
            colony_level: ColonyLevel::Colony,
            colony_fleet: Some(fleets),
        }
    }

    fn sim_with(fleet: Fleet) -> FleetSimulation {
        let mut sim = FleetSimulation::default();
        sim.sync(&[colony_with(vec![fleet], Vec3::ZERO, 1.0)]);
        sim
    }

    fn run(sim: &mut FleetSimulation, seconds: f32, dt: f32) {
        let steps = (seconds / dt).ceil() as usize;
        for _ in 0..steps {
            sim.tick(dt, &NoAnchors);
        }
    }

    #[test]
    fn idle_fleet_holds_orbit_shell() {
        let mut fleet = Fleet::new("f1", FleetType::Fighter, Vec3::new(10.0, 0.0, 0.0));
        fleet.velocity = Vector3::new(0.0, 0.3, 0.8);
        let mut sim = sim_with(fleet);
        for i in 0..600 {
            let dt = if i % 3 == 0 { 1.0 / 30.0 } else { 1.0 / 144.0 };
            sim.tick(dt, &NoAnchors);
            let t = sim.track("f1").unwrap();
            assert!((t.position.length() - 10.0).abs() < 1e-3);
        }
        let t = sim.track("f1").unwrap();
        assert!(t.position.distance(Vec3::new(10.0, 0.0, 0.0)) > 1.0);
    }

    #[test]
    fn patrolling_fleet_holds_orbit_shell() {
        let mut fleet = Fleet::new("f1", FleetType::Scout, Vec3::new(0.0, 6.0, 0.0));
        fleet.state = FleetState::Patrolling;
        fleet.velocity = Vector3::new(0.9, 0.2, -0.4);
        let mut sim = sim_with(fleet);
        for i in 0..500 {
            let dt = [1.0 / 60.0, 1.0 / 15.0, 1.0 / 240.0][i % 3];
            sim.tick(dt, &NoAnchors);
            let t = sim.track("f1").unwrap();
            assert_eq!(t.state, FleetState::Patrolling);
            assert!((t.position.length() - 6.0).abs() < 1e-3);
        }
        assert_eq!(sim.track("f1").unwrap().orbit_radius, Some(6.0));
    }

    #[test]
    fn fleet_at_planet_center_takes_fallback_shell() {
        let mut sim = sim_with(Fleet::new("f1", FleetType::Fighter, Vec3::ZERO));
        sim.tick(1.0 / 60.0, &NoAnchors);
        let t = sim.track("f1").unwrap();
        let fallback = SimTuning::default().fallback_orbit_radius;
        assert_eq!(t.orbit_radius, Some(fallback));
        assert!((t.position.length() - fallback).abs() < 1e-4);
    }

    #[test]
    fn move_speed_is_world_units_on_scaled_planet() {
        let center = Vec3::new(40.0, 0.0, 0.0);
        let start = center + Vec3::new(6.0, 0.0, 0.0);
        let mut sim = FleetSimulation::default();
        sim.sync(&[colony_with(
            vec![Fleet::new("f1", FleetType::Attacker, start)],
            center,
            2.0,
        )]);
        sim.issue_order("f1", FleetOrder::move_to(start + Vec3::new(0.0, 0.0, 20.0)));
        run(&mut sim, 1.0, 1.0 / 50.0);
        let travelled = sim.world_position("f1").unwrap().distance(start);
        assert!((travelled - 1.5).abs() < 0.05, "travelled {}", travelled);
    }

    #[test]
    fn arrival_threshold_is_world_units_on_scaled_planet() {
        let start = Vec3::new(8.0, 0.0, 0.0);
        let mut sim = FleetSimulation::default();
        sim.sync(&[colony_with(
            vec![Fleet::new("f1", FleetType::Scout, start)],
            Vec3::ZERO,
            4.0,
        )]);
        sim.issue_order("f1", FleetOrder::move_to(start + Vec3::new(0.0, 0.5, 0.0)));
        sim.tick(1.0 / 60.0, &NoAnchors);
        assert_eq!(sim.track("f1").unwrap().state, FleetState::Moving);
        run(&mut sim, 2.0, 1.0 / 60.0);
        let t = sim.track("f1").unwrap();
        assert_eq!(t.state, FleetState::Idle);
        let world = sim.world_position("f1").unwrap();
        assert!(world.distance(start + Vec3::new(0.0, 0.5, 0.0)) <= 0.2 + 1e-4);
    }

    #[test]
    fn snap_threshold_is_world_units_on_scaled_planet() {
        let fleet_at = |p: Vec3| colony_with(vec![Fleet::new("f1", FleetType::Fighter, p)], Vec3::ZERO, 0.7);
        let mut sim = FleetSimulation::default();
        sim.sync(&[fleet_at(Vec3::new(7.0, 0.0, 0.0))]);
        sim.tick(0.1, &NoAnchors);

        sim.sync(&[fleet_at(Vec3::new(7.0, 4.0, 0.0))]);
        let world = sim.world_position("f1").unwrap();
        assert!(world.distance(Vec3::new(7.0, 0.0, 0.0)) < 1e-4);

        let far = Vec3::new(7.0, 6.0, 0.0);
        sim.sync(&[fleet_at(far)]);
        assert!(sim.world_position("f1").unwrap().distance(far) < 1e-4);
    }

    #[test]
    fn move_order_decreases_distance_until_arrival() {
        let mut sim = sim_with(Fleet::new("f1", FleetType::Attacker, Vec3::new(4.0, 0.0, 0.0)));
        let target = Vec3::new(4.0, 3.0, 2.0);
        assert!(sim.issue_order("f1", FleetOrder::move_to(target)));

        let mut last = f32::MAX;
        for _ in 0..10_000 {
            sim.tick(1.0 / 20.0, &NoAnchors);
            let t = sim.track("f1").unwrap();
            let d = t.position.distance(target);
            if t.order.is_none() {
                break;
            }
            assert!(d < last);
            last = d;
        }
        let t = sim.track("f1").unwrap();
        assert!(t.position.distance(target) <= 0.2);
        assert_eq!(t.velocity, Vec3::ZERO);
        assert!(t.order.is_none());
        assert_eq!(t.state, FleetState::Idle);
    }

    #[test]
    fn move_with_huge_step_never_overshoots() {
        let mut sim = sim_with(Fleet::new("f1", FleetType::Scout, Vec3::new(1.0, 0.0, 0.0)));
        sim.issue_order("f1", FleetOrder::move_to(Vec3::new(2.0, 0.0, 0.0)));
        sim.tick(5.0, &NoAnchors);
        assert_eq!(sim.track("f1").unwrap().position, Vec3::new(2.0, 0.0, 0.0));
        sim.tick(0.1, &NoAnchors);
        assert_eq!(sim.track("f1").unwrap().state, FleetState::Idle);
    }

    #[test]
    fn arrived_fleet_settles_into_new_shell() {
        let mut sim = sim_with(Fleet::new("f1", FleetType::Attacker, Vec3::new(3.0, 0.0, 0.0)));
        sim.issue_order("f1", FleetOrder::move_to(Vec3::new(6.0, 0.0, 0.0)));
        run(&mut sim, 5.0, 1.0 / 60.0);
        let t = sim.track("f1").unwrap();
        assert_eq!(t.state, FleetState::Idle);
        let r = t.orbit_radius.unwrap();
        assert!((r - 6.0).abs() <= 0.2);
        assert!((t.position.length() - r).abs() < 1e-4);
    }

    #[test]
    fn travel_orientation_faces_velocity() {
        let mut sim = sim_with(Fleet::new("f1", FleetType::Attacker, Vec3::ZERO));
        sim.issue_order("f1", FleetOrder::move_to(Vec3::new(0.0, 0.0, 30.0)));
        run(&mut sim, 3.0, 1.0 / 60.0);
        let forward = sim.track("f1").unwrap().rotation * -Vec3::Z;
        assert!((forward - Vec3::Z).length() < 0.05);
    }

    #[test]
    fn turn_is_gradual() {
        let mut sim = sim_with(Fleet::new("f1", FleetType::Attacker, Vec3::ZERO));
        sim.issue_order("f1", FleetOrder::move_to(Vec3::new(0.0, 0.0, 30.0)));
        sim.tick(1.0 / 60.0, &NoAnchors);
        let forward = sim.track("f1").unwrap().rotation * -Vec3::Z;
        assert!((forward - Vec3::Z).length() > 0.5);
    }

    #[test]
    fn attacking_fleet_faces_target() {
        let mut fleet = Fleet::new("f1", FleetType::Attacker, Vec3::new(5.0, 0.0, 0.0));
        fleet.is_attacking = true;
        fleet.state = FleetState::Attacking;
        fleet.target = Some(FleetTarget {
            id: None,
            position: Some(Vector3::new(25.0, 0.0, 0.0)),
        });
        let mut sim = sim_with(fleet);
        run(&mut sim, 3.0, 1.0 / 60.0);
        let forward = sim.track("f1").unwrap().rotation * -Vec3::Z;
        assert!((forward - Vec3::X).length() < 0.05);
    }

    #[test]
    fn authoritative_far_position_snaps() {
        let mut sim = sim_with(Fleet::new("f1", FleetType::Fighter, Vec3::new(10.0, 0.0, 0.0)));
        sim.tick(0.1, &NoAnchors);
        let auth_pos = Vec3::new(10.0, 7.0, 0.0);
        sim.sync(&[colony_with(
            vec![Fleet::new("f1", FleetType::Fighter, auth_pos)],
            Vec3::ZERO,
            1.0,
        )]);
        assert_eq!(sim.track("f1").unwrap().position, auth_pos);
        sim.tick(1.0 / 60.0, &NoAnchors);
        assert!(sim.track("f1").unwrap().position.distance(auth_pos) < 1e-4);
    }

    #[test]
    fn authoritative_near_position_only_moves_shell() {
        let mut sim = sim_with(Fleet::new("f1", FleetType::Fighter, Vec3::new(10.0, 0.0, 0.0)));
        sim.tick(0.1, &NoAnchors);
        let auth_pos = Vec3::new(10.0, 3.0, 0.0);
        sim.sync(&[colony_with(
            vec![Fleet::new("f1", FleetType::Fighter, auth_pos)],
            Vec3::ZERO,
            1.0,
        )]);
        let t = sim.track("f1").unwrap();
        assert_eq!(t.position, Vec3::new(10.0, 0.0, 0.0));
        assert!((t.orbit_radius.unwrap() - auth_pos.length()).abs() < 1e-4);

        sim.tick(1.0 / 60.0, &NoAnchors);
        let p = sim.track("f1").unwrap().position;
        assert!((p.length() - auth_pos.length()).abs() < 1e-4);
        assert!(p.normalize().distance(Vec3::X) < 1e-4);
    }

    #[test]
    fn authoritative_empty_order_keeps_local_move() {
        let mut sim = sim_with(Fleet::new("f1", FleetType::Fighter, Vec3::new(2.0, 0.0, 0.0)));
        sim.issue_order("f1", FleetOrder::move_to(Vec3::new(20.0, 0.0, 0.0)));
        sim.tick(0.5, &NoAnchors);
        let mut auth = Fleet::new("f1", FleetType::Fighter, Vec3::new(2.5, 0.0, 0.0));
        auth.hp_pool = Some(40.0);
        sim.sync(&[colony_with(vec![auth], Vec3::ZERO, 1.0)]);
        let t = sim.track("f1").unwrap();
        assert!(t.order.is_some());
        assert_eq!(t.state, FleetState::Moving);
    }

    #[test]
    fn authoritative_new_order_is_adopted() {
        let mut sim = sim_with(Fleet::new("f1", FleetType::Fighter, Vec3::new(2.0, 0.0, 0.0)));
        let mut auth = Fleet::new("f1", FleetType::Fighter, Vec3::new(2.0, 0.0, 0.0));
        auth.order = Some(FleetOrder::move_to(Vec3::new(2.0, 4.0, 0.0)));
        sim.sync(&[colony_with(vec![auth], Vec3::ZERO, 1.0)]);
        sim.tick(0.1, &NoAnchors);
        assert_eq!(sim.track("f1").unwrap().state, FleetState::Moving);
    }

    #[test]
    fn reports_are_throttled_but_arrival_is_not() {
        let mut sim = sim_with(Fleet::new("f1", FleetType::Fighter, Vec3::ZERO));
        sim.issue_order("f1", FleetOrder::move_to(Vec3::new(0.0, 0.0, 1.0)));
        run(&mut sim, 0.5, 1.0 / 100.0);
        let reports = sim.drain_reports();
        assert!(reports.len() <= 7, "got {} reports", reports.len());
        run(&mut sim, 1.0, 1.0 / 100.0);
        let reports = sim.drain_reports();
        assert!(reports.iter().any(|r| r.state == FleetState::Idle));
    }

    #[test]
    fn wrapper_frame_scales_motion() {
        let center = Vec3::new(100.0, 0.0, 0.0);
        let fleet = Fleet::new("f1", FleetType::Attacker, center + Vec3::new(4.0, 0.0, 0.0));
        let mut sim = FleetSimulation::default();
        sim.sync(&[colony_with(vec![fleet], center, 2.0)]);
        let t = sim.track("f1").unwrap();
        assert_eq!(t.position, Vec3::new(2.0, 0.0, 0.0));
        let world = sim.world_position("f1").unwrap();
        assert!((world - Vec3::new(104.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn sync_despawns_missing_fleets() {
        let mut sim = sim_with(Fleet::new("f1", FleetType::Scout, Vec3::X));
        let outcome = sim.sync(&[colony_with(
            vec![Fleet::new("f2", FleetType::Scout, Vec3::Y)],
            Vec3::ZERO,
            1.0,
        )]);
        assert_eq!(outcome.spawned, vec!["f2".to_string()]);
        assert_eq!(outcome.despawned, vec!["f1".to_string()]);
        assert!(sim.track("f1").is_none());
    }

    #[test]
    fn resolve_target_falls_back_to_fleet() {
        let mut attacker = Fleet::new("a", FleetType::Attacker, Vec3::X);
        attacker.target = Some(FleetTarget {
            id: Some("b".into()),
            position: None,
        });
        let defender = Fleet::new("b", FleetType::Scout, Vec3::new(0.0, 4.0, 0.0));
        let mut sim = FleetSimulation::default();
        sim.sync(&[colony_with(vec![attacker, defender], Vec3::ZERO, 1.0)]);
        let track = sim.track("a").unwrap();
        assert_eq!(
            sim.resolve_target(track, &NoAnchors),
            Some(Vec3::new(0.0, 4.0, 0.0))
        );
    }
}
