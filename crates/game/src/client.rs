//! Host wiring: one frame-driven client owning the store, the reconciler, the fleet
//! simulation, combat, surface placement and the server connection.

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use colony::{ActionLog, Colony, ColonyStore, FleetOrder, Subscription};
use engine_core::{Transform, TransformRaw};
use fleet::{CombatSystem, FleetPose, FleetSimulation, ProjectileView, SimTuning};
use net::{Applied, ClientMessage, Connection, PlayPhase, Reconciler, Transport};
use physics::{PhysicsWorld, StructureKey, StructureKind, SurfacePlacement};

/// Counters from one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameSummary {
    pub reports_sent: usize,
    pub fired: usize,
    pub retired: usize,
}

pub struct GameClient<T: Transport> {
    store: ColonyStore,
    reconciler: Reconciler,
    sim: FleetSimulation,
    combat: CombatSystem,
    physics: PhysicsWorld,
    placement: SurfacePlacement,
    connection: Option<Connection<T>>,
    /// Set by the store listener; the world is re-synced on the next frame.
    dirty: Rc<Cell<bool>>,
    _subscription: Subscription,
}

impl<T: Transport> GameClient<T> {
    pub fn new(tuning: SimTuning, rng_seed: Option<u64>) -> Self {
        let mut store = ColonyStore::new();
        let dirty = Rc::new(Cell::new(false));
        let flag = Rc::clone(&dirty);
        let subscription = store.subscribe(move |_| flag.set(true));

        Self {
            store,
            reconciler: Reconciler::new(),
            sim: FleetSimulation::new(tuning),
            combat: CombatSystem::new(&tuning, rng_seed),
            physics: PhysicsWorld::new(),
            placement: SurfacePlacement::new(),
            connection: None,
            dirty,
            _subscription: subscription,
        }
    }

    /// Attach a server link (sends the hello and arms the keepalive).
    pub fn connect(&mut self, transport: T, ping_interval: f32) {
        self.connection = Some(Connection::open(transport, ping_interval));
    }

    /// Tear the link down. Live projectiles and cooldowns go with it.
    pub fn disconnect(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            connection.close();
        }
        self.combat.clear();
    }

    pub fn is_connected(&self) -> bool {
        self.connection.as_ref().is_some_and(Connection::is_open)
    }

    /// Feed one inbound text frame.
    pub fn handle_message(&mut self, text: &str) -> Applied {
        self.reconciler.handle_text(text, &mut self.store)
    }

    /// Install colonies without a server (offline play).
    pub fn load_colonies(&mut self, colonies: Vec<Colony>) {
        self.store.replace_all(colonies);
    }

    /// Apply a player order to the prediction right away.
    pub fn issue_order(&mut self, fleet_id: &str, order: FleetOrder) -> bool {
        self.sync_if_dirty();
        self.sim.issue_order(fleet_id, order)
    }

    /// Change the selected colony. Returns whether the change counts as the player's own,
    /// or `None` for an unknown colony.
    pub fn select_colony(&mut self, colony_id: &str) -> Option<bool> {
        if !self.store.set_active(colony_id) {
            return None;
        }
        Some(self.reconciler.take_user_initiated_selection())
    }

    /// Advance one frame.
    pub fn tick(&mut self, dt: f32) -> FrameSummary {
        self.sync_if_dirty();
        if self.placement.pending_count() > 0 {
            self.placement.update(&self.physics);
        }

        self.sim.tick(dt, &self.placement);
        let combat = self.combat.update(&self.sim, &self.placement, dt);

        let mut summary = FrameSummary {
            reports_sent: 0,
            fired: combat.fired,
            retired: combat.retired.len(),
        };

        let reports = self.sim.drain_reports();
        if let Some(connection) = self.connection.as_mut() {
            connection.tick(dt);
            for report in reports {
                if connection.send(&ClientMessage::FleetReport(report)).is_err() {
                    break;
                }
                summary.reports_sent += 1;
            }
        }
        summary
    }

    fn sync_if_dirty(&mut self) {
        if !self.dirty.replace(false) {
            return;
        }
        let colonies = self.store.colonies();

        let outcome = self.sim.sync(colonies);
        for id in &outcome.despawned {
            self.combat.remove_fleet(id);
        }

        let mut keys = HashSet::new();
        for colony in colonies {
            let planet = colony.planet.frame();
            self.physics
                .upsert_planet(&colony.id, planet.center, planet.scale);

            let base = StructureKey::main_base(&colony.id);
            self.placement.request(
                base.clone(),
                &colony.id,
                planet,
                colony.planet.planet_main_base.into(),
            );
            keys.insert(base);

            let facilities = colony
                .planet
                .oil_pumps()
                .iter()
                .map(|f| (StructureKind::OilPump, f))
                .chain(
                    colony
                        .planet
                        .steel_factories()
                        .iter()
                        .map(|f| (StructureKind::SteelFactory, f)),
                );
            for (kind, facility) in facilities {
                let key = StructureKey::facility(&colony.id, kind, &facility.id);
                self.placement
                    .request(key.clone(), &colony.id, planet, facility.position.into());
                keys.insert(key);
            }
        }

        let ids: HashSet<&str> = colonies.iter().map(|c| c.id.as_str()).collect();
        self.physics.retain_planets(|id| ids.contains(id));
        self.placement.retain(|key| keys.contains(key));
        self.placement.update(&self.physics);
    }

    pub fn colonies(&self) -> &[Colony] {
        self.store.colonies()
    }

    pub fn store(&self) -> &ColonyStore {
        &self.store
    }

    pub fn actions(&self) -> &ActionLog {
        self.reconciler.actions()
    }

    pub fn phase(&self) -> &PlayPhase {
        self.reconciler.phase()
    }

    pub fn simulation(&self) -> &FleetSimulation {
        &self.sim
    }

    pub fn fleet_poses(&self) -> Vec<FleetPose> {
        self.sim.poses()
    }

    pub fn projectiles(&self) -> Vec<ProjectileView> {
        self.combat.projectiles()
    }

    pub fn placement(&self) -> &SurfacePlacement {
        &self.placement
    }

    /// GPU instance data: every ship, every placed structure, every live projectile.
    pub fn render_instances(&self) -> Vec<TransformRaw> {
        let ships = self.sim.poses().into_iter().flat_map(|pose| {
            let rotation = pose.rotation;
            pose.ships
                .into_iter()
                .map(move |ship| TransformRaw::from(Transform::from_position_rotation(ship, rotation)))
        });
        let structures = self.placement.anchors().map(|(key, anchor)| {
            let scale = self
                .store
                .colony(&key.colony_id)
                .map_or(1.0, |c| c.planet.scale);
            TransformRaw::from(anchor.transform(scale))
        });
        let projectiles = self
            .combat
            .projectiles()
            .into_iter()
            .map(|p| TransformRaw::from(p.transform()));

        ships.chain(structures).chain(projectiles).collect()
    }

    /// [`Self::render_instances`] as raw bytes for an instance-buffer upload.
    pub fn instance_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.render_instances()).to_vec()
    }
}
