//! Ballistics for attacking fleets.
//!
//! Every ship of an armed fleet carries its own firing cooldown. Projectiles live in a
//! private ECS world as plain components and are retired on a hit, on passing their
//! frozen target point, or when their lifetime runs out. Damage is not resolved here.

use std::collections::{HashMap, HashSet};

use engine_core::{Lifetime, Quat, Transform, Velocity, Vec3};
use hecs::{Entity, World};
use physics::AnchorLookup;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::{FleetSimulation, WORLD_UP};
use crate::profile::{FleetProfile, ProjectileStyle, WeaponProfile};
use crate::tuning::SimTuning;

/// Projectile component.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub origin: Vec3,
    /// Target point frozen at spawn.
    pub target: Vec3,
    /// Distance to `target` after the previous integration step.
    pub last_distance: f32,
    pub style: ProjectileStyle,
    /// Firing fleet.
    pub owner: String,
}

/// Why a projectile left the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetireReason {
    Hit,
    Passed,
    Expired,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetiredProjectile {
    pub position: Vec3,
    pub owner: String,
    pub reason: RetireReason,
}

/// Renderer view of one live projectile.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileView {
    pub position: Vec3,
    pub rotation: Quat,
    pub style: ProjectileStyle,
}

impl ProjectileView {
    pub fn transform(&self) -> Transform {
        Transform::from_position_rotation(self.position, self.rotation)
    }
}

/// What happened during one combat update.
#[derive(Debug, Clone, Default)]
pub struct CombatReport {
    pub fired: usize,
    pub retired: Vec<RetiredProjectile>,
}

pub struct CombatSystem {
    world: World,
    /// Per-ship firing cooldowns (seconds), keyed by fleet id.
    gunners: HashMap<String, Vec<f32>>,
    rng: StdRng,
    hit_radius: f32,
    ttl_buffer: f32,
}

impl CombatSystem {
    /// `seed` fixes cooldown rolls; `None` seeds from entropy.
    pub fn new(tuning: &SimTuning, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            world: World::new(),
            gunners: HashMap::new(),
            rng,
            hit_radius: tuning.hit_radius,
            ttl_buffer: tuning.ttl_buffer,
        }
    }

    /// Advance live projectiles, then let every attacking fleet fire.
    pub fn update(
        &mut self,
        sim: &FleetSimulation,
        anchors: &impl AnchorLookup,
        dt: f32,
    ) -> CombatReport {
        let mut report = CombatReport {
            fired: 0,
            retired: self.integrate(dt),
        };

        let live: HashSet<&str> = sim.tracks().map(|t| t.id.as_str()).collect();
        self.gunners.retain(|id, _| live.contains(id.as_str()));

        for track in sim.tracks() {
            let Some(weapon) = FleetProfile::of(track.kind).weapon else {
                continue;
            };
            let Some(pose) = sim.pose(&track.id) else {
                continue;
            };

            let rng = &mut self.rng;
            let cooldowns = self.gunners.entry(track.id.clone()).or_default();
            if cooldowns.len() != pose.ships.len() {
                // New ships join staggered so a fleet never fires as one volley.
                cooldowns.resize_with(pose.ships.len(), || {
                    rng.gen_range(0.0..=weapon.cooldown_max)
                });
            }
            for cooldown in cooldowns.iter_mut() {
                *cooldown = (*cooldown - dt).max(0.0);
            }

            if !track.is_attacking {
                continue;
            }
            let Some(target) = sim.resolve_target(track, anchors) else {
                continue;
            };

            let mut shots = Vec::new();
            for (cooldown, ship) in cooldowns.iter_mut().zip(&pose.ships) {
                if *cooldown <= 0.0 {
                    *cooldown = rng.gen_range(weapon.cooldown_min..=weapon.cooldown_max);
                    shots.push(*ship);
                }
            }
            for origin in shots {
                if self
                    .spawn_projectile(origin, target, &weapon, &track.id)
                    .is_some()
                {
                    report.fired += 1;
                }
            }
        }

        if report.fired > 0 || !report.retired.is_empty() {
            log::trace!(
                "Combat: fired {}, retired {}, live {}",
                report.fired,
                report.retired.len(),
                self.projectile_count()
            );
        }
        report
    }

    /// Spawn one projectile aimed at `target`. Nothing spawns when the shooter already sits
    /// inside the hit radius.
    pub fn spawn_projectile(
        &mut self,
        origin: Vec3,
        target: Vec3,
        weapon: &WeaponProfile,
        owner: &str,
    ) -> Option<Entity> {
        let distance = origin.distance(target);
        if distance <= self.hit_radius || weapon.projectile_speed <= 0.0 {
            return None;
        }
        let direction = (target - origin) / distance;
        let ttl = distance / weapon.projectile_speed + self.ttl_buffer;
        let mut transform = Transform::from_position(origin);
        transform.look_at(target, WORLD_UP);

        Some(self.world.spawn((
            transform,
            Velocity::new(direction * weapon.projectile_speed),
            Lifetime::new(ttl),
            Projectile {
                origin,
                target,
                last_distance: distance,
                style: weapon.style,
                owner: owner.to_string(),
            },
        )))
    }

    fn integrate(&mut self, dt: f32) -> Vec<RetiredProjectile> {
        let mut retired = Vec::new();
        let mut dead = Vec::new();

        for (entity, (transform, velocity, lifetime, projectile)) in self
            .world
            .query_mut::<(&mut Transform, &Velocity, &mut Lifetime, &mut Projectile)>()
        {
            transform.translate(velocity.linear * dt);
            let expired = lifetime.update(dt);
            let distance = transform.position.distance(projectile.target);

            let reason = if distance <= self.hit_radius {
                Some(RetireReason::Hit)
            } else if distance > projectile.last_distance {
                Some(RetireReason::Passed)
            } else if expired {
                Some(RetireReason::Expired)
            } else {
                None
            };
            projectile.last_distance = distance;

            if let Some(reason) = reason {
                dead.push(entity);
                retired.push(RetiredProjectile {
                    position: transform.position,
                    owner: projectile.owner.clone(),
                    reason,
                });
            }
        }

        for entity in dead {
            self.world.despawn(entity).ok();
        }
        retired
    }

    pub fn projectiles(&self) -> Vec<ProjectileView> {
        self.world
            .query::<(&Transform, &Projectile)>()
            .iter()
            .map(|(_, (transform, projectile))| ProjectileView {
                position: transform.position,
                rotation: transform.rotation,
                style: projectile.style,
            })
            .collect()
    }

    pub fn projectile_count(&self) -> usize {
        self.world.len() as usize
    }

    pub fn has_gunners(&self, fleet_id: &str) -> bool {
        self.gunners.contains_key(fleet_id)
    }

    /// Release a fleet's cooldowns. Its projectiles in flight keep flying.
    pub fn remove_fleet(&mut self, fleet_id: &str) {
        self.gunners.remove(fleet_id);
    }

    /// Drop every projectile and cooldown.
    pub fn clear(&mut self) {
        self.world.clear();
        self.gunners.clear();
    }
}
