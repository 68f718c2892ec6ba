//! Offline colony seeding: random planets that keep clear of each other.

use glam::Vec3;
use rand::Rng;
use thiserror::Error;

use crate::model::{Colony, ColonyLevel, NaturalResources, Planet, Vector2, Vector3};

/// Planets spawn inside `[-PLANET_SPREAD, PLANET_SPREAD]` on each axis.
pub const PLANET_SPREAD: f32 = 100.0;
/// Minimum distance between two planet centers.
pub const MIN_PLANET_SEPARATION: f32 = 20.0;
const MAX_PLACEMENT_ATTEMPTS: u32 = 1000;
const PLANET_MODELS: &[&str] = &["Planet_A"];

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("no free planet position after {0} attempts")]
    NoFreePosition(u32),
}

/// Random planet at least [`MIN_PLANET_SEPARATION`] away from every existing colony's planet.
pub fn random_planet<R: Rng>(rng: &mut R, existing: &[Colony]) -> Result<Planet, SeedError> {
    let taken: Vec<Vec3> = existing.iter().map(|c| c.planet.position.into()).collect();
    let mut attempts = 0;
    let position = loop {
        let candidate = Vec3::new(
            rng.gen_range(-PLANET_SPREAD..=PLANET_SPREAD),
            rng.gen_range(-PLANET_SPREAD..=PLANET_SPREAD),
            rng.gen_range(-PLANET_SPREAD..=PLANET_SPREAD),
        );
        if taken.iter().all(|p| p.distance(candidate) >= MIN_PLANET_SEPARATION) {
            break candidate;
        }
        attempts += 1;
        if attempts > MAX_PLACEMENT_ATTEMPTS {
            return Err(SeedError::NoFreePosition(MAX_PLACEMENT_ATTEMPTS));
        }
    };

    let tau = std::f32::consts::TAU;
    Ok(Planet {
        position: position.into(),
        scale: rng.gen_range(0.7..=1.3),
        rot: Vector3::new(
            rng.gen_range(0.0..tau),
            rng.gen_range(0.0..tau),
            rng.gen_range(0.0..tau),
        ),
        planet_model_name: PLANET_MODELS[rng.gen_range(0..PLANET_MODELS.len())].to_string(),
        planet_main_base: Vector2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-50.0..=50.0)),
        planet_natural_resources: NaturalResources {
            oil: rng.gen_range(0.0..=2.0),
            steel: rng.gen_range(0.0..=2.0),
            water: rng.gen_range(0.0..=2.0),
            temperature: rng.gen_range(0.0..=30.0),
            ..Default::default()
        },
        planet_resource_station: None,
        oil_pumps: None,
        steel_factories: None,
    })
}

/// Append `count` colonies named "Colony N" with random residents and colour.
pub fn seed_colonies<R: Rng>(
    rng: &mut R,
    existing: &mut Vec<Colony>,
    count: usize,
) -> Result<(), SeedError> {
    for _ in 0..count {
        let planet = random_planet(rng, existing)?;
        let n = existing.len() + 1;
        let colony = Colony {
            id: format!("colony-{:08x}", rng.gen::<u32>()),
            name: format!("Colony {n}"),
            residents: rng.gen_range(10..500),
            color: format!("#{:06x}", rng.gen_range(0..=0xFF_FFFFu32)),
            planet,
            colony_level: ColonyLevel::Colony,
            colony_fleet: None,
        };
        log::debug!("Seeded {} at {:?}", colony.name, colony.planet.position);
        existing.push(colony);
    }
    Ok(())
}
