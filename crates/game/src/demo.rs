//! Offline mode: seed a few colonies locally, give them fleets and orders, and run the
//! frame loop without a server.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;
use colony::{seed_colonies, Colony, Fleet, FleetOrder, FleetState, FleetTarget, FleetType};
use engine_core::{Time, Vec3};
use net::{Transport, TransportError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::MissedTickBehavior;

use crate::client::GameClient;
use crate::config::GameConfig;

/// Stand-in link for offline play; the demo never connects.
pub struct NoServer;

impl Transport for NoServer {
    fn send_text(&mut self, _text: String) -> Result<(), TransportError> {
        Err(TransportError::Closed)
    }
}

/// Fleets each demo colony starts with.
const DEMO_FLEETS: &[(FleetType, u32)] = &[
    (FleetType::Attacker, 3),
    (FleetType::Fighter, 4),
    (FleetType::Scout, 1),
];

/// Seeded colonies with fleets parked around their planets. The first colony's
/// attackers are already engaging the second colony.
pub fn demo_colonies(rng: &mut StdRng, count: usize) -> Result<Vec<Colony>> {
    let mut colonies = Vec::new();
    seed_colonies(rng, &mut colonies, count)?;

    for colony in &mut colonies {
        let center: Vec3 = colony.planet.position.into();
        let reach = colony.planet.scale * 3.0;
        for (n, (kind, count)) in DEMO_FLEETS.iter().enumerate() {
            let offset = Vec3::new(
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
            )
            .normalize_or(Vec3::X)
                * reach;
            let mut fleet = Fleet::new(format!("{}-fleet-{}", colony.id, n + 1), *kind, center + offset);
            fleet.count = Some(*count);
            colony.add_fleet(fleet);
        }
    }

    if colonies.len() >= 2 {
        let target_id = colonies[1].id.clone();
        if let Some(attacker) = colonies[0]
            .colony_fleet
            .as_mut()
            .and_then(|fleets| fleets.iter_mut().find(|f| f.kind == FleetType::Attacker))
        {
            attacker.state = FleetState::Attacking;
            attacker.is_attacking = true;
            attacker.target = Some(FleetTarget {
                id: Some(target_id),
                position: None,
            });
        }
    }
    Ok(colonies)
}

pub async fn run(config: &GameConfig) -> Result<()> {
    let mut rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let colonies = demo_colonies(&mut rng, config.seed_colonies)?;
    log::info!("Offline demo with {} colonies", colonies.len());

    // Scouts fly out to a random point near their planet.
    let orders: Vec<(String, FleetOrder)> = colonies
        .iter()
        .flat_map(|colony| {
            let center: Vec3 = colony.planet.position.into();
            colony
                .fleets()
                .iter()
                .filter(|f| f.kind == FleetType::Scout)
                .map(move |f| (f.id.clone(), center))
        })
        .map(|(id, center)| {
            let dest = center + Vec3::new(rng.gen_range(-8.0..=8.0), rng.gen_range(-8.0..=8.0), 6.0);
            (id, FleetOrder::move_to(dest))
        })
        .collect();

    let mut client: GameClient<NoServer> = GameClient::new(config.tuning, config.rng_seed);
    let home = colonies.first().map(|c| c.id.clone());
    client.load_colonies(colonies);
    for (fleet_id, order) in orders {
        client.issue_order(&fleet_id, order);
    }
    if let Some(home) = home {
        client.select_colony(&home);
    }

    let mut frames = tokio::time::interval(Duration::from_secs_f32(config.frame_delta()));
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut time = Time::new();
    let mut states: HashMap<String, FleetState> = HashMap::new();
    let mut fired = 0;
    let mut retired = 0;

    while time.elapsed_seconds() < config.demo_seconds {
        frames.tick().await;
        time.update();
        let frame = client.tick(time.delta_seconds());
        fired += frame.fired;
        retired += frame.retired;

        for track in client.simulation().tracks() {
            let previous = states.insert(track.id.clone(), track.state);
            if previous != Some(track.state) {
                log::info!("{} {:?} -> {:?}", track.id, previous, track.state);
            }
        }
        if time.frame_count() % u64::from(config.frame_rate.max(1)) == 0 {
            log::debug!(
                "t={:.1}s instance bytes={} projectiles={} fired={} retired={}",
                time.elapsed_seconds(),
                client.instance_bytes().len(),
                client.projectiles().len(),
                fired,
                retired
            );
        }
    }

    log::info!(
        "Demo finished: {} frames, {} shots fired, {} retired, {} structures placed",
        time.frame_count(),
        fired,
        retired,
        client.placement().anchors().count()
    );
    let home = client.store().active().map(|c| c.id.clone());
    for pose in client.fleet_poses() {
        if Some(&pose.colony_id) == home.as_ref() {
            log::info!("{} {:?} at {:?}", pose.fleet_id, pose.state, pose.position);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_colonies_are_stocked_and_engaged() {
        let mut rng = StdRng::seed_from_u64(3);
        let colonies = demo_colonies(&mut rng, 3).unwrap();
        assert_eq!(colonies.len(), 3);
        for colony in &colonies {
            assert_eq!(colony.fleets().len(), DEMO_FLEETS.len());
        }
        let attacker = &colonies[0].fleets()[0];
        assert!(attacker.is_attacking);
        assert_eq!(
            attacker.target.as_ref().and_then(|t| t.id.as_deref()),
            Some(colonies[1].id.as_str())
        );
    }

    #[test]
    fn demo_attackers_fire_at_colony_anchor() {
        let mut rng = StdRng::seed_from_u64(11);
        let colonies = demo_colonies(&mut rng, 2).unwrap();
        let mut client: GameClient<NoServer> = GameClient::new(Default::default(), Some(5));
        client.load_colonies(colonies);

        let mut fired = 0;
        for _ in 0..(4 * 60) {
            fired += client.tick(1.0 / 60.0).fired;
        }
        assert!(fired > 0);
    }
}
