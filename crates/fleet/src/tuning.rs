//! Simulation constants. Loaded as part of the client config; every field has a default.
//! Distances and speeds are world units, whatever the planet scale.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimTuning {
    /// Move orders complete once the fleet is this close to the target.
    pub arrival_threshold: f32,
    /// Travel speed under a Move order (world units per second).
    pub max_speed: f32,
    /// Below this effective speed the fleet stops turning toward its travel direction.
    pub orient_epsilon: f32,
    /// Slerp rate per second toward the desired orientation.
    pub turn_rate: f32,
    /// Authoritative positions further than this from the prediction are snapped to.
    pub snap_threshold: f32,
    /// Minimum seconds between upstream reports for one fleet.
    pub report_interval: f32,
    /// Orbit radius used when a fleet sits exactly on its planet center.
    pub fallback_orbit_radius: f32,
    /// Projectiles closer than this to their target point count as hits.
    pub hit_radius: f32,
    /// Extra lifetime on top of the nominal flight time.
    pub ttl_buffer: f32,
}

impl Default for SimTuning {
    fn default() -> Self {
        Self {
            arrival_threshold: 0.2,
            max_speed: 1.5,
            orient_epsilon: 0.01,
            turn_rate: 2.0,
            snap_threshold: 5.0,
            report_interval: 0.1,
            fallback_orbit_radius: 3.0,
            hit_radius: 0.25,
            ttl_buffer: 0.25,
        }
    }
}
