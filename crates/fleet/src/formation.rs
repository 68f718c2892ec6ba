//! Cosmetic ship layout around a fleet's logical position.
//!
//! Offsets are in the fleet's own frame (forward is -Z, right is +X) and never feed back
//! into the simulated fleet position.

use colony::FleetType;
use engine_core::{Quat, Vec3};

use crate::profile::FleetProfile;

/// Unrotated offsets for `count` ships of `kind`.
///
/// Three ships fly a V: leader at the origin, wingmen behind and outward by one spacing.
/// Any other count is a line across the direction of travel, centered on the fleet.
pub fn formation_offsets(kind: FleetType, count: u32) -> Vec<Vec3> {
    let spacing = FleetProfile::of(kind).formation_spacing;
    let count = count.max(1);
    if count == 3 {
        return vec![
            Vec3::ZERO,
            Vec3::new(-spacing, 0.0, spacing),
            Vec3::new(spacing, 0.0, spacing),
        ];
    }
    let half = (count - 1) as f32 * 0.5;
    (0..count)
        .map(|i| Vec3::new((i as f32 - half) * spacing, 0.0, 0.0))
        .collect()
}

/// Ship positions for a fleet at `center` facing `rotation`.
pub fn ship_positions(center: Vec3, rotation: Quat, kind: FleetType, count: u32) -> Vec<Vec3> {
    formation_offsets(kind, count)
        .into_iter()
        .map(|offset| center + rotation * offset)
        .collect()
}
