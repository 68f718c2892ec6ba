//! Per-type fleet stats: formation spacing and weapon behaviour.

use colony::FleetType;

/// How a projectile is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileStyle {
    /// Short energy bolt.
    Bolt,
    /// Thin fast streak.
    Tracer,
    /// Slow heavy round.
    Torpedo,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponProfile {
    pub cooldown_min: f32,
    pub cooldown_max: f32,
    pub projectile_speed: f32,
    pub style: ProjectileStyle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FleetProfile {
    /// Distance between neighbouring ships in formation (wrapper-local units).
    pub formation_spacing: f32,
    /// `None` for unarmed types.
    pub weapon: Option<WeaponProfile>,
}

impl FleetProfile {
    /// Stats unique to each fleet type.
    pub fn of(kind: FleetType) -> Self {
        match kind {
            FleetType::Attacker => FleetProfile {
                formation_spacing: 0.6,
                weapon: Some(WeaponProfile {
                    cooldown_min: 1.0,
                    cooldown_max: 2.0,
                    projectile_speed: 12.0,
                    style: ProjectileStyle::Bolt,
                }),
            },
            FleetType::Flanker => FleetProfile {
                formation_spacing: 0.5,
                weapon: Some(WeaponProfile {
                    cooldown_min: 0.8,
                    cooldown_max: 1.6,
                    projectile_speed: 14.0,
                    style: ProjectileStyle::Bolt,
                }),
            },
            FleetType::Fighter => FleetProfile {
                formation_spacing: 0.4,
                weapon: Some(WeaponProfile {
                    cooldown_min: 0.5,
                    cooldown_max: 1.0,
                    projectile_speed: 18.0,
                    style: ProjectileStyle::Tracer,
                }),
            },
            FleetType::Bomber => FleetProfile {
                formation_spacing: 0.8,
                weapon: Some(WeaponProfile {
                    cooldown_min: 2.5,
                    cooldown_max: 3.5,
                    projectile_speed: 8.0,
                    style: ProjectileStyle::Torpedo,
                }),
            },
            FleetType::Scout => FleetProfile {
                formation_spacing: 0.35,
                weapon: None,
            },
        }
    }
}
