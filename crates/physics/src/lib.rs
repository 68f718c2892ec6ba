//! Surface-placement geometry using Rapier3D ray casts against planet colliders.

pub mod physics_world;
pub mod placement;
pub mod raycast;

pub use physics_world::*;
pub use placement::*;
pub use raycast::*;

// Re-export Rapier for downstream crates
pub use rapier3d;

// Re-export common Rapier types
pub use rapier3d::prelude::ColliderHandle;
