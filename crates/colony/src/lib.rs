//! Authoritative colony state for the client: the wire data model, delta patches,
//! the subscribable store and the action-event log.

pub mod actions;
pub mod model;
pub mod patch;
pub mod seed;
pub mod store;

pub use actions::*;
pub use model::*;
pub use patch::*;
pub use seed::*;
pub use store::*;
