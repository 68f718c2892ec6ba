//! Fleet motion and combat: the per-frame integrator that predicts fleet poses between
//! authoritative updates, the formation layout, and the ballistics that run on top.

pub mod combat;
pub mod engine;
pub mod formation;
pub mod profile;
pub mod tuning;

pub use combat::*;
pub use engine::*;
pub use formation::*;
pub use profile::*;
pub use tuning::*;
