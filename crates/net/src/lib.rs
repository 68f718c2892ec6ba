//! Server link: the JSON wire protocol, the reconciler that applies inbound messages
//! to the colony store, and the keepalive connection over a pluggable transport.

pub mod connection;
pub mod protocol;
pub mod reconcile;

pub use connection::*;
pub use protocol::*;
pub use reconcile::*;
