//! Connections between tilemaps and the names used to key them.

pub mod kinds;
pub mod registry;

pub use kinds::ConnectionKinds;
pub use registry::{ConnectionId, ConnectionRegistry};
