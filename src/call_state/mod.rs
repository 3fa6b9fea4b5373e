//! Durable call-to-active-task association.
//!
//! The association lives in a sync map that may not exist yet and that
//! expires after a day of inactivity. Writes go through a fallback ladder
//! (update, create item, create map, create item) so the map is provisioned
//! on demand. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod tests;
