//! IVR task lifecycle in the task-routing system.
//!
//! Every non-final IVR step is represented by one task. When the caller
//! advances, the task for the step they leave is canceled and its attributes
//! are enriched with the path taken and the seconds spent in the step. The
//! module follows hexagonal architecture:
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
