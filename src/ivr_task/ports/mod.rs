//! Port contracts for the task-routing service.
//!
//! Ports define infrastructure-agnostic interfaces used by IVR task services.

pub mod router;

pub use router::{TaskRouter, TaskRouterError, TaskRouterResult};
