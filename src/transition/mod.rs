//! IVR transition coordination.
//!
//! One routing event arrives each time a caller leaves or enters an IVR step.
//! The coordinator cancels the task for the step being left, creates the task
//! for the step being entered (unless the caller is leaving the menu), and
//! records the outcome in the call-state map. State lives only in the
//! external services, so every invocation is independent.
//!
//! - Domain types in [`domain`]
//! - Orchestration services in [`services`]

pub mod domain;
pub mod services;
