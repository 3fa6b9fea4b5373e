//! Adapter implementations of the sync store port.

pub mod memory;
pub mod twilio;
