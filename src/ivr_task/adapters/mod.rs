//! Adapter implementations of the task-routing port.

pub mod memory;
pub mod twilio;
