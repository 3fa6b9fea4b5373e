//! IVR metrics: call-to-task coordination for automated voice menus.
//!
//! Each call moving through an IVR is represented in the task-routing system
//! by at most one live task. As the caller moves between menu steps the
//! previous task is canceled (recording the time spent and the path taken)
//! and a new task is created, while a TTL-bounded sync map records which task
//! is currently active for the call.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure value types and attribute rules
//! - **Ports**: Abstract trait interfaces for the sync and task-routing services
//! - **Adapters**: In-memory and Twilio REST implementations of the ports
//!
//! # Modules
//!
//! - [`call_state`]: Sync map client and the call-state upsert ladder
//! - [`ivr_task`]: IVR task creation and cancellation
//! - [`transition`]: Routing-event coordinator and response handler
//! - [`config`]: Environment-backed settings
//! - [`twilio`]: Credentials and error envelopes shared by the REST adapters
//! - [`clock`]: Manually driven clock for deterministic flows

pub mod call_state;
pub mod clock;
pub mod config;
pub mod ivr_task;
pub mod transition;
pub mod twilio;
