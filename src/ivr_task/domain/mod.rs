//! Domain model for IVR tasks.
//!
//! Identifiers, the attribute payloads written on creation and cancellation,
//! and the elapsed-time rule used when a caller leaves a menu step.

mod attributes;
mod elapsed;
mod error;
mod ids;
mod task;

pub use attributes::{
    ABANDONED_NO, CONVERSATIONS_KEY, cancellation_attributes, creation_attributes,
    parse_attributes,
};
pub use elapsed::{elapsed_seconds, parse_timestamp};
pub use error::{ParseAssignmentStatusError, TaskDomainError};
pub use ids::{IvrPath, TaskSid, WorkflowSid};
pub use task::{AssignmentStatus, CanceledTask, NewTask, TaskRecord, TaskUpdate};
