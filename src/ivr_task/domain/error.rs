//! Error types for IVR task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing IVR task domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task SID is empty after trimming.
    #[error("task SID must not be empty")]
    EmptyTaskSid,

    /// The workflow SID is empty after trimming.
    #[error("workflow SID must not be empty")]
    EmptyWorkflowSid,
}

/// Error returned while parsing assignment statuses reported by the
/// task-routing service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown assignment status: {0}")]
pub struct ParseAssignmentStatusError(pub String);
