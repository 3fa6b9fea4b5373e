//! Task records and the requests the IVR flow issues against them.

use super::{ParseAssignmentStatusError, TaskSid, WorkflowSid};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Assignment status of a task in the task-routing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// Waiting for a worker reservation.
    Pending,
    /// Reserved by a worker.
    Reserved,
    /// Accepted by a worker.
    Assigned,
    /// Removed from the queue without being handled.
    Canceled,
    /// Worker is wrapping up.
    Wrapping,
    /// Handling finished.
    Completed,
}

impl AssignmentStatus {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reserved => "reserved",
            Self::Assigned => "assigned",
            Self::Canceled => "canceled",
            Self::Wrapping => "wrapping",
            Self::Completed => "completed",
        }
    }
}

impl TryFrom<&str> for AssignmentStatus {
    type Error = ParseAssignmentStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "reserved" => Ok(Self::Reserved),
            "assigned" => Ok(Self::Assigned),
            "canceled" => Ok(Self::Canceled),
            "wrapping" => Ok(Self::Wrapping),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseAssignmentStatusError(value.to_owned())),
        }
    }
}

/// Snapshot of a task as reported by the task-routing service.
///
/// Attributes and creation time are kept in their raw wire form; callers
/// decide how to interpret malformed values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    sid: TaskSid,
    attributes: Option<String>,
    date_created: Option<String>,
    assignment_status: Option<AssignmentStatus>,
}

impl TaskRecord {
    /// Creates a record with only an identifier.
    #[must_use]
    pub const fn new(sid: TaskSid) -> Self {
        Self {
            sid,
            attributes: None,
            date_created: None,
            assignment_status: None,
        }
    }

    /// Sets the raw JSON attribute string.
    #[must_use]
    pub fn with_attributes(mut self, attributes: impl Into<String>) -> Self {
        self.attributes = Some(attributes.into());
        self
    }

    /// Sets the raw creation timestamp.
    #[must_use]
    pub fn with_date_created(mut self, date_created: impl Into<String>) -> Self {
        self.date_created = Some(date_created.into());
        self
    }

    /// Sets the assignment status.
    #[must_use]
    pub const fn with_assignment_status(mut self, status: AssignmentStatus) -> Self {
        self.assignment_status = Some(status);
        self
    }

    /// Returns the task SID.
    #[must_use]
    pub const fn sid(&self) -> &TaskSid {
        &self.sid
    }

    /// Returns the raw JSON attribute string, if reported.
    #[must_use]
    pub fn attributes(&self) -> Option<&str> {
        self.attributes.as_deref()
    }

    /// Returns the raw creation timestamp, if reported.
    #[must_use]
    pub fn date_created(&self) -> Option<&str> {
        self.date_created.as_deref()
    }

    /// Returns the assignment status, if reported.
    #[must_use]
    pub const fn assignment_status(&self) -> Option<AssignmentStatus> {
        self.assignment_status
    }
}

/// Request to create a task.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    /// Workflow the task is submitted into.
    pub workflow_sid: WorkflowSid,
    /// Task channel unique name, e.g. `voice`.
    pub task_channel: String,
    /// Task attributes.
    pub attributes: Value,
}

/// Request to update an existing task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskUpdate {
    /// Replacement attributes.
    pub attributes: Value,
    /// Target assignment status.
    pub assignment_status: AssignmentStatus,
    /// Reason recorded with the status change.
    pub reason: String,
}

/// Result of canceling the task for the IVR step a caller left.
#[derive(Debug, Clone, PartialEq)]
pub struct CanceledTask {
    /// The canceled task.
    pub sid: TaskSid,
    /// Seconds the caller spent in the step.
    pub ivr_time: u64,
    /// Attributes written with the cancellation.
    pub attributes: Value,
}
