//! Identifier and scalar types for the IVR task domain.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned to a task by the task-routing service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskSid(String);

impl TaskSid {
    /// Creates a validated task SID.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTaskSid`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(TaskDomainError::EmptyTaskSid);
        }
        Ok(Self(raw))
    }

    /// Builds a task SID from an optional inbound field.
    ///
    /// Missing and blank values both mean "no task".
    #[must_use]
    pub fn from_optional(value: Option<String>) -> Option<Self> {
        value.and_then(|raw| Self::new(raw).ok())
    }

    /// Returns the SID as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskSid {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskSid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Workflow that new IVR tasks are submitted into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowSid(String);

impl WorkflowSid {
    /// Creates a validated workflow SID.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyWorkflowSid`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyWorkflowSid);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the SID as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkflowSid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sequence of menu choices taken so far, as reported by the IVR flow.
///
/// The path is opaque to this crate and stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IvrPath(String);

impl IvrPath {
    /// Wraps a raw IVR path.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the path as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IvrPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
