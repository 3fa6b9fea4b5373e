//! Task-routing port: create, fetch and update tasks in one workspace.

use crate::ivr_task::domain::{NewTask, TaskRecord, TaskSid, TaskUpdate};
use crate::twilio::ApiFailure;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task-routing operations.
pub type TaskRouterResult<T> = Result<T, TaskRouterError>;

/// Task-routing contract scoped to a single workspace.
#[async_trait]
pub trait TaskRouter: Send + Sync {
    /// Creates a task and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRouterError`] when the service rejects the task or
    /// cannot be reached.
    async fn create_task(&self, task: &NewTask) -> TaskRouterResult<TaskRecord>;

    /// Fetches the current state of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRouterError::NotFound`] when the task does not exist.
    async fn fetch_task(&self, sid: &TaskSid) -> TaskRouterResult<TaskRecord>;

    /// Applies an update to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRouterError::NotFound`] when the task does not exist.
    async fn update_task(&self, sid: &TaskSid, update: &TaskUpdate)
    -> TaskRouterResult<TaskRecord>;
}

/// Errors returned by task-routing adapters.
#[derive(Debug, Clone, Error)]
pub enum TaskRouterError {
    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskSid),

    /// The service answered with a non-success status.
    #[error(transparent)]
    Api(#[from] ApiFailure),

    /// The service answered with a body that could not be interpreted.
    #[error("malformed task-routing response: {0}")]
    InvalidResponse(String),

    /// Transport-level failure.
    #[error("task-routing transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRouterError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Returns the HTTP status associated with the failure, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound(_) => Some(404),
            Self::Api(failure) => Some(failure.status),
            Self::InvalidResponse(_) | Self::Transport(_) => None,
        }
    }
}
