//! Service layer for creating and canceling IVR tasks.

use crate::call_state::domain::CallSid;
use crate::ivr_task::{
    domain::{
        AssignmentStatus, CanceledTask, IvrPath, NewTask, TaskSid, TaskUpdate, WorkflowSid,
        cancellation_attributes, creation_attributes, elapsed_seconds, parse_attributes,
    },
    ports::{TaskRouter, TaskRouterError},
};
use mockable::Clock;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Task channel every IVR task is created on.
pub const IVR_TASK_CHANNEL: &str = "voice";

/// Reason recorded when an IVR task is canceled because the caller moved on.
pub const CANCELLATION_REASON: &str = "IVR path selected";

/// Service-level errors for IVR task operations.
#[derive(Debug, Error)]
pub enum IvrTaskError {
    /// Task-routing operation failed.
    #[error(transparent)]
    Router(#[from] TaskRouterError),
}

impl IvrTaskError {
    /// Returns the HTTP status carried by the underlying failure, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Router(err) => err.status(),
        }
    }
}

/// Result type for IVR task service operations.
pub type IvrTaskResult<T> = Result<T, IvrTaskError>;

/// IVR task lifecycle service.
///
/// Failures are never retried: task-routing errors are fatal for the
/// invocation that triggered them.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: TaskRouter,
    C: Clock + Send + Sync,
{
    router: Arc<R>,
    clock: Arc<C>,
    workflow_sid: WorkflowSid,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRouter,
    C: Clock + Send + Sync,
{
    /// Creates a new IVR task lifecycle service.
    #[must_use]
    pub const fn new(router: Arc<R>, clock: Arc<C>, workflow_sid: WorkflowSid) -> Self {
        Self {
            router,
            clock,
            workflow_sid,
        }
    }

    /// Returns the workflow new tasks are submitted into.
    #[must_use]
    pub const fn workflow_sid(&self) -> &WorkflowSid {
        &self.workflow_sid
    }

    /// Creates the task representing a call's new IVR step.
    ///
    /// # Errors
    ///
    /// Returns [`IvrTaskError::Router`] when the task-routing service rejects
    /// the task or cannot be reached.
    pub async fn create_ivr_task(
        &self,
        call_sid: &CallSid,
        first_ivr_task: Option<&TaskSid>,
        ivr_path: &IvrPath,
    ) -> IvrTaskResult<TaskSid> {
        info!(call_sid = %call_sid, ivr_path = %ivr_path, "creating IVR task");
        let request = NewTask {
            workflow_sid: self.workflow_sid.clone(),
            task_channel: IVR_TASK_CHANNEL.to_owned(),
            attributes: creation_attributes(call_sid, first_ivr_task, ivr_path),
        };

        let record = self
            .router
            .create_task(&request)
            .await
            .inspect_err(|err| error!(call_sid = %call_sid, error = %err, "error creating task"))?;

        info!(call_sid = %call_sid, task_sid = %record.sid(), "task created");
        Ok(record.sid().clone())
    }

    /// Cancels the task for the IVR step the caller just left.
    ///
    /// The task is fetched first so that its attributes can be merged rather
    /// than replaced, and so the time spent in the step can be derived from
    /// its creation timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`IvrTaskError::Router`] when the fetch or the update fails.
    pub async fn cancel_active_task(
        &self,
        task_sid: &TaskSid,
        ivr_path: &IvrPath,
    ) -> IvrTaskResult<CanceledTask> {
        info!(task_sid = %task_sid, "canceling task");
        let record = self
            .router
            .fetch_task(task_sid)
            .await
            .inspect_err(|err| error!(task_sid = %task_sid, error = %err, "error fetching task"))?;

        let ivr_time = elapsed_seconds(record.date_created(), self.clock.utc());
        let existing = parse_attributes(record.attributes()).unwrap_or_else(|err| {
            warn!(task_sid = %task_sid, error = %err, "task attributes are not valid JSON");
            Value::Object(Map::new())
        });
        let attributes = cancellation_attributes(existing, ivr_path, ivr_time);

        let update = TaskUpdate {
            attributes: attributes.clone(),
            assignment_status: AssignmentStatus::Canceled,
            reason: CANCELLATION_REASON.to_owned(),
        };
        self.router
            .update_task(task_sid, &update)
            .await
            .inspect_err(|err| error!(task_sid = %task_sid, error = %err, "error canceling task"))?;

        info!(task_sid = %task_sid, ivr_time, "task canceled");
        Ok(CanceledTask {
            sid: task_sid.clone(),
            ivr_time,
            attributes,
        })
    }
}
