//! Transition coordinator: one routing event, one store write.

use crate::call_state::{
    ports::SyncStore,
    services::{CallStateError, CallStateRecorder, RecordOutcome},
};
use crate::ivr_task::{
    domain::{CanceledTask, TaskSid},
    ports::TaskRouter,
    services::{IvrTaskError, TaskLifecycleService},
};
use crate::transition::domain::{RoutingEvent, RoutingEventError};
use mockable::Clock;
use thiserror::Error;
use tracing::info;

/// Errors that abort a transition.
#[derive(Debug, Error)]
pub enum IvrTransitionError {
    /// The routing event could not be read.
    #[error(transparent)]
    InvalidEvent(#[from] RoutingEventError),

    /// Task creation or cancellation failed.
    #[error(transparent)]
    Task(#[from] IvrTaskError),

    /// The call-state ladder was exhausted.
    #[error(transparent)]
    CallState(#[from] CallStateError),
}

impl IvrTransitionError {
    /// Returns the HTTP status carried by the failure, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidEvent(_) => Some(400),
            Self::Task(err) => err.status(),
            Self::CallState(err) => err.status(),
        }
    }
}

/// Result type for transition operations.
pub type IvrTransitionResult<T> = Result<T, IvrTransitionError>;

/// Effects of one applied transition.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOutcome {
    /// Task created for the step being entered; `None` on the final step.
    pub task_sid: Option<TaskSid>,
    /// Task canceled for the step being left, if there was one.
    pub canceled: Option<CanceledTask>,
    /// Call-state write.
    pub recorded: RecordOutcome,
}

/// Applies routing events to the task-routing and sync services.
///
/// Steps run strictly in order, each only after the previous one succeeded:
///
/// 1. cancel the task for the step being left, when the event names one;
/// 2. on a non-final step, create the task for the step being entered;
/// 3. record the new active task (or none) for the call.
///
/// Cancellation never touches the call-state map, so the map is written
/// exactly once per event, after any cancellation. Two overlapping events
/// for the same call are not serialized; the last write wins.
pub struct IvrTransitionCoordinator<R, S, C>
where
    R: TaskRouter,
    S: SyncStore,
    C: Clock + Send + Sync,
{
    tasks: TaskLifecycleService<R, C>,
    call_state: CallStateRecorder<S>,
}

impl<R, S, C> IvrTransitionCoordinator<R, S, C>
where
    R: TaskRouter,
    S: SyncStore,
    C: Clock + Send + Sync,
{
    /// Creates a coordinator over the given services.
    #[must_use]
    pub const fn new(tasks: TaskLifecycleService<R, C>, call_state: CallStateRecorder<S>) -> Self {
        Self { tasks, call_state }
    }

    /// Applies one routing event.
    ///
    /// # Errors
    ///
    /// Returns [`IvrTransitionError::Task`] when cancellation or creation
    /// fails and [`IvrTransitionError::CallState`] when the call state cannot
    /// be recorded. Effects of steps that already succeeded are not rolled
    /// back.
    pub async fn apply(&self, event: &RoutingEvent) -> IvrTransitionResult<TransitionOutcome> {
        let call_sid = event.call_sid();
        let ivr_path = event.ivr_path();

        let canceled = match event.active_task() {
            Some(active) => Some(self.tasks.cancel_active_task(active, ivr_path).await?),
            None => None,
        };

        let task_sid = if event.is_final() {
            info!(call_sid = %call_sid, "final IVR step, no new task");
            None
        } else {
            Some(
                self.tasks
                    .create_ivr_task(call_sid, event.first_ivr_task(), ivr_path)
                    .await?,
            )
        };

        let recorded = self.call_state.record(call_sid, task_sid.as_ref()).await?;
        Ok(TransitionOutcome {
            task_sid,
            canceled,
            recorded,
        })
    }
}
