//! In-memory task-routing adapter for tests and local simulation.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::ivr_task::{
    domain::{AssignmentStatus, NewTask, TaskRecord, TaskSid, TaskUpdate, WorkflowSid},
    ports::{TaskRouter, TaskRouterError, TaskRouterResult},
};
use crate::twilio::ApiFailure;

/// Task-routing operation observed by [`InMemoryTaskRouter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRouterCall {
    /// A task creation request.
    Create,
    /// A fetch of the given task.
    Fetch(TaskSid),
    /// An update of the given task.
    Update(TaskSid),
}

/// Task held by [`InMemoryTaskRouter`], with the request metadata that the
/// wire record does not expose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTask {
    /// Current wire record.
    pub record: TaskRecord,
    /// Workflow the task was submitted into.
    pub workflow_sid: Option<WorkflowSid>,
    /// Channel the task was created on.
    pub task_channel: Option<String>,
    /// Reason recorded with the latest status change.
    pub reason: Option<String>,
}

/// Thread-safe in-memory task router.
///
/// Tasks are stamped with the injected clock and receive sequential SIDs.
/// Every port call is journaled so callers can assert on ordering.
pub struct InMemoryTaskRouter<C = DefaultClock> {
    state: Arc<RwLock<InMemoryRouterState>>,
    clock: Arc<C>,
}

impl<C> Clone for InMemoryTaskRouter<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
        }
    }
}

#[derive(Debug, Default)]
struct InMemoryRouterState {
    tasks: HashMap<TaskSid, StoredTask>,
    next_sequence: u64,
    journal: Vec<TaskRouterCall>,
    creation_failure: Option<ApiFailure>,
}

impl InMemoryTaskRouter<DefaultClock> {
    /// Creates an empty router using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl Default for InMemoryTaskRouter<DefaultClock> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error(err: impl std::fmt::Display) -> TaskRouterError {
    TaskRouterError::transport(std::io::Error::other(err.to_string()))
}

impl<C> InMemoryTaskRouter<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty router stamping tasks with `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryRouterState::default())),
            clock,
        }
    }

    /// Inserts a pre-existing task, replacing any task with the same SID.
    ///
    /// # Errors
    ///
    /// Returns router transport errors when lock acquisition fails.
    pub fn insert_task(&self, record: TaskRecord) -> TaskRouterResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.tasks.insert(
            record.sid().clone(),
            StoredTask {
                record,
                workflow_sid: None,
                task_channel: None,
                reason: None,
            },
        );
        Ok(())
    }

    /// Makes every subsequent task creation fail with `failure`.
    ///
    /// # Errors
    ///
    /// Returns router transport errors when lock acquisition fails.
    pub fn reject_creation(&self, failure: ApiFailure) -> TaskRouterResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.creation_failure = Some(failure);
        Ok(())
    }

    /// Returns a stored task.
    ///
    /// # Errors
    ///
    /// Returns router transport errors when lock acquisition fails.
    pub fn task(&self, sid: &TaskSid) -> TaskRouterResult<Option<StoredTask>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(sid).cloned())
    }

    /// Returns every stored task.
    ///
    /// # Errors
    ///
    /// Returns router transport errors when lock acquisition fails.
    pub fn tasks(&self) -> TaskRouterResult<Vec<StoredTask>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.values().cloned().collect())
    }

    /// Returns the port calls observed so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns router transport errors when lock acquisition fails.
    pub fn journal(&self) -> TaskRouterResult<Vec<TaskRouterCall>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.journal.clone())
    }
}

#[async_trait]
impl<C> TaskRouter for InMemoryTaskRouter<C>
where
    C: Clock + Send + Sync,
{
    async fn create_task(&self, task: &NewTask) -> TaskRouterResult<TaskRecord> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.journal.push(TaskRouterCall::Create);
        if let Some(failure) = state.creation_failure.clone() {
            return Err(TaskRouterError::Api(failure));
        }

        state.next_sequence += 1;
        let sid = TaskSid::new(format!("WT{:032x}", state.next_sequence))
            .map_err(|err| TaskRouterError::InvalidResponse(err.to_string()))?;
        let attributes = serde_json::to_string(&task.attributes).map_err(TaskRouterError::transport)?;
        let record = TaskRecord::new(sid.clone())
            .with_attributes(attributes)
            .with_date_created(self.clock.utc().to_rfc2822())
            .with_assignment_status(AssignmentStatus::Pending);

        state.tasks.insert(
            sid,
            StoredTask {
                record: record.clone(),
                workflow_sid: Some(task.workflow_sid.clone()),
                task_channel: Some(task.task_channel.clone()),
                reason: None,
            },
        );
        Ok(record)
    }

    async fn fetch_task(&self, sid: &TaskSid) -> TaskRouterResult<TaskRecord> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.journal.push(TaskRouterCall::Fetch(sid.clone()));
        state
            .tasks
            .get(sid)
            .map(|stored| stored.record.clone())
            .ok_or_else(|| TaskRouterError::NotFound(sid.clone()))
    }

    async fn update_task(
        &self,
        sid: &TaskSid,
        update: &TaskUpdate,
    ) -> TaskRouterResult<TaskRecord> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.journal.push(TaskRouterCall::Update(sid.clone()));
        let attributes =
            serde_json::to_string(&update.attributes).map_err(TaskRouterError::transport)?;
        let stored = state
            .tasks
            .get_mut(sid)
            .ok_or_else(|| TaskRouterError::NotFound(sid.clone()))?;

        stored.record = stored
            .record
            .clone()
            .with_attributes(attributes)
            .with_assignment_status(update.assignment_status);
        stored.reason = Some(update.reason.clone());
        Ok(stored.record.clone())
    }
}
