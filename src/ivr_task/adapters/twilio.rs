//! `TaskRouter` REST adapter.
//!
//! Talks to `/v1/Workspaces/{workspace}/Tasks` with form-encoded requests and
//! HTTP basic auth.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::ivr_task::{
    domain::{AssignmentStatus, NewTask, TaskRecord, TaskSid, TaskUpdate},
    ports::{TaskRouter, TaskRouterError, TaskRouterResult},
};
use crate::twilio::{TwilioCredentials, api_failure, endpoint, path_segment};

/// Production base URL of the `TaskRouter` API.
pub const DEFAULT_TASKROUTER_BASE_URL: &str = "https://taskrouter.twilio.com";

/// Task router backed by the Twilio `TaskRouter` REST API.
#[derive(Debug, Clone)]
pub struct TwilioTaskRouter {
    client: Client,
    credentials: Arc<TwilioCredentials>,
    base_url: String,
    workspace_sid: String,
}

#[derive(Debug, Deserialize)]
struct TaskResource {
    sid: String,
    attributes: Option<String>,
    date_created: Option<String>,
    assignment_status: Option<String>,
}

impl TaskResource {
    fn into_record(self) -> TaskRouterResult<TaskRecord> {
        let sid = TaskSid::new(self.sid)
            .map_err(|err| TaskRouterError::InvalidResponse(err.to_string()))?;
        let mut record = TaskRecord::new(sid);
        if let Some(attributes) = self.attributes {
            record = record.with_attributes(attributes);
        }
        if let Some(date_created) = self.date_created {
            record = record.with_date_created(date_created);
        }
        if let Some(status) = self
            .assignment_status
            .as_deref()
            .and_then(|raw| AssignmentStatus::try_from(raw).ok())
        {
            record = record.with_assignment_status(status);
        }
        Ok(record)
    }
}

impl TwilioTaskRouter {
    /// Creates a router for `workspace_sid` against the production API.
    #[must_use]
    pub fn new(
        client: Client,
        credentials: Arc<TwilioCredentials>,
        workspace_sid: impl Into<String>,
    ) -> Self {
        Self {
            client,
            credentials,
            base_url: DEFAULT_TASKROUTER_BASE_URL.to_owned(),
            workspace_sid: workspace_sid.into(),
        }
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn tasks_url(&self) -> String {
        endpoint(
            &self.base_url,
            &format!("v1/Workspaces/{}/Tasks", path_segment(&self.workspace_sid)),
        )
    }

    fn task_url(&self, sid: &TaskSid) -> String {
        format!("{}/{}", self.tasks_url(), path_segment(sid.as_str()))
    }

    async fn read_task(
        response: Response,
        missing: Option<&TaskSid>,
    ) -> TaskRouterResult<TaskRecord> {
        let status = response.status();
        if !status.is_success() {
            if let (StatusCode::NOT_FOUND, Some(sid)) = (status, missing) {
                return Err(TaskRouterError::NotFound(sid.clone()));
            }
            return Err(TaskRouterError::Api(api_failure(response).await));
        }
        response
            .json::<TaskResource>()
            .await
            .map_err(|err| TaskRouterError::InvalidResponse(err.to_string()))?
            .into_record()
    }
}

#[async_trait]
impl TaskRouter for TwilioTaskRouter {
    async fn create_task(&self, task: &NewTask) -> TaskRouterResult<TaskRecord> {
        let attributes = serde_json::to_string(&task.attributes).map_err(TaskRouterError::transport)?;
        debug!(workflow_sid = %task.workflow_sid, "POST task");
        let response = self
            .credentials
            .authorize(self.client.post(self.tasks_url()))
            .form(&[
                ("Attributes", attributes.as_str()),
                ("TaskChannel", task.task_channel.as_str()),
                ("WorkflowSid", task.workflow_sid.as_str()),
            ])
            .send()
            .await
            .map_err(TaskRouterError::transport)?;
        Self::read_task(response, None).await
    }

    async fn fetch_task(&self, sid: &TaskSid) -> TaskRouterResult<TaskRecord> {
        debug!(task_sid = %sid, "GET task");
        let response = self
            .credentials
            .authorize(self.client.get(self.task_url(sid)))
            .send()
            .await
            .map_err(TaskRouterError::transport)?;
        Self::read_task(response, Some(sid)).await
    }

    async fn update_task(
        &self,
        sid: &TaskSid,
        update: &TaskUpdate,
    ) -> TaskRouterResult<TaskRecord> {
        let attributes =
            serde_json::to_string(&update.attributes).map_err(TaskRouterError::transport)?;
        debug!(task_sid = %sid, status = update.assignment_status.as_str(), "POST task update");
        let response = self
            .credentials
            .authorize(self.client.post(self.task_url(sid)))
            .form(&[
                ("Attributes", attributes.as_str()),
                ("AssignmentStatus", update.assignment_status.as_str()),
                ("Reason", update.reason.as_str()),
            ])
            .send()
            .await
            .map_err(TaskRouterError::transport)?;
        Self::read_task(response, Some(sid)).await
    }
}
