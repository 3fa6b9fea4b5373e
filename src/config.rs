//! Environment-backed settings.
//!
//! | Variable                     | Required | Purpose                          |
//! |------------------------------|----------|----------------------------------|
//! | `TWILIO_ACCOUNT_SID`         | yes      | basic-auth user                  |
//! | `TWILIO_AUTH_TOKEN`          | yes      | basic-auth password              |
//! | `TWILIO_SYNC_SERVICES_SID`   | yes      | Sync service holding the map     |
//! | `TWILIO_WORKSPACE_SID`       | yes      | `TaskRouter` workspace           |
//! | `TWILIO_IVR_WORKFLOW_SID`    | yes      | workflow IVR tasks are sent to   |
//! | `TWILIO_SYNC_BASE_URL`       | no       | Sync API override                |
//! | `TWILIO_TASKROUTER_BASE_URL` | no       | `TaskRouter` API override        |
//!
//! Blank values count as unset.

use crate::call_state::adapters::twilio::DEFAULT_SYNC_BASE_URL;
use crate::ivr_task::adapters::twilio::DEFAULT_TASKROUTER_BASE_URL;
use crate::ivr_task::domain::{TaskDomainError, WorkflowSid};
use crate::twilio::TwilioCredentials;
use secrecy::SecretString;
use std::sync::Arc;
use thiserror::Error;

const ACCOUNT_SID: &str = "TWILIO_ACCOUNT_SID";
const AUTH_TOKEN: &str = "TWILIO_AUTH_TOKEN";
const SYNC_SERVICE_SID: &str = "TWILIO_SYNC_SERVICES_SID";
const WORKSPACE_SID: &str = "TWILIO_WORKSPACE_SID";
const IVR_WORKFLOW_SID: &str = "TWILIO_IVR_WORKFLOW_SID";
const SYNC_BASE_URL: &str = "TWILIO_SYNC_BASE_URL";
const TASKROUTER_BASE_URL: &str = "TWILIO_TASKROUTER_BASE_URL";

/// Errors raised while loading settings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("missing required setting {0}")]
    Missing(&'static str),

    /// A variable is set but invalid.
    #[error("invalid setting {name}: {source}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Validation failure.
        source: TaskDomainError,
    },
}

/// Settings for the Twilio-backed handler.
#[derive(Debug)]
pub struct Settings {
    credentials: Arc<TwilioCredentials>,
    sync_service_sid: String,
    workspace_sid: String,
    ivr_workflow_sid: WorkflowSid,
    sync_base_url: String,
    taskrouter_base_url: String,
}

impl Settings {
    /// Loads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads settings through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let require = |name: &'static str| read(name).ok_or(ConfigError::Missing(name));

        let ivr_workflow_sid =
            WorkflowSid::new(require(IVR_WORKFLOW_SID)?).map_err(|source| ConfigError::Invalid {
                name: IVR_WORKFLOW_SID,
                source,
            })?;

        Ok(Self {
            credentials: Arc::new(TwilioCredentials::new(
                require(ACCOUNT_SID)?,
                SecretString::from(require(AUTH_TOKEN)?),
            )),
            sync_service_sid: require(SYNC_SERVICE_SID)?,
            workspace_sid: require(WORKSPACE_SID)?,
            ivr_workflow_sid,
            sync_base_url: read(SYNC_BASE_URL).unwrap_or_else(|| DEFAULT_SYNC_BASE_URL.to_owned()),
            taskrouter_base_url: read(TASKROUTER_BASE_URL)
                .unwrap_or_else(|| DEFAULT_TASKROUTER_BASE_URL.to_owned()),
        })
    }

    /// Returns the API credentials.
    #[must_use]
    pub fn credentials(&self) -> Arc<TwilioCredentials> {
        Arc::clone(&self.credentials)
    }

    /// Returns the Sync service SID.
    #[must_use]
    pub fn sync_service_sid(&self) -> &str {
        &self.sync_service_sid
    }

    /// Returns the `TaskRouter` workspace SID.
    #[must_use]
    pub fn workspace_sid(&self) -> &str {
        &self.workspace_sid
    }

    /// Returns the workflow IVR tasks are submitted into.
    #[must_use]
    pub const fn ivr_workflow_sid(&self) -> &WorkflowSid {
        &self.ivr_workflow_sid
    }

    /// Returns the Sync API base URL.
    #[must_use]
    pub fn sync_base_url(&self) -> &str {
        &self.sync_base_url
    }

    /// Returns the `TaskRouter` API base URL.
    #[must_use]
    pub fn taskrouter_base_url(&self) -> &str {
        &self.taskrouter_base_url
    }
}
