//! Replies returned to the IVR flow.

use crate::ivr_task::domain::TaskSid;
use serde::{Deserialize, Serialize};

/// Status reported on success.
pub const SUCCESS_STATUS: u16 = 200;

/// Status used when a failure carries no status of its own.
pub const FALLBACK_ERROR_STATUS: u16 = 500;

/// Prefix of every failure message.
pub const ERROR_MESSAGE_PREFIX: &str = "Error encountered. ";

/// Success payload: `{"taskSid": ..., "status": 200}`.
///
/// `taskSid` is omitted when the caller left the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    /// Task created for the step being entered.
    #[serde(rename = "taskSid", default, skip_serializing_if = "Option::is_none")]
    pub task_sid: Option<TaskSid>,
    /// Always [`SUCCESS_STATUS`].
    pub status: u16,
}

/// JSON body of a failure reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureBody {
    /// Always `false`.
    pub success: bool,
    /// Descriptive message, prefixed with [`ERROR_MESSAGE_PREFIX`].
    pub message: String,
}

/// HTTP-style failure reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureResponse {
    /// HTTP status code.
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// Reply body.
    pub body: FailureBody,
}

impl FailureResponse {
    /// Builds a failure reply from an error message and optional status.
    #[must_use]
    pub fn new(error: &impl std::fmt::Display, status: Option<u16>) -> Self {
        Self {
            status_code: status.unwrap_or(FALLBACK_ERROR_STATUS),
            body: FailureBody {
                success: false,
                message: format!("{ERROR_MESSAGE_PREFIX}{error}"),
            },
        }
    }
}

/// Reply to one routing event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HandlerResponse {
    /// Every step succeeded.
    Success(SuccessResponse),
    /// A fatal step failed.
    Failure(FailureResponse),
}

impl HandlerResponse {
    /// Success reply for the given task.
    #[must_use]
    pub const fn success(task_sid: Option<TaskSid>) -> Self {
        Self::Success(SuccessResponse {
            task_sid,
            status: SUCCESS_STATUS,
        })
    }

    /// Returns the HTTP status of the reply.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::Success(success) => success.status,
            Self::Failure(failure) => failure.status_code,
        }
    }

    /// Returns `true` for a success reply.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}
