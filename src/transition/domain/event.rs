//! Inbound routing events.

use crate::call_state::domain::{CallSid, CallStateDomainError};
use crate::ivr_task::domain::{IvrPath, TaskSid};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Literal value of `isFinalIvrTask` that marks the caller leaving the menu.
///
/// The flag is compared as a string: anything else, including `"TRUE"`, a
/// JSON boolean or a missing field, means another step follows.
pub const FINAL_IVR_TASK_FLAG: &str = "true";

/// Wire form of a routing event, as posted by the IVR flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingEventPayload {
    /// Task for the step the caller is leaving.
    #[serde(default)]
    pub active_task_sid: Option<String>,
    /// Call the event belongs to.
    pub call_sid: String,
    /// First IVR task of the journey.
    #[serde(default)]
    pub first_ivr_task_sid: Option<String>,
    /// `"true"` when the caller is leaving the menu.
    #[serde(default)]
    pub is_final_ivr_task: Value,
    /// Path taken so far. Non-string values are kept as their JSON text.
    pub ivr_path: Value,
}

/// Errors raised while reading a routing event.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoutingEventError {
    /// The payload is missing required fields or has the wrong shape.
    #[error("malformed routing event: {0}")]
    Malformed(String),

    /// A field failed validation.
    #[error(transparent)]
    Invalid(#[from] CallStateDomainError),
}

/// Validated routing event.
///
/// Blank optional SIDs are treated as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingEvent {
    active_task: Option<TaskSid>,
    call_sid: CallSid,
    first_ivr_task: Option<TaskSid>,
    is_final: bool,
    ivr_path: IvrPath,
}

impl RoutingEvent {
    /// Creates an event for a caller entering a non-final step.
    #[must_use]
    pub const fn new(call_sid: CallSid, ivr_path: IvrPath) -> Self {
        Self {
            active_task: None,
            call_sid,
            first_ivr_task: None,
            is_final: false,
            ivr_path,
        }
    }

    /// Sets the task for the step the caller is leaving.
    #[must_use]
    pub fn with_active_task(mut self, task: TaskSid) -> Self {
        self.active_task = Some(task);
        self
    }

    /// Sets the first IVR task of the journey.
    #[must_use]
    pub fn with_first_ivr_task(mut self, task: TaskSid) -> Self {
        self.first_ivr_task = Some(task);
        self
    }

    /// Marks the caller as leaving the menu.
    #[must_use]
    pub const fn final_step(mut self) -> Self {
        self.is_final = true;
        self
    }

    /// Reads an event from its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingEventError`] when `callSid` or `ivrPath` is missing,
    /// or the call SID is blank.
    pub fn from_json(payload: &Value) -> Result<Self, RoutingEventError> {
        let wire = RoutingEventPayload::deserialize(payload)
            .map_err(|err| RoutingEventError::Malformed(err.to_string()))?;
        Self::try_from(wire)
    }

    /// Returns the task for the step being left, if any.
    #[must_use]
    pub const fn active_task(&self) -> Option<&TaskSid> {
        self.active_task.as_ref()
    }

    /// Returns the call SID.
    #[must_use]
    pub const fn call_sid(&self) -> &CallSid {
        &self.call_sid
    }

    /// Returns the first IVR task of the journey, if any.
    #[must_use]
    pub const fn first_ivr_task(&self) -> Option<&TaskSid> {
        self.first_ivr_task.as_ref()
    }

    /// Returns `true` when the caller is leaving the menu.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        self.is_final
    }

    /// Returns the IVR path.
    #[must_use]
    pub const fn ivr_path(&self) -> &IvrPath {
        &self.ivr_path
    }
}

impl TryFrom<RoutingEventPayload> for RoutingEvent {
    type Error = RoutingEventError;

    fn try_from(payload: RoutingEventPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            active_task: TaskSid::from_optional(payload.active_task_sid),
            call_sid: CallSid::new(payload.call_sid)?,
            first_ivr_task: TaskSid::from_optional(payload.first_ivr_task_sid),
            is_final: is_final_flag(&payload.is_final_ivr_task),
            ivr_path: ivr_path_from(payload.ivr_path)?,
        })
    }
}

fn is_final_flag(flag: &Value) -> bool {
    matches!(flag, Value::String(raw) if raw == FINAL_IVR_TASK_FLAG)
}

fn ivr_path_from(value: Value) -> Result<IvrPath, RoutingEventError> {
    match value {
        Value::String(path) => Ok(IvrPath::new(path)),
        Value::Null => Err(RoutingEventError::Malformed(
            "ivrPath must not be null".to_owned(),
        )),
        other => Ok(IvrPath::new(other.to_string())),
    }
}
