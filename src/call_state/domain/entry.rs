//! The value stored for each call.

use crate::ivr_task::domain::TaskSid;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Record stored under a call SID: the task currently representing the call.
///
/// Once the caller leaves the menu the entry is kept with no `activeTask`
/// field at all (`{}`), rather than deleted or set to `null`, so that
/// "finished" stays distinguishable from "expired".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallStateEntry {
    #[serde(
        rename = "activeTask",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    active_task: Option<TaskSid>,
}

impl CallStateEntry {
    /// Entry naming `task` as the call's active task.
    #[must_use]
    pub const fn active(task: TaskSid) -> Self {
        Self {
            active_task: Some(task),
        }
    }

    /// Entry for a call that has left the menu.
    #[must_use]
    pub const fn finished() -> Self {
        Self { active_task: None }
    }

    /// Builds an entry from an optional task.
    #[must_use]
    pub const fn from_task(task: Option<TaskSid>) -> Self {
        Self { active_task: task }
    }

    /// Returns the active task, if any.
    #[must_use]
    pub const fn active_task(&self) -> Option<&TaskSid> {
        self.active_task.as_ref()
    }

    /// Encodes the entry as sync item data.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if encoding fails.
    pub fn to_data(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Decodes an entry from sync item data.
    ///
    /// A JSON `null` or empty string for `activeTask` is read as "no task".
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the data is not an object or the field has
    /// an unexpected type.
    pub fn from_data(data: &Value) -> Result<Self, serde_json::Error> {
        #[derive(Deserialize)]
        struct Wire {
            #[serde(rename = "activeTask", default)]
            active_task: Option<String>,
        }

        let wire = Wire::deserialize(data)?;
        Ok(Self {
            active_task: TaskSid::from_optional(wire.active_task),
        })
    }
}
