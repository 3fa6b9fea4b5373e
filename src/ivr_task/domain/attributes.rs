//! Task attribute payloads written by the IVR flow.
//!
//! Reporting reads everything from the `conversations` object, so all IVR
//! metadata lives under that key:
//!
//! ```json
//! {
//!   "conversations": {
//!     "conversation_attribute_1": "<call sid>",
//!     "conversation_id": "<first IVR task sid>",
//!     "ivr_path": "<path so far>",
//!     "abandoned": "No",
//!     "ivr_time": 37
//!   }
//! }
//! ```
//!
//! `abandoned` and `ivr_time` are only present once the task is canceled.

use super::{IvrPath, TaskSid};
use crate::call_state::domain::CallSid;
use serde_json::{Map, Value};

/// Top-level attribute key holding reporting metadata.
pub const CONVERSATIONS_KEY: &str = "conversations";

/// Value recorded for `abandoned` when the caller advanced normally.
pub const ABANDONED_NO: &str = "No";

const CALL_SID_KEY: &str = "conversation_attribute_1";
const FIRST_TASK_KEY: &str = "conversation_id";
const IVR_PATH_KEY: &str = "ivr_path";
const IVR_TIME_KEY: &str = "ivr_time";
const ABANDONED_KEY: &str = "abandoned";

/// Builds the attributes for a freshly created IVR task.
///
/// `conversation_id` is omitted when the journey has no first task yet.
#[must_use]
pub fn creation_attributes(
    call_sid: &CallSid,
    first_ivr_task: Option<&TaskSid>,
    ivr_path: &IvrPath,
) -> Value {
    let mut conversations = Map::new();
    conversations.insert(
        CALL_SID_KEY.to_owned(),
        Value::String(call_sid.as_str().to_owned()),
    );
    if let Some(first) = first_ivr_task {
        conversations.insert(
            FIRST_TASK_KEY.to_owned(),
            Value::String(first.as_str().to_owned()),
        );
    }
    conversations.insert(
        IVR_PATH_KEY.to_owned(),
        Value::String(ivr_path.as_str().to_owned()),
    );

    let mut root = Map::new();
    root.insert(CONVERSATIONS_KEY.to_owned(), Value::Object(conversations));
    Value::Object(root)
}

/// Merges cancellation metadata into a task's existing attributes.
///
/// Every existing attribute is preserved. Inside `conversations`,
/// `abandoned`, `ivr_path` and `ivr_time` are overwritten. Non-object inputs
/// are treated as empty.
#[must_use]
pub fn cancellation_attributes(existing: Value, ivr_path: &IvrPath, ivr_time: u64) -> Value {
    let mut root = match existing {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    let mut conversations = match root.remove(CONVERSATIONS_KEY) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };

    conversations.insert(
        ABANDONED_KEY.to_owned(),
        Value::String(ABANDONED_NO.to_owned()),
    );
    conversations.insert(
        IVR_PATH_KEY.to_owned(),
        Value::String(ivr_path.as_str().to_owned()),
    );
    conversations.insert(IVR_TIME_KEY.to_owned(), Value::from(ivr_time));

    root.insert(CONVERSATIONS_KEY.to_owned(), Value::Object(conversations));
    Value::Object(root)
}

/// Parses the raw attribute string reported by the task-routing service.
///
/// A missing attribute string yields an empty object.
///
/// # Errors
///
/// Returns the JSON error when the string is present but malformed.
pub fn parse_attributes(raw: Option<&str>) -> Result<Value, serde_json::Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Value::Object(Map::new())),
        Some(text) => serde_json::from_str(text),
    }
}
