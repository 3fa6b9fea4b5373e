//! Shared helpers for Twilio adapter tests.

use ivr_metrics::{
    call_state::adapters::twilio::TwilioSyncStore, ivr_task::adapters::twilio::TwilioTaskRouter,
    twilio::TwilioCredentials,
};
use mockito::Matcher;
use secrecy::SecretString;
use std::sync::Arc;

/// Boxed error used by adapter tests.
pub type TestError = Box<dyn std::error::Error + Send + Sync>;

/// Sync service SID used by every test.
pub const SERVICE_SID: &str = "IS123";

/// `TaskRouter` workspace SID used by every test.
pub const WORKSPACE_SID: &str = "WS123";

/// Expected `Authorization` header for the test credentials.
pub const BASIC_AUTH: &str = "Basic QUMxMjM6c2VjcmV0";

/// Base path of the call-state map's items.
pub const ITEMS_PATH: &str = "/v1/Services/IS123/Maps/CallCacheIvrMetrics/Items";

/// Base path of the workspace's tasks.
pub const TASKS_PATH: &str = "/v1/Workspaces/WS123/Tasks";

fn credentials() -> Arc<TwilioCredentials> {
    Arc::new(TwilioCredentials::new(
        "AC123",
        SecretString::from("secret".to_owned()),
    ))
}

/// Builds a sync store pointed at `base_url`.
#[must_use]
pub fn sync_store(base_url: &str) -> TwilioSyncStore {
    TwilioSyncStore::new(reqwest::Client::new(), credentials(), SERVICE_SID).with_base_url(base_url)
}

/// Builds a task router pointed at `base_url`.
#[must_use]
pub fn task_router(base_url: &str) -> TwilioTaskRouter {
    TwilioTaskRouter::new(reqwest::Client::new(), credentials(), WORKSPACE_SID)
        .with_base_url(base_url)
}

/// Matches a form-encoded body containing every given field.
#[must_use]
pub fn form(fields: &[(&str, &str)]) -> Matcher {
    Matcher::AllOf(
        fields
            .iter()
            .map(|(key, value)| Matcher::UrlEncoded((*key).to_owned(), (*value).to_owned()))
            .collect(),
    )
}

/// JSON body of a sync map item.
#[must_use]
pub fn item_body(key: &str, data: &str) -> String {
    format!(
        r#"{{"key":"{key}","data":{data},"date_expires":"2024-05-15T18:00:00Z","map_sid":"MP1"}}"#
    )
}

/// JSON body of a task.
#[must_use]
pub fn task_body(sid: &str, attributes: &str, status: &str) -> String {
    let escaped = serde_json::to_string(attributes).unwrap_or_default();
    format!(
        r#"{{"sid":"{sid}","attributes":{escaped},"assignment_status":"{status}","date_created":"2024-05-14T18:50:02Z"}}"#
    )
}

/// Twilio error envelope.
#[must_use]
pub fn error_body(status: u16, code: u32, message: &str) -> String {
    format!(r#"{{"code":{code},"message":"{message}","status":{status}}}"#)
}
