//! Top-level handler: JSON event in, reply out.

use crate::call_state::ports::SyncStore;
use crate::ivr_task::{domain::TaskSid, ports::TaskRouter};
use crate::transition::{
    domain::{FailureResponse, HandlerResponse, RoutingEvent},
    services::{IvrTransitionCoordinator, IvrTransitionError},
};
use mockable::Clock;
use serde_json::Value;
use tracing::{debug, error};

/// Converts routing events into replies.
///
/// Every fatal error becomes a [`FailureResponse`]; soft failures absorbed by
/// the call-state ladder never reach the caller.
pub struct IvrMetricsHandler<R, S, C>
where
    R: TaskRouter,
    S: SyncStore,
    C: Clock + Send + Sync,
{
    coordinator: IvrTransitionCoordinator<R, S, C>,
}

impl<R, S, C> IvrMetricsHandler<R, S, C>
where
    R: TaskRouter,
    S: SyncStore,
    C: Clock + Send + Sync,
{
    /// Wraps a coordinator.
    #[must_use]
    pub const fn new(coordinator: IvrTransitionCoordinator<R, S, C>) -> Self {
        Self { coordinator }
    }

    /// Handles one JSON routing event.
    pub async fn handle(&self, payload: &Value) -> HandlerResponse {
        log_event_properties(payload);
        match self.apply(payload).await {
            Ok(task_sid) => HandlerResponse::success(task_sid),
            Err(err) => {
                let failure = FailureResponse::new(&err, err.status());
                error!(
                    status = failure.status_code,
                    message = %failure.body.message,
                    "routing event failed"
                );
                HandlerResponse::Failure(failure)
            }
        }
    }

    async fn apply(&self, payload: &Value) -> Result<Option<TaskSid>, IvrTransitionError> {
        let event = RoutingEvent::from_json(payload)?;
        let outcome = self.coordinator.apply(&event).await?;
        Ok(outcome.task_sid)
    }
}

fn log_event_properties(payload: &Value) {
    debug!("event properties:");
    if let Value::Object(fields) = payload {
        for (key, value) in fields {
            debug!("{}", property_line(key, value));
        }
    }
}

/// Formats one event property as `key: value`, with strings left unquoted.
pub(crate) fn property_line(key: &str, value: &Value) -> String {
    match value.as_str() {
        Some(text) => format!("{key}: {text}"),
        None => format!("{key}: {value}"),
    }
}
