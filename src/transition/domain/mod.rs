//! Domain model for IVR transitions.

mod event;
mod response;

pub use event::{FINAL_IVR_TASK_FLAG, RoutingEvent, RoutingEventError, RoutingEventPayload};
pub use response::{
    ERROR_MESSAGE_PREFIX, FALLBACK_ERROR_STATUS, FailureBody, FailureResponse, HandlerResponse,
    SUCCESS_STATUS, SuccessResponse,
};
