//! Application services for IVR task lifecycle orchestration.

mod lifecycle;

pub use lifecycle::{
    CANCELLATION_REASON, IVR_TASK_CHANNEL, IvrTaskError, IvrTaskResult, TaskLifecycleService,
};
