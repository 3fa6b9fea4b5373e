//! Application services for IVR transitions.

mod coordinator;
mod handler;

pub use coordinator::{
    IvrTransitionCoordinator, IvrTransitionError, IvrTransitionResult, TransitionOutcome,
};
pub use handler::IvrMetricsHandler;
#[cfg(test)]
pub(crate) use handler::property_line;
