//! Domain model for call state.
//!
//! A call's only durable representation is a [`CallStateEntry`] stored under
//! the call SID in the call-state sync map.

mod entry;
mod error;
mod ids;
mod map;

pub use entry::CallStateEntry;
pub use error::CallStateDomainError;
pub use ids::{CALL_STATE_MAP_NAME, CallSid, SyncMapName};
pub use map::{CALL_STATE_TTL, SyncMap, SyncMapItem};
