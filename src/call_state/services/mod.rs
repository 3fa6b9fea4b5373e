//! Application services for call-state recording.

mod client;
mod recorder;

pub use client::SyncMapClient;
pub use recorder::{
    CallStateError, CallStateRecorder, CallStateResult, RecordOutcome, UpsertPath,
};
