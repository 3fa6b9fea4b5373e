//! Error types for call-state domain validation.

use thiserror::Error;

/// Errors returned while constructing call-state domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CallStateDomainError {
    /// The call SID is empty after trimming.
    #[error("call SID must not be empty")]
    EmptyCallSid,

    /// The sync map name is empty after trimming.
    #[error("sync map name must not be empty")]
    EmptyMapName,
}
