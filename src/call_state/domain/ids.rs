//! Identifier types for the call-state domain.

use super::CallStateDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique name of the map holding one entry per call.
pub const CALL_STATE_MAP_NAME: &str = "CallCacheIvrMetrics";

/// Opaque identifier of one phone call session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallSid(String);

impl CallSid {
    /// Creates a validated call SID.
    ///
    /// # Errors
    ///
    /// Returns [`CallStateDomainError::EmptyCallSid`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, CallStateDomainError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(CallStateDomainError::EmptyCallSid);
        }
        Ok(Self(raw))
    }

    /// Returns the SID as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CallSid {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CallSid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique name of a sync map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncMapName(String);

impl SyncMapName {
    /// Creates a validated map name.
    ///
    /// # Errors
    ///
    /// Returns [`CallStateDomainError::EmptyMapName`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, CallStateDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CallStateDomainError::EmptyMapName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the well-known call-state map name.
    #[must_use]
    pub fn call_state() -> Self {
        Self(CALL_STATE_MAP_NAME.to_owned())
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SyncMapName {
    fn default() -> Self {
        Self::call_state()
    }
}

impl fmt::Display for SyncMapName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
