//! Sync map and sync map item snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Lifetime applied to the call-state map and to every item written to it.
///
/// Each write sets a fresh absolute expiry; it never extends a previous one.
pub const CALL_STATE_TTL: Duration = Duration::from_secs(86_400);

/// Snapshot of a sync map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncMap {
    /// Service-assigned map SID.
    pub sid: String,
    /// Unique name the map was created with.
    pub unique_name: Option<String>,
    /// Instant after which the map no longer exists.
    pub date_expires: Option<DateTime<Utc>>,
}

/// Snapshot of a sync map item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncMapItem {
    /// Item key.
    pub key: String,
    /// Item payload.
    pub data: Value,
    /// Instant after which the item no longer exists.
    pub date_expires: Option<DateTime<Utc>>,
}
