//! Call-state upsert ladder.

use crate::call_state::{
    domain::{CALL_STATE_TTL, CallSid, CallStateEntry, SyncMapItem, SyncMapName},
    ports::SyncStore,
    services::SyncMapClient,
};
use crate::ivr_task::domain::TaskSid;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

/// Errors returned once every fallback step has been exhausted.
#[derive(Debug, Error)]
pub enum CallStateError {
    /// Both writes missed and the map could not be created.
    #[error("Error creating Sync Map. Unable to update call Sync Map.")]
    MapCreation,

    /// The map was created but the item still could not be written.
    #[error("Error creating Sync Map Item. Unable to update call Sync Map.")]
    ItemCreation,

    /// The entry could not be encoded as item data.
    #[error("failed to encode call state: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl CallStateError {
    /// Returns the HTTP status carried by the failure, if any.
    ///
    /// Ladder exhaustion carries none; the handler falls back to 500.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        None
    }
}

/// Result type for call-state operations.
pub type CallStateResult<T> = Result<T, CallStateError>;

/// Which rung of the ladder recorded the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertPath {
    /// The existing item was overwritten.
    Updated,
    /// The item was created in an existing map.
    Created,
    /// The map was created first, then the item.
    Bootstrapped,
}

/// Entry recorded for a call and how it got there.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordOutcome {
    /// Item as reported by the store.
    pub item: SyncMapItem,
    /// Rung that succeeded.
    pub path: UpsertPath,
}

/// Records each call's active task in the call-state map.
///
/// The map is provisioned lazily and may expire between calls, so a write
/// walks a fixed ladder, first success wins:
///
/// 1. update the item,
/// 2. create the item,
/// 3. create the map (failure here is fatal),
/// 4. create the item again (failure here is fatal).
///
/// Update comes first because the map and item normally already exist from a
/// previous menu step. Every successful write sets a fresh TTL.
pub struct CallStateRecorder<S>
where
    S: SyncStore,
{
    client: SyncMapClient<S>,
    map: SyncMapName,
    ttl: Duration,
}

impl<S> Clone for CallStateRecorder<S>
where
    S: SyncStore,
{
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            map: self.map.clone(),
            ttl: self.ttl,
        }
    }
}

impl<S> CallStateRecorder<S>
where
    S: SyncStore,
{
    /// Creates a recorder writing to the well-known call-state map.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            client: SyncMapClient::new(store),
            map: SyncMapName::call_state(),
            ttl: CALL_STATE_TTL,
        }
    }

    /// Writes to `map` instead of the well-known map.
    #[must_use]
    pub fn with_map(mut self, map: SyncMapName) -> Self {
        self.map = map;
        self
    }

    /// Returns the map entries are written to.
    #[must_use]
    pub const fn map(&self) -> &SyncMapName {
        &self.map
    }

    /// Records `active_task` as the call's active task; `None` marks the call
    /// as having left the menu.
    ///
    /// # Errors
    ///
    /// Returns [`CallStateError::MapCreation`] or
    /// [`CallStateError::ItemCreation`] when the ladder is exhausted.
    pub async fn record(
        &self,
        call_sid: &CallSid,
        active_task: Option<&TaskSid>,
    ) -> CallStateResult<RecordOutcome> {
        let entry = CallStateEntry::from_task(active_task.cloned());
        let data = entry.to_data()?;
        let key = call_sid.as_str();

        if let Some(item) = self.client.update_item(&self.map, key, &data, self.ttl).await {
            return Ok(Self::recorded(call_sid, item, UpsertPath::Updated));
        }

        if let Some(item) = self.client.create_item(&self.map, key, &data, self.ttl).await {
            return Ok(Self::recorded(call_sid, item, UpsertPath::Created));
        }

        if self.client.create_map(&self.map, self.ttl).await.is_none() {
            let err = CallStateError::MapCreation;
            error!(call_sid = %call_sid, map = %self.map, error = %err, "call state not recorded");
            return Err(err);
        }

        match self.client.create_item(&self.map, key, &data, self.ttl).await {
            Some(item) => Ok(Self::recorded(call_sid, item, UpsertPath::Bootstrapped)),
            None => {
                let err = CallStateError::ItemCreation;
                error!(call_sid = %call_sid, map = %self.map, error = %err, "call state not recorded");
                Err(err)
            }
        }
    }

    fn recorded(call_sid: &CallSid, item: SyncMapItem, path: UpsertPath) -> RecordOutcome {
        info!(call_sid = %call_sid, ?path, "call sync map updated");
        RecordOutcome { item, path }
    }
}
