//! Sync map client that absorbs store failures.
//!
//! Every operation returns `None` instead of an error. A missing map or key
//! is an expected outcome of the upsert ladder and is logged at `debug`;
//! anything else is logged at `warn` with its cause before being absorbed.

use crate::call_state::{
    domain::{SyncMap, SyncMapItem, SyncMapName},
    ports::{SyncStore, SyncStoreError},
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Degrading facade over a [`SyncStore`].
pub struct SyncMapClient<S>
where
    S: SyncStore,
{
    store: Arc<S>,
}

impl<S> Clone for SyncMapClient<S>
where
    S: SyncStore,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

fn absorb(operation: &str, map: &SyncMapName, key: Option<&str>, err: &SyncStoreError) {
    if err.is_not_found() {
        debug!(operation, map = %map, key, error = %err, "sync target missing");
    } else {
        warn!(operation, map = %map, key, error = %err, "sync operation failed");
    }
}

impl<S> SyncMapClient<S>
where
    S: SyncStore,
{
    /// Wraps a sync store.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Overwrites an existing item, or returns `None`.
    pub async fn update_item(
        &self,
        map: &SyncMapName,
        key: &str,
        data: &Value,
        item_ttl: Duration,
    ) -> Option<SyncMapItem> {
        debug!(map = %map, key, "updating sync map item");
        match self.store.update_item(map, key, data, item_ttl).await {
            Ok(item) => {
                info!(map = %map, key, "sync map item updated");
                Some(item)
            }
            Err(err) => {
                absorb("update_item", map, Some(key), &err);
                None
            }
        }
    }

    /// Creates an item in an existing map, or returns `None`.
    pub async fn create_item(
        &self,
        map: &SyncMapName,
        key: &str,
        data: &Value,
        item_ttl: Duration,
    ) -> Option<SyncMapItem> {
        debug!(map = %map, key, "creating sync map item");
        match self.store.create_item(map, key, data, item_ttl).await {
            Ok(item) => {
                info!(map = %map, key, "sync map item created");
                Some(item)
            }
            Err(err) => {
                absorb("create_item", map, Some(key), &err);
                None
            }
        }
    }

    /// Creates the map itself, or returns `None` (including when it already
    /// exists).
    pub async fn create_map(&self, map: &SyncMapName, map_ttl: Duration) -> Option<SyncMap> {
        info!(map = %map, "creating sync map");
        match self.store.create_map(map, map_ttl).await {
            Ok(created) => {
                info!(map = %map, sid = %created.sid, "sync map created");
                Some(created)
            }
            Err(err) => {
                absorb("create_map", map, None, &err);
                None
            }
        }
    }
}
