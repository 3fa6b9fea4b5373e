//! Sync store port: keyed items inside named, expiring maps.
//!
//! Only write paths are exposed. Reading an item back is never needed to
//! record call state.

use crate::call_state::domain::{SyncMap, SyncMapItem, SyncMapName};
use crate::twilio::ApiFailure;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for sync store operations.
pub type SyncStoreResult<T> = Result<T, SyncStoreError>;

/// Key-value contract with TTL support.
///
/// A zero TTL means the map or item never expires.
#[async_trait]
pub trait SyncStore: Send + Sync {
    /// Overwrites an existing item and resets its TTL.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStoreError::MapNotFound`] or
    /// [`SyncStoreError::ItemNotFound`] when the map or key does not exist.
    async fn update_item(
        &self,
        map: &SyncMapName,
        key: &str,
        data: &Value,
        item_ttl: Duration,
    ) -> SyncStoreResult<SyncMapItem>;

    /// Creates an item in an existing map.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStoreError::MapNotFound`] when the map does not exist or
    /// [`SyncStoreError::AlreadyExists`] when the key is taken.
    async fn create_item(
        &self,
        map: &SyncMapName,
        key: &str,
        data: &Value,
        item_ttl: Duration,
    ) -> SyncStoreResult<SyncMapItem>;

    /// Creates a map with the given unique name.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStoreError::AlreadyExists`] when a live map already uses
    /// the name.
    async fn create_map(&self, map: &SyncMapName, map_ttl: Duration) -> SyncStoreResult<SyncMap>;
}

/// Errors returned by sync store adapters.
#[derive(Debug, Clone, Error)]
pub enum SyncStoreError {
    /// The map does not exist.
    #[error("sync map not found: {0}")]
    MapNotFound(SyncMapName),

    /// The map exists but the key does not.
    #[error("sync map item not found: {map}/{key}")]
    ItemNotFound {
        /// Map that was searched.
        map: SyncMapName,
        /// Missing key.
        key: String,
    },

    /// A map or item with the same identity already exists.
    #[error("sync resource already exists: {0}")]
    AlreadyExists(String),

    /// The service answered with a non-success status.
    #[error(transparent)]
    Api(#[from] ApiFailure),

    /// The service answered with a body that could not be interpreted.
    #[error("malformed sync response: {0}")]
    InvalidResponse(String),

    /// Transport-level failure.
    #[error("sync transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl SyncStoreError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Returns `true` when the failure means the target is simply missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::MapNotFound(_) | Self::ItemNotFound { .. })
    }
}
