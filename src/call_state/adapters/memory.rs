//! In-memory sync store for tests and local simulation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::call_state::{
    domain::{SyncMap, SyncMapItem, SyncMapName},
    ports::{SyncStore, SyncStoreError, SyncStoreResult},
};

/// Sync store operation observed by [`InMemorySyncStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStoreCall {
    /// An item update.
    UpdateItem {
        /// Target map.
        map: SyncMapName,
        /// Target key.
        key: String,
    },
    /// An item creation.
    CreateItem {
        /// Target map.
        map: SyncMapName,
        /// Target key.
        key: String,
    },
    /// A map creation.
    CreateMap {
        /// Map name.
        map: SyncMapName,
    },
}

/// Thread-safe in-memory sync store.
///
/// Expiry is evaluated lazily against the injected clock: an expired map or
/// item behaves exactly as if it had never been created. Every port call is
/// journaled so callers can assert on the order of fallback steps.
pub struct InMemorySyncStore<C = DefaultClock> {
    state: Arc<RwLock<InMemoryStoreState>>,
    clock: Arc<C>,
}

impl<C> Clone for InMemorySyncStore<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
        }
    }
}

#[derive(Debug, Default)]
struct InMemoryStoreState {
    maps: HashMap<SyncMapName, StoredMap>,
    next_sequence: u64,
    journal: Vec<SyncStoreCall>,
    unavailable: bool,
}

#[derive(Debug)]
struct StoredMap {
    expires_at: Option<DateTime<Utc>>,
    items: HashMap<String, StoredItem>,
}

#[derive(Debug, Clone)]
struct StoredItem {
    data: Value,
    expires_at: Option<DateTime<Utc>>,
}

impl StoredItem {
    fn snapshot(&self, key: &str) -> SyncMapItem {
        SyncMapItem {
            key: key.to_owned(),
            data: self.data.clone(),
            date_expires: self.expires_at,
        }
    }
}

impl InMemorySyncStore<DefaultClock> {
    /// Creates an empty store using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl Default for InMemorySyncStore<DefaultClock> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error(err: impl std::fmt::Display) -> SyncStoreError {
    SyncStoreError::transport(std::io::Error::other(err.to_string()))
}

fn expiry(now: DateTime<Utc>, ttl: Duration) -> SyncStoreResult<Option<DateTime<Utc>>> {
    if ttl.is_zero() {
        return Ok(None);
    }
    let delta = chrono::Duration::from_std(ttl).map_err(SyncStoreError::transport)?;
    Ok(Some(now + delta))
}

fn is_live(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    expires_at.is_none_or(|instant| instant > now)
}

fn purge_expired(state: &mut InMemoryStoreState, now: DateTime<Utc>) {
    state.maps.retain(|_, map| is_live(map.expires_at, now));
    for map in state.maps.values_mut() {
        map.items.retain(|_, item| is_live(item.expires_at, now));
    }
}

fn unavailable() -> SyncStoreError {
    SyncStoreError::transport(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "sync store unavailable",
    ))
}

impl<C> InMemorySyncStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty store evaluating expiry with `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryStoreState::default())),
            clock,
        }
    }

    /// Makes every subsequent port call fail with a transport error.
    ///
    /// # Errors
    ///
    /// Returns store transport errors when lock acquisition fails.
    pub fn set_unavailable(&self, unavailable: bool) -> SyncStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.unavailable = unavailable;
        Ok(())
    }

    /// Returns a live item, if present.
    ///
    /// # Errors
    ///
    /// Returns store transport errors when lock acquisition fails.
    pub fn item(&self, map: &SyncMapName, key: &str) -> SyncStoreResult<Option<SyncMapItem>> {
        let now = self.clock.utc();
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .maps
            .get(map)
            .filter(|stored| is_live(stored.expires_at, now))
            .and_then(|stored| stored.items.get(key))
            .filter(|item| is_live(item.expires_at, now))
            .map(|item| item.snapshot(key)))
    }

    /// Returns `true` when a live map uses the name.
    ///
    /// # Errors
    ///
    /// Returns store transport errors when lock acquisition fails.
    pub fn has_map(&self, map: &SyncMapName) -> SyncStoreResult<bool> {
        let now = self.clock.utc();
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .maps
            .get(map)
            .is_some_and(|stored| is_live(stored.expires_at, now)))
    }

    /// Returns the port calls observed so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns store transport errors when lock acquisition fails.
    pub fn journal(&self) -> SyncStoreResult<Vec<SyncStoreCall>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.journal.clone())
    }

    /// Clears the call journal.
    ///
    /// # Errors
    ///
    /// Returns store transport errors when lock acquisition fails.
    pub fn clear_journal(&self) -> SyncStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.journal.clear();
        Ok(())
    }
}

#[async_trait]
impl<C> SyncStore for InMemorySyncStore<C>
where
    C: Clock + Send + Sync,
{
    async fn update_item(
        &self,
        map: &SyncMapName,
        key: &str,
        data: &Value,
        item_ttl: Duration,
    ) -> SyncStoreResult<SyncMapItem> {
        let now = self.clock.utc();
        let mut state = self.state.write().map_err(lock_error)?;
        state.journal.push(SyncStoreCall::UpdateItem {
            map: map.clone(),
            key: key.to_owned(),
        });
        if state.unavailable {
            return Err(unavailable());
        }
        purge_expired(&mut state, now);

        let expires_at = expiry(now, item_ttl)?;
        let stored_map = state
            .maps
            .get_mut(map)
            .ok_or_else(|| SyncStoreError::MapNotFound(map.clone()))?;
        let item = stored_map
            .items
            .get_mut(key)
            .ok_or_else(|| SyncStoreError::ItemNotFound {
                map: map.clone(),
                key: key.to_owned(),
            })?;
        item.data = data.clone();
        item.expires_at = expires_at;
        Ok(item.snapshot(key))
    }

    async fn create_item(
        &self,
        map: &SyncMapName,
        key: &str,
        data: &Value,
        item_ttl: Duration,
    ) -> SyncStoreResult<SyncMapItem> {
        let now = self.clock.utc();
        let mut state = self.state.write().map_err(lock_error)?;
        state.journal.push(SyncStoreCall::CreateItem {
            map: map.clone(),
            key: key.to_owned(),
        });
        if state.unavailable {
            return Err(unavailable());
        }
        purge_expired(&mut state, now);

        let expires_at = expiry(now, item_ttl)?;
        let stored_map = state
            .maps
            .get_mut(map)
            .ok_or_else(|| SyncStoreError::MapNotFound(map.clone()))?;
        if stored_map.items.contains_key(key) {
            return Err(SyncStoreError::AlreadyExists(format!("{map}/{key}")));
        }
        let item = StoredItem {
            data: data.clone(),
            expires_at,
        };
        let snapshot = item.snapshot(key);
        stored_map.items.insert(key.to_owned(), item);
        Ok(snapshot)
    }

    async fn create_map(&self, map: &SyncMapName, map_ttl: Duration) -> SyncStoreResult<SyncMap> {
        let now = self.clock.utc();
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .journal
            .push(SyncStoreCall::CreateMap { map: map.clone() });
        if state.unavailable {
            return Err(unavailable());
        }
        purge_expired(&mut state, now);

        if state.maps.contains_key(map) {
            return Err(SyncStoreError::AlreadyExists(map.to_string()));
        }
        state.next_sequence += 1;
        let sid = format!("MP{:032x}", state.next_sequence);
        let expires_at = expiry(now, map_ttl)?;
        state.maps.insert(
            map.clone(),
            StoredMap {
                expires_at,
                items: HashMap::new(),
            },
        );
        Ok(SyncMap {
            sid,
            unique_name: Some(map.as_str().to_owned()),
            date_expires: expires_at,
        })
    }
}
