//! Sync REST adapter.
//!
//! Talks to `/v1/Services/{service}/Maps` with form-encoded requests and HTTP
//! basic auth. A 404 is reported as a missing map or item and a 409 as an
//! existing one; every other non-success status becomes
//! [`SyncStoreError::Api`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::call_state::{
    domain::{SyncMap, SyncMapItem, SyncMapName},
    ports::{SyncStore, SyncStoreError, SyncStoreResult},
};
use crate::twilio::{TwilioCredentials, api_failure, endpoint, path_segment};

/// Production base URL of the Sync API.
pub const DEFAULT_SYNC_BASE_URL: &str = "https://sync.twilio.com";

/// Sync store backed by the Twilio Sync REST API.
#[derive(Debug, Clone)]
pub struct TwilioSyncStore {
    client: Client,
    credentials: Arc<TwilioCredentials>,
    base_url: String,
    service_sid: String,
}

#[derive(Debug, Deserialize)]
struct MapResource {
    sid: String,
    unique_name: Option<String>,
    date_expires: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ItemResource {
    key: String,
    data: Value,
    date_expires: Option<DateTime<Utc>>,
}

/// What a 404 from a given endpoint means.
enum Missing<'a> {
    Map(&'a SyncMapName),
    Item(&'a SyncMapName, &'a str),
}

impl Missing<'_> {
    fn error(&self) -> SyncStoreError {
        match self {
            Self::Map(map) => SyncStoreError::MapNotFound((*map).clone()),
            Self::Item(map, key) => SyncStoreError::ItemNotFound {
                map: (*map).clone(),
                key: (*key).to_owned(),
            },
        }
    }
}

impl TwilioSyncStore {
    /// Creates a store for `service_sid` against the production API.
    #[must_use]
    pub fn new(
        client: Client,
        credentials: Arc<TwilioCredentials>,
        service_sid: impl Into<String>,
    ) -> Self {
        Self {
            client,
            credentials,
            base_url: DEFAULT_SYNC_BASE_URL.to_owned(),
            service_sid: service_sid.into(),
        }
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn maps_url(&self) -> String {
        endpoint(
            &self.base_url,
            &format!("v1/Services/{}/Maps", path_segment(&self.service_sid)),
        )
    }

    fn items_url(&self, map: &SyncMapName) -> String {
        format!("{}/{}/Items", self.maps_url(), path_segment(map.as_str()))
    }

    async fn post<T: DeserializeOwned>(
        &self,
        url: String,
        form: &[(&str, &str)],
        missing: Missing<'_>,
        conflict: &str,
    ) -> SyncStoreResult<T> {
        let response = self
            .credentials
            .authorize(self.client.post(url))
            .form(form)
            .send()
            .await
            .map_err(SyncStoreError::transport)?;
        Self::read(response, &missing, conflict).await
    }

    async fn read<T: DeserializeOwned>(
        response: Response,
        missing: &Missing<'_>,
        conflict: &str,
    ) -> SyncStoreResult<T> {
        match response.status() {
            status if status.is_success() => response
                .json::<T>()
                .await
                .map_err(|err| SyncStoreError::InvalidResponse(err.to_string())),
            StatusCode::NOT_FOUND => Err(missing.error()),
            StatusCode::CONFLICT => Err(SyncStoreError::AlreadyExists(conflict.to_owned())),
            _ => Err(SyncStoreError::Api(api_failure(response).await)),
        }
    }
}

fn encode_data(data: &Value) -> SyncStoreResult<String> {
    serde_json::to_string(data).map_err(SyncStoreError::transport)
}

#[async_trait]
impl SyncStore for TwilioSyncStore {
    async fn update_item(
        &self,
        map: &SyncMapName,
        key: &str,
        data: &Value,
        item_ttl: Duration,
    ) -> SyncStoreResult<SyncMapItem> {
        let encoded = encode_data(data)?;
        let ttl = item_ttl.as_secs().to_string();
        let url = format!("{}/{}", self.items_url(map), path_segment(key));
        debug!(map = %map, key, "POST sync map item update");
        let item: ItemResource = self
            .post(
                url,
                &[("Data", encoded.as_str()), ("ItemTtl", ttl.as_str())],
                Missing::Item(map, key),
                key,
            )
            .await?;
        Ok(SyncMapItem {
            key: item.key,
            data: item.data,
            date_expires: item.date_expires,
        })
    }

    async fn create_item(
        &self,
        map: &SyncMapName,
        key: &str,
        data: &Value,
        item_ttl: Duration,
    ) -> SyncStoreResult<SyncMapItem> {
        let encoded = encode_data(data)?;
        let ttl = item_ttl.as_secs().to_string();
        debug!(map = %map, key, "POST sync map item");
        let item: ItemResource = self
            .post(
                self.items_url(map),
                &[
                    ("Key", key),
                    ("Data", encoded.as_str()),
                    ("ItemTtl", ttl.as_str()),
                ],
                Missing::Map(map),
                key,
            )
            .await?;
        Ok(SyncMapItem {
            key: item.key,
            data: item.data,
            date_expires: item.date_expires,
        })
    }

    async fn create_map(&self, map: &SyncMapName, map_ttl: Duration) -> SyncStoreResult<SyncMap> {
        let ttl = map_ttl.as_secs().to_string();
        debug!(map = %map, "POST sync map");
        let created: MapResource = self
            .post(
                self.maps_url(),
                &[("UniqueName", map.as_str()), ("Ttl", ttl.as_str())],
                Missing::Map(map),
                map.as_str(),
            )
            .await?;
        Ok(SyncMap {
            sid: created.sid,
            unique_name: created.unique_name,
            date_expires: created.date_expires,
        })
    }
}
