//! Unit tests for the call-state module.


use crate::call_state::{
    domain::{SyncMap, SyncMapItem, SyncMapName},
    ports::{SyncStore, SyncStoreResult},
};
use async_trait::async_trait;
use mockall::mock;
use serde_json::Value;
use std::time::Duration;

mock! {
    pub Store {}

    #[async_trait]
    impl SyncStore for Store {
        async fn update_item(
            &self,
            map: &SyncMapName,
            key: &str,
            data: &Value,
            item_ttl: Duration,
        ) -> SyncStoreResult<SyncMapItem>;

        async fn create_item(
            &self,
            map: &SyncMapName,
            key: &str,
            data: &Value,
            item_ttl: Duration,
        ) -> SyncStoreResult<SyncMapItem>;

        async fn create_map(&self, map: &SyncMapName, map_ttl: Duration) -> SyncStoreResult<SyncMap>;
    }
}
