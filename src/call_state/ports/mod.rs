//! Port contracts for the sync service.
//!
//! Ports define infrastructure-agnostic interfaces used by call-state
//! services.

pub mod store;

pub use store::{SyncStore, SyncStoreError, SyncStoreResult};
