//! Null slot storage implementation.

use crate::{SlotStore, StoreError, StoreResult};
use async_trait::async_trait;
use savepoint_model::Snapshot;

/// A store that persists nothing.
///
/// Stands in when no real backend is wired up, so the rest of the system
/// keeps running without persistence. Reads behave like an empty store;
/// writes fail with [`StoreError::Unavailable`] so a save is reported as
/// failed rather than silently dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

impl NullStore {
    /// Create a null store.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SlotStore for NullStore {
    async fn write(&self, key: &str, _snapshot: &Snapshot) -> StoreResult<()> {
        Err(StoreError::unavailable(format!(
            "null store cannot persist slot '{key}'"
        )))
    }

    async fn read(&self, _key: &str) -> StoreResult<Option<Snapshot>> {
        Ok(None)
    }

    async fn exists(&self, _key: &str) -> StoreResult<bool> {
        Ok(false)
    }

    async fn delete(&self, _key: &str) -> StoreResult<()> {
        Ok(())
    }

    async fn list_keys(&self, _prefix: Option<&str>) -> StoreResult<Vec<String>> {
        Ok(Vec::new())
    }
}
