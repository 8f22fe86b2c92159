//! In-memory slot storage implementation for testing.

use crate::{SlotStore, StoreError, StoreResult};
use async_trait::async_trait;
use savepoint_model::Snapshot;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory slot storage.
///
/// Snapshots are held as serialized JSON documents so reads and writes
/// behave exactly like the file store, minus the filesystem. Not persistent.
pub struct MemoryStore {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create a new in-memory store.
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored slots.
    pub fn len(&self) -> usize {
        self.slots.read().map(|slots| slots.len()).unwrap_or(0)
    }

    /// Whether the store holds no slots.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SlotStore for MemoryStore {
    async fn write(&self, key: &str, snapshot: &Snapshot) -> StoreResult<()> {
        let json = serde_json::to_string(snapshot)?;

        let mut slots = self
            .slots
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        slots.insert(key.to_string(), json);

        Ok(())
    }

    async fn read(&self, key: &str) -> StoreResult<Option<Snapshot>> {
        let slots = self
            .slots
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;

        match slots.get(key) {
            Some(json) => {
                let snapshot: Snapshot = serde_json::from_str(json)?;
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        let slots = self
            .slots
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(slots.contains_key(key))
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        slots.remove(key);
        Ok(())
    }

    async fn list_keys(&self, prefix: Option<&str>) -> StoreResult<Vec<String>> {
        let slots = self
            .slots
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;

        let mut results: Vec<String> = slots
            .keys()
            .filter(|k| prefix.map_or(true, |p| k.starts_with(p)))
            .cloned()
            .collect();

        results.sort();
        Ok(results)
    }
}
