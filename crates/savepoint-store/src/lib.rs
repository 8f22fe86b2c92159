//! Slot storage layer for savepoint.
//!
//! This crate provides a slot-keyed snapshot storage abstraction with
//! multiple backends:
//! - File storage (default, one JSON document per slot)
//! - In-memory storage (for testing)
//! - Null storage (discards writes, for running without persistence)

pub mod error;
pub mod file;
pub mod memory;
pub mod null;

pub use error::{StoreError, StoreResult};
pub use file::{default_store, default_store_with, FileStore, FileStoreOptions};
pub use memory::MemoryStore;
pub use null::NullStore;

use async_trait::async_trait;
use savepoint_model::{Snapshot, SnapshotHead};

/// A trait for slot-keyed snapshot storage backends.
///
/// Each slot key names one snapshot document. The trait is object safe so
/// a coordinator can hold any backend as `Arc<dyn SlotStore>`.
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Write a snapshot under a slot key, replacing any existing snapshot.
    async fn write(&self, key: &str, snapshot: &Snapshot) -> StoreResult<()>;

    /// Read the snapshot stored under a slot key.
    ///
    /// Returns `None` if the slot doesn't exist.
    async fn read(&self, key: &str) -> StoreResult<Option<Snapshot>>;

    /// Read only the version and metadata of a stored snapshot.
    ///
    /// Returns `None` if the slot doesn't exist. The default implementation
    /// reads the full snapshot; backends with a cheaper partial read
    /// override it.
    async fn read_head(&self, key: &str) -> StoreResult<Option<SnapshotHead>> {
        Ok(self.read(key).await?.map(|snapshot| SnapshotHead {
            format_version: snapshot.format_version,
            metadata: snapshot.metadata,
        }))
    }

    /// Check if a slot exists.
    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Delete a slot.
    ///
    /// Deleting a slot that doesn't exist is not an error.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// List stored slot keys, optionally filtered by prefix.
    async fn list_keys(&self, prefix: Option<&str>) -> StoreResult<Vec<String>>;
}
