//! File-based slot storage implementation.
//!
//! Each slot is stored as a single JSON document in a flat directory:
//! `manual-0` -> `<root>/manual-0.sav`. Path separator characters in slot
//! keys are sanitized to `_` before they touch the filesystem.

use crate::{SlotStore, StoreError, StoreResult};
use async_trait::async_trait;
use savepoint_model::{Snapshot, SnapshotHead};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// Configuration for file-based slot storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileStoreOptions {
    /// File extension for slot documents, without the leading dot.
    pub extension: String,

    /// Whether to write pretty-printed JSON instead of compact.
    pub pretty: bool,
}

impl Default for FileStoreOptions {
    fn default() -> Self {
        Self {
            extension: "sav".to_string(),
            pretty: true,
        }
    }
}

/// File-based slot storage.
#[derive(Clone)]
pub struct FileStore {
    root: PathBuf,
    options: FileStoreOptions,
}

impl FileStore {
    /// Create a file store rooted at the given directory with default options.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_options(root, FileStoreOptions::default())
    }

    /// Create a file store with explicit options.
    pub fn with_options(root: impl Into<PathBuf>, options: FileStoreOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    /// Directory this store writes into.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Replace path separators in a slot key so it maps to a single file
    /// inside the store directory.
    fn sanitize_key(key: &str) -> StoreResult<String> {
        if key.is_empty() {
            return Err(StoreError::invalid_key("slot key cannot be empty"));
        }

        Ok(key
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect())
    }

    /// Get the file path for a slot key.
    fn key_to_path(&self, key: &str) -> StoreResult<PathBuf> {
        let sanitized = Self::sanitize_key(key)?;
        Ok(self
            .root
            .join(format!("{}.{}", sanitized, self.options.extension)))
    }

    fn serialize(&self, snapshot: &Snapshot) -> StoreResult<String> {
        let content = if self.options.pretty {
            serde_json::to_string_pretty(snapshot)?
        } else {
            serde_json::to_string(snapshot)?
        };
        Ok(content)
    }
}

#[async_trait]
impl SlotStore for FileStore {
    async fn write(&self, key: &str, snapshot: &Snapshot) -> StoreResult<()> {
        let path = self.key_to_path(key)?;
        debug!(path = %path.display(), "Writing slot");

        fs::create_dir_all(&self.root).await?;

        let content = self.serialize(snapshot)?;

        // Write atomically (write to temp file, then rename)
        let temp_path = path.with_extension(format!("{}.tmp", self.options.extension));
        fs::write(&temp_path, &content).await?;
        fs::rename(&temp_path, &path).await?;

        Ok(())
    }

    async fn read(&self, key: &str) -> StoreResult<Option<Snapshot>> {
        let path = self.key_to_path(key)?;
        debug!(path = %path.display(), "Reading slot");

        match fs::read_to_string(&path).await {
            Ok(content) => {
                let snapshot: Snapshot = serde_json::from_str(&content)?;
                Ok(Some(snapshot))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn read_head(&self, key: &str) -> StoreResult<Option<SnapshotHead>> {
        let path = self.key_to_path(key)?;
        debug!(path = %path.display(), "Reading slot head");

        // Deserializes into the head view only, skipping the entries array.
        match fs::read_to_string(&path).await {
            Ok(content) => {
                let head: SnapshotHead = serde_json::from_str(&content)?;
                Ok(Some(head))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        let path = self.key_to_path(key)?;
        Ok(path.exists())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let path = self.key_to_path(key)?;
        debug!(path = %path.display(), "Deleting slot");

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn list_keys(&self, prefix: Option<&str>) -> StoreResult<Vec<String>> {
        debug!(path = %self.root.display(), "Listing slots");

        let mut results = Vec::new();

        match fs::read_dir(&self.root).await {
            Ok(mut entries) => {
                while let Some(entry) = entries.next_entry().await? {
                    let path = entry.path();

                    // Only include files with the configured extension
                    if !path
                        .extension()
                        .is_some_and(|ext| ext == self.options.extension.as_str())
                    {
                        continue;
                    }

                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        if prefix.map_or(true, |p| stem.starts_with(p)) {
                            results.push(stem.to_string());
                        }
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Directory doesn't exist, return empty list
            }
            Err(e) => return Err(StoreError::Io(e)),
        }

        results.sort();
        Ok(results)
    }
}

/// Create a file store at the platform data directory.
///
/// Follows XDG conventions: `$XDG_DATA_HOME/<dir_name>` if set,
/// `~/.local/share/<dir_name>` otherwise.
pub fn default_store(dir_name: &str) -> Option<FileStore> {
    dirs::data_local_dir().map(|p| FileStore::new(p.join(dir_name)))
}

/// Like [`default_store`], but with explicit store options.
pub fn default_store_with(dir_name: &str, options: FileStoreOptions) -> Option<FileStore> {
    dirs::data_local_dir().map(|p| FileStore::with_options(p.join(dir_name), options))
}
