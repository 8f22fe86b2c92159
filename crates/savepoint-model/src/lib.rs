//! Unified snapshot data model for savepoint.
//!
//! This crate defines the persisted save document shared by the store and
//! coordinator crates:
//! - [`Snapshot`] - one versioned capture of every participating subsystem
//! - [`SnapshotEntry`] - a single subsystem's encoded payload
//! - [`SnapshotMetadata`] - slot description readable without decoding entries
//! - [`SnapshotHead`] - the metadata-only view of a persisted document
//!
//! # Example
//!
//! ```
//! use savepoint_model::{Snapshot, SnapshotEntry, FORMAT_VERSION};
//!
//! let mut snapshot = Snapshot::new(FORMAT_VERSION);
//! snapshot.push_entry(SnapshotEntry::new("inventory", "json", r#"{"slots":50}"#));
//!
//! assert!(snapshot.entry("inventory").is_some());
//! assert!(snapshot.entry("quests").is_none());
//! ```

mod snapshot;

pub use snapshot::{Snapshot, SnapshotEntry, SnapshotHead, SnapshotMetadata, FORMAT_VERSION};
