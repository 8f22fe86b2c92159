//! Snapshot data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Schema version written into every new snapshot.
///
/// Loaders refuse documents with a newer version than they were built for;
/// older versions are accepted as-is.
pub const FORMAT_VERSION: u32 = 1;

/// One subsystem's contribution to a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Stable unique key of the subsystem that produced this entry.
    pub subsystem_id: String,

    /// Codec tag selecting how `payload` is decoded.
    pub payload_kind: String,

    /// Opaque serialized payload text.
    pub payload: String,
}

impl SnapshotEntry {
    /// Create a new entry.
    pub fn new(
        subsystem_id: impl Into<String>,
        payload_kind: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            subsystem_id: subsystem_id.into(),
            payload_kind: payload_kind.into(),
            payload: payload.into(),
        }
    }
}

/// Slot description readable without decoding any entry.
///
/// `slot_key` and `captured_at` are stamped by the coordinator on save; the
/// remaining fields are free-form and owned by the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Slot key this snapshot was written under.
    #[serde(default)]
    pub slot_key: String,

    /// When the snapshot was captured.
    pub captured_at: DateTime<Utc>,

    /// Accumulated play time in seconds.
    #[serde(default)]
    pub play_time_seconds: f64,

    /// Display name for slot pickers.
    #[serde(default)]
    pub player_name: String,

    /// Display location for slot pickers.
    #[serde(default)]
    pub location: String,

    /// Free-form application data.
    #[serde(default)]
    pub custom_data: String,
}

impl Default for SnapshotMetadata {
    fn default() -> Self {
        Self {
            slot_key: String::new(),
            captured_at: Utc::now(),
            play_time_seconds: 0.0,
            player_name: String::new(),
            location: String::new(),
            custom_data: String::new(),
        }
    }
}

/// A unified snapshot of every participating subsystem at a point in time.
///
/// Entries keep capture order. A snapshot is built fresh on every save and
/// never mutated after it is handed to a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Schema version at capture time.
    pub format_version: u32,

    /// When the snapshot was captured.
    pub captured_at: DateTime<Utc>,

    /// Per-subsystem payloads in capture order.
    pub entries: Vec<SnapshotEntry>,

    /// Slot description.
    pub metadata: SnapshotMetadata,
}

impl Snapshot {
    /// Create an empty snapshot stamped with the current time.
    pub fn new(format_version: u32) -> Self {
        Self {
            format_version,
            captured_at: Utc::now(),
            entries: Vec::new(),
            metadata: SnapshotMetadata::default(),
        }
    }

    /// Append an entry, keeping the first on a duplicate subsystem id.
    pub fn push_entry(&mut self, entry: SnapshotEntry) {
        if self.entry(&entry.subsystem_id).is_none() {
            self.entries.push(entry);
        }
    }

    /// Look up the entry for a subsystem id.
    pub fn entry(&self, subsystem_id: &str) -> Option<&SnapshotEntry> {
        self.entries.iter().find(|e| e.subsystem_id == subsystem_id)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Metadata-only view of a persisted snapshot document.
///
/// Deserializes from the same JSON as [`Snapshot`] while skipping `entries`,
/// so slot pickers can show version and metadata without paying for a full
/// load.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotHead {
    /// Schema version at capture time.
    pub format_version: u32,

    /// Slot description.
    pub metadata: SnapshotMetadata,
}
