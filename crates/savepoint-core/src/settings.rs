//! Save settings and slot key policy.
//!
//! Centralizes everything slot naming and auto-save depend on: directory
//! and extension for the default file store, the snapshot schema version,
//! slot indexing with its prefixes and bounds, the active slot index, and
//! the auto-save triggers.

use crate::error::SettingsError;
use serde::{Deserialize, Serialize};

/// Sentinel index meaning "no active slot selected".
pub const NO_ACTIVE_SLOT: i32 = -1;

/// Settings controlling persistence format, slot naming, and auto-save.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveSettings {
    /// Directory name used by the default file store.
    pub save_dir_name: String,

    /// File extension for slot documents, without the leading dot.
    pub file_extension: String,

    /// Pretty-print persisted JSON.
    pub pretty_json: bool,

    /// Snapshot schema version stamped on new saves. Snapshots with a newer
    /// version are refused on load.
    pub format_version: u32,

    /// Expose indexed slots per family instead of one implicit slot.
    pub slot_indexing: bool,

    /// Number of slots per family when indexing is enabled.
    pub max_slots: u32,

    /// Key prefix for manual slots.
    pub manual_prefix: String,

    /// Key prefix for automatic slots.
    pub auto_prefix: String,

    /// Active slot index, or [`NO_ACTIVE_SLOT`].
    pub active_slot: i32,

    /// Load the active auto slot once the host reports ready.
    pub load_on_ready: bool,

    /// Save the active auto slot during shutdown.
    pub save_on_quit: bool,

    /// Save the active auto slot when the host is suspended.
    pub save_on_suspend: bool,

    /// Seconds between interval auto-saves; zero or less disables them.
    pub autosave_interval_secs: f64,
}

impl Default for SaveSettings {
    fn default() -> Self {
        Self {
            save_dir_name: "savepoint".to_string(),
            file_extension: "sav".to_string(),
            pretty_json: true,
            format_version: savepoint_model::FORMAT_VERSION,
            slot_indexing: true,
            max_slots: 3,
            manual_prefix: "manual".to_string(),
            auto_prefix: "auto".to_string(),
            active_slot: NO_ACTIVE_SLOT,
            load_on_ready: false,
            save_on_quit: false,
            save_on_suspend: false,
            autosave_interval_secs: 0.0,
        }
    }
}

impl SaveSettings {
    /// Key for an indexed manual slot.
    ///
    /// With indexing disabled the bare prefix names the single manual slot
    /// and the index is not consulted.
    pub fn manual_key(&self, index: i32) -> Result<String, SettingsError> {
        if !self.slot_indexing {
            return Ok(self.manual_prefix.clone());
        }
        let index = self.check_index(index)?;
        Ok(format!("{}-{}", self.manual_prefix, index))
    }

    /// Key for an indexed automatic slot.
    ///
    /// With indexing disabled the bare prefix names the single auto slot
    /// and the index is not consulted.
    pub fn auto_key(&self, index: i32) -> Result<String, SettingsError> {
        if !self.slot_indexing {
            return Ok(self.auto_prefix.clone());
        }
        let index = self.check_index(index)?;
        Ok(format!("{}-{}", self.auto_prefix, index))
    }

    /// Set the active slot index.
    ///
    /// Accepts [`NO_ACTIVE_SLOT`] or an index in `[0, max_slots)`; anything
    /// else is rejected, never clamped.
    pub fn set_active_slot(&mut self, index: i32) -> Result<(), SettingsError> {
        if index != NO_ACTIVE_SLOT {
            self.check_index(index)?;
        }
        self.active_slot = index;
        Ok(())
    }

    /// Whether an active slot is selected.
    pub fn has_active_slot(&self) -> bool {
        self.active_slot != NO_ACTIVE_SLOT
    }

    /// Auto slot key auto-save triggers should target right now.
    ///
    /// `None` when indexing is enabled but no active slot is selected;
    /// triggers skip instead of guessing a slot.
    pub fn current_auto_key(&self) -> Option<String> {
        if !self.slot_indexing {
            return Some(self.auto_prefix.clone());
        }
        if !self.has_active_slot() {
            return None;
        }
        self.auto_key(self.active_slot).ok()
    }

    /// Whether interval auto-save is enabled.
    pub fn autosave_enabled(&self) -> bool {
        self.autosave_interval_secs > 0.0
    }

    fn check_index(&self, index: i32) -> Result<u32, SettingsError> {
        if index < 0 || index as u32 >= self.max_slots {
            return Err(SettingsError::SlotIndexOutOfRange {
                index,
                max_slots: self.max_slots,
            });
        }
        Ok(index as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = SaveSettings::default();

        assert_eq!(settings.file_extension, "sav");
        assert_eq!(settings.format_version, savepoint_model::FORMAT_VERSION);
        assert_eq!(settings.active_slot, NO_ACTIVE_SLOT);
        assert!(!settings.has_active_slot());
        assert!(!settings.autosave_enabled());
    }

    #[test]
    fn test_indexed_keys() {
        let settings = SaveSettings::default();

        assert_eq!(settings.manual_key(0).unwrap(), "manual-0");
        assert_eq!(settings.manual_key(2).unwrap(), "manual-2");
        assert_eq!(settings.auto_key(1).unwrap(), "auto-1");
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let settings = SaveSettings::default();

        assert!(settings.manual_key(3).is_err());
        assert!(settings.manual_key(-1).is_err());
        assert!(settings.auto_key(i32::MAX).is_err());
    }

    #[test]
    fn test_bare_prefixes_when_indexing_disabled() {
        let settings = SaveSettings {
            slot_indexing: false,
            ..Default::default()
        };

        assert_eq!(settings.manual_key(0).unwrap(), "manual");
        assert_eq!(settings.manual_key(99).unwrap(), "manual");
        assert_eq!(settings.auto_key(0).unwrap(), "auto");
        assert_eq!(settings.current_auto_key(), Some("auto".to_string()));
    }

    #[test]
    fn test_set_active_slot_validation() {
        let mut settings = SaveSettings::default();

        settings.set_active_slot(1).unwrap();
        assert_eq!(settings.active_slot, 1);

        settings.set_active_slot(NO_ACTIVE_SLOT).unwrap();
        assert!(!settings.has_active_slot());

        // Rejected, not clamped; the previous value stays
        settings.set_active_slot(1).unwrap();
        assert!(settings.set_active_slot(3).is_err());
        assert!(settings.set_active_slot(-2).is_err());
        assert_eq!(settings.active_slot, 1);
    }

    #[test]
    fn test_current_auto_key_requires_active_slot() {
        let mut settings = SaveSettings::default();
        assert_eq!(settings.current_auto_key(), None);

        settings.set_active_slot(2).unwrap();
        assert_eq!(settings.current_auto_key(), Some("auto-2".to_string()));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: SaveSettings =
            serde_json::from_str(r#"{"max_slots": 10, "save_on_quit": true}"#).unwrap();

        assert_eq!(settings.max_slots, 10);
        assert!(settings.save_on_quit);
        assert_eq!(settings.file_extension, "sav");
        assert_eq!(settings.active_slot, NO_ACTIVE_SLOT);
    }

    #[test]
    fn test_round_trip() {
        let mut settings = SaveSettings::default();
        settings.set_active_slot(1).unwrap();
        settings.autosave_interval_secs = 90.0;

        let json = serde_json::to_string(&settings).unwrap();
        let parsed: SaveSettings = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.active_slot, 1);
        assert_eq!(parsed.autosave_interval_secs, 90.0);
        assert!(parsed.autosave_enabled());
    }
}
