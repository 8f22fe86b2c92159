//! Snapshot assembly and restore.
//!
//! The assembler walks the registry in capture order and builds one unified
//! snapshot per save, encoding each subsystem's state through the codec for
//! its payload kind. On restore it runs the reverse protocol in two passes:
//! every subsystem is told a load is coming, then each entry is decoded and
//! applied in the same deterministic order.

use crate::codec::CodecRegistry;
use crate::registry::SaveRegistry;
use savepoint_model::{Snapshot, SnapshotEntry};
use tracing::{debug, warn};

/// Result of assembling a snapshot, listing how each subsystem fared.
#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    /// The assembled snapshot.
    pub snapshot: Snapshot,
    /// Subsystems that contributed an entry.
    pub captured: Vec<String>,
    /// Subsystems that reported nothing to persist.
    pub skipped: Vec<String>,
    /// Subsystems omitted because capture or encoding failed.
    pub failed: Vec<String>,
}

/// How a single subsystem's restore attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreStatus {
    /// The payload was decoded and accepted.
    Restored,
    /// The snapshot holds no entry for this subsystem.
    MissingEntry,
    /// No codec is registered for the entry's payload kind.
    UnknownKind,
    /// The payload could not be decoded.
    DecodeFailed,
    /// The subsystem refused the decoded payload.
    Rejected,
}

/// One subsystem's restore outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsystemRestore {
    pub subsystem_id: String,
    pub status: RestoreStatus,
}

/// Result of applying a snapshot to the current registry.
#[derive(Debug, Clone)]
pub struct RestoreReport {
    /// Whether every attempted restore was accepted. Subsystems without an
    /// entry in the snapshot do not count against this.
    pub success: bool,
    /// Per-subsystem outcomes in restore order.
    pub subsystems: Vec<SubsystemRestore>,
    /// Snapshot entries with no registered subsystem to receive them.
    pub orphaned: Vec<String>,
}

impl RestoreReport {
    /// Outcome for a specific subsystem, if it was registered.
    pub fn status_of(&self, id: &str) -> Option<RestoreStatus> {
        self.subsystems
            .iter()
            .find(|s| s.subsystem_id == id)
            .map(|s| s.status)
    }
}

/// Builds unified snapshots from a registry and applies them back.
pub struct SnapshotAssembler {
    format_version: u32,
}

impl SnapshotAssembler {
    /// Create an assembler stamping the given schema version on snapshots.
    pub fn new(format_version: u32) -> Self {
        Self { format_version }
    }

    /// Capture every registered subsystem into one snapshot.
    ///
    /// Walks the registry in capture order. Each adapter gets `before_save`
    /// immediately before its own capture, so late mutations (for example a
    /// final play-time update) land in the snapshot. A subsystem that skips,
    /// fails to capture, or fails to encode is left out; the walk always
    /// continues.
    pub fn capture(&self, registry: &SaveRegistry, codecs: &CodecRegistry) -> CaptureOutcome {
        let mut snapshot = Snapshot::new(self.format_version);
        let mut captured = Vec::new();
        let mut skipped = Vec::new();
        let mut failed = Vec::new();

        for adapter in registry.iter() {
            let id = adapter.save_id().to_string();
            adapter.before_save();

            let value = match adapter.capture() {
                Ok(Some(value)) => value,
                Ok(None) => {
                    debug!(id = %id, "Subsystem had nothing to capture");
                    skipped.push(id);
                    continue;
                }
                Err(e) => {
                    warn!(id = %id, error = %e, "Subsystem capture failed, omitting from snapshot");
                    failed.push(id);
                    continue;
                }
            };

            let kind = adapter.payload_kind().to_string();
            let payload = match codecs.get(&kind).and_then(|codec| codec.encode(&value)) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!(
                        id = %id,
                        kind = %kind,
                        error = %e,
                        "Could not encode subsystem payload, omitting from snapshot"
                    );
                    failed.push(id);
                    continue;
                }
            };

            snapshot.push_entry(SnapshotEntry::new(id.clone(), kind, payload));
            captured.push(id);
        }

        CaptureOutcome {
            snapshot,
            captured,
            skipped,
            failed,
        }
    }

    /// Apply a snapshot to the current registry.
    ///
    /// First pass notifies every registered subsystem through `before_load`
    /// so state can be reset. Second pass decodes and applies each entry in
    /// capture order, finishing every subsystem with `after_load`. A missing
    /// entry yields `after_load(false)` without failing the aggregate; any
    /// decode failure or rejected payload does fail it. Entries left without
    /// a registered subsystem are reported as orphaned.
    pub fn restore(
        &self,
        snapshot: &Snapshot,
        registry: &SaveRegistry,
        codecs: &CodecRegistry,
    ) -> RestoreReport {
        for adapter in registry.iter() {
            adapter.before_load();
        }

        let mut success = true;
        let mut subsystems = Vec::new();

        for adapter in registry.iter() {
            let id = adapter.save_id().to_string();

            let status = match snapshot.entry(&id) {
                None => {
                    debug!(id = %id, "Snapshot has no entry for subsystem");
                    RestoreStatus::MissingEntry
                }
                Some(entry) => match codecs.get(&entry.payload_kind) {
                    Err(e) => {
                        warn!(id = %id, error = %e, "Cannot restore subsystem");
                        RestoreStatus::UnknownKind
                    }
                    Ok(codec) => match codec.decode(&entry.payload) {
                        Err(e) => {
                            warn!(id = %id, error = %e, "Failed to decode subsystem payload");
                            RestoreStatus::DecodeFailed
                        }
                        Ok(value) => {
                            if adapter.restore(value) {
                                RestoreStatus::Restored
                            } else {
                                warn!(id = %id, "Subsystem rejected restored payload");
                                RestoreStatus::Rejected
                            }
                        }
                    },
                },
            };

            adapter.after_load(status == RestoreStatus::Restored);
            if status != RestoreStatus::Restored && status != RestoreStatus::MissingEntry {
                success = false;
            }
            subsystems.push(SubsystemRestore {
                subsystem_id: id,
                status,
            });
        }

        let mut orphaned = Vec::new();
        for entry in &snapshot.entries {
            if registry.lookup(&entry.subsystem_id).is_none() {
                warn!(
                    id = %entry.subsystem_id,
                    "Snapshot entry has no registered subsystem"
                );
                orphaned.push(entry.subsystem_id.clone());
            }
        }

        RestoreReport {
            success,
            subsystems,
            orphaned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestSubsystem;
    use savepoint_model::FORMAT_VERSION;
    use std::sync::{Arc, Mutex};

    fn assembler() -> SnapshotAssembler {
        SnapshotAssembler::new(FORMAT_VERSION)
    }

    #[test]
    fn test_capture_follows_priority_order() {
        let mut registry = SaveRegistry::new();
        registry.register(TestSubsystem::new("world").with_priority(20).shared());
        registry.register(TestSubsystem::new("player").with_priority(10).shared());

        let outcome = assembler().capture(&registry, &CodecRegistry::new());

        assert_eq!(outcome.captured, vec!["player", "world"]);
        assert_eq!(outcome.snapshot.entries[0].subsystem_id, "player");
        assert_eq!(outcome.snapshot.entries[1].subsystem_id, "world");
        assert_eq!(outcome.snapshot.format_version, FORMAT_VERSION);
    }

    #[test]
    fn test_capture_interleaves_before_save() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut registry = SaveRegistry::new();
        registry.register(
            TestSubsystem::new("a")
                .with_events(events.clone())
                .shared(),
        );
        registry.register(
            TestSubsystem::new("b")
                .with_events(events.clone())
                .shared(),
        );

        assembler().capture(&registry, &CodecRegistry::new());

        // before_save runs immediately ahead of each subsystem's own capture
        assert_eq!(
            *events.lock().unwrap(),
            vec!["a:before_save", "a:capture", "b:before_save", "b:capture"]
        );
    }

    #[test]
    fn test_capture_skips_subsystem_with_nothing_to_persist() {
        let mut registry = SaveRegistry::new();
        registry.register(TestSubsystem::new("tutorial").capture_none().shared());
        registry.register(TestSubsystem::new("wallet").with_value(9).shared());

        let outcome = assembler().capture(&registry, &CodecRegistry::new());

        assert_eq!(outcome.skipped, vec!["tutorial"]);
        assert_eq!(outcome.captured, vec!["wallet"]);
        assert!(outcome.failed.is_empty());
        assert_eq!(outcome.snapshot.len(), 1);
        assert!(outcome.snapshot.entry("tutorial").is_none());
    }

    #[test]
    fn test_capture_failure_does_not_abort_the_walk() {
        let mut registry = SaveRegistry::new();
        registry.register(
            TestSubsystem::new("flaky")
                .with_priority(-10)
                .fail_capture()
                .shared(),
        );
        registry.register(TestSubsystem::new("wallet").with_value(3).shared());

        let outcome = assembler().capture(&registry, &CodecRegistry::new());

        assert_eq!(outcome.failed, vec!["flaky"]);
        assert_eq!(outcome.captured, vec!["wallet"]);
        assert_eq!(outcome.snapshot.len(), 1);
    }

    #[test]
    fn test_capture_with_unregistered_kind_fails_that_subsystem() {
        let mut registry = SaveRegistry::new();
        registry.register(TestSubsystem::new("replay").with_kind("cbor").shared());
        registry.register(TestSubsystem::new("wallet").shared());

        let outcome = assembler().capture(&registry, &CodecRegistry::new());

        assert_eq!(outcome.failed, vec!["replay"]);
        assert_eq!(outcome.captured, vec!["wallet"]);
    }

    #[test]
    fn test_restore_round_trip() {
        let wallet = TestSubsystem::new("wallet").with_value(7).shared();
        let quests = TestSubsystem::new("quests").with_value(3).shared();

        let mut registry = SaveRegistry::new();
        registry.register(wallet.clone());
        registry.register(quests.clone());

        let codecs = CodecRegistry::new();
        let outcome = assembler().capture(&registry, &codecs);

        wallet.set_value(0);
        quests.set_value(0);

        let report = assembler().restore(&outcome.snapshot, &registry, &codecs);

        assert!(report.success);
        assert_eq!(wallet.value(), 7);
        assert_eq!(quests.value(), 3);
        assert_eq!(report.status_of("wallet"), Some(RestoreStatus::Restored));
        assert!(report.orphaned.is_empty());
    }

    #[test]
    fn test_restore_runs_before_load_pass_first() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let a = TestSubsystem::new("a").with_events(events.clone()).shared();
        let b = TestSubsystem::new("b").with_events(events.clone()).shared();

        let mut registry = SaveRegistry::new();
        registry.register(a);
        registry.register(b);

        let codecs = CodecRegistry::new();
        let outcome = assembler().capture(&registry, &codecs);
        events.lock().unwrap().clear();

        assembler().restore(&outcome.snapshot, &registry, &codecs);

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "a:before_load",
                "b:before_load",
                "a:restore",
                "a:after_load:true",
                "b:restore",
                "b:after_load:true"
            ]
        );
    }

    #[test]
    fn test_restore_missing_entry_is_not_fatal() {
        let wallet = TestSubsystem::new("wallet").with_value(5).shared();

        let mut registry = SaveRegistry::new();
        registry.register(wallet.clone());

        let codecs = CodecRegistry::new();
        let outcome = assembler().capture(&registry, &codecs);

        // A subsystem registered after the snapshot was taken
        let achievements = TestSubsystem::new("achievements").with_value(1).shared();
        registry.register(achievements.clone());

        wallet.set_value(0);
        let report = assembler().restore(&outcome.snapshot, &registry, &codecs);

        assert!(report.success);
        assert_eq!(wallet.value(), 5);
        assert_eq!(achievements.value(), 1);
        assert_eq!(
            report.status_of("achievements"),
            Some(RestoreStatus::MissingEntry)
        );
        assert!(achievements
            .events()
            .contains(&"achievements:after_load:false".to_string()));
    }

    #[test]
    fn test_restore_rejected_payload_fails_aggregate() {
        let wallet = TestSubsystem::new("wallet").with_value(2).shared();
        let picky = TestSubsystem::new("picky").reject_restore().shared();

        let mut registry = SaveRegistry::new();
        registry.register(wallet.clone());
        registry.register(picky.clone());

        let codecs = CodecRegistry::new();
        let outcome = assembler().capture(&registry, &codecs);

        wallet.set_value(0);
        let report = assembler().restore(&outcome.snapshot, &registry, &codecs);

        assert!(!report.success);
        assert_eq!(report.status_of("picky"), Some(RestoreStatus::Rejected));
        // The rejection does not stop other subsystems from restoring
        assert_eq!(wallet.value(), 2);
        assert!(picky
            .events()
            .contains(&"picky:after_load:false".to_string()));
    }

    #[test]
    fn test_restore_reports_orphaned_entries() {
        let mut full = SaveRegistry::new();
        full.register(TestSubsystem::new("wallet").with_value(4).shared());
        full.register(TestSubsystem::new("quests").with_value(8).shared());

        let codecs = CodecRegistry::new();
        let outcome = assembler().capture(&full, &codecs);

        // A fresh registry that no longer has the quests subsystem
        let wallet = TestSubsystem::new("wallet").shared();
        let mut fresh = SaveRegistry::new();
        fresh.register(wallet.clone());

        let report = assembler().restore(&outcome.snapshot, &fresh, &codecs);

        assert!(report.success);
        assert_eq!(report.orphaned, vec!["quests"]);
        assert_eq!(report.subsystems.len(), 1);
        assert_eq!(wallet.value(), 4);
    }

    #[test]
    fn test_restore_decode_failure() {
        let wallet = TestSubsystem::new("wallet").shared();
        let mut registry = SaveRegistry::new();
        registry.register(wallet.clone());

        let mut snapshot = Snapshot::new(FORMAT_VERSION);
        snapshot.push_entry(SnapshotEntry::new("wallet", "json", "{corrupt"));

        let report = assembler().restore(&snapshot, &registry, &CodecRegistry::new());

        assert!(!report.success);
        assert_eq!(report.status_of("wallet"), Some(RestoreStatus::DecodeFailed));
        assert!(wallet
            .events()
            .contains(&"wallet:after_load:false".to_string()));
    }

    #[test]
    fn test_restore_unknown_kind() {
        let replay = TestSubsystem::new("replay").shared();
        let mut registry = SaveRegistry::new();
        registry.register(replay.clone());

        let mut snapshot = Snapshot::new(FORMAT_VERSION);
        snapshot.push_entry(SnapshotEntry::new("replay", "cbor", "a1624f6b"));

        let report = assembler().restore(&snapshot, &registry, &CodecRegistry::new());

        assert!(!report.success);
        assert_eq!(report.status_of("replay"), Some(RestoreStatus::UnknownKind));
    }
}
