//! The save coordinator.
//!
//! The coordinator is the single entry point applications drive saves and
//! loads through. It owns the subsystem registry, codecs, settings, slot
//! backend, and event bus. The save lifecycle state machine and the
//! auto-save policy both live here. Cheap to clone; all clones share one
//! coordinator.
//!
//! # Example
//!
//! ```ignore
//! use savepoint_core::{SaveCoordinator, SaveSettings, ServiceContext};
//! use savepoint_store::MemoryStore;
//! use std::sync::Arc;
//!
//! let coordinator =
//!     SaveCoordinator::with_store(SaveSettings::default(), Arc::new(MemoryStore::new()));
//!
//! let context = ServiceContext::new();
//! coordinator.initialize(&context).await;
//! coordinator.register(wallet);
//!
//! let report = coordinator.save_slot("manual-0").await;
//! assert!(report.success());
//! ```

use crate::assembler::{RestoreReport, SnapshotAssembler};
use crate::bus::{
    Bus, HostReady, LoadFinished, LoadStarted, SaveFinished, SaveStarted, SlotDeleted,
};
use crate::codec::{CodecRegistry, PayloadCodec};
use crate::context::ServiceContext;
use crate::error::CoreResult;
use crate::registry::SaveRegistry;
use crate::saveable::Saveable;
use crate::settings::SaveSettings;
use savepoint_model::SnapshotMetadata;
use savepoint_store::{default_store_with, FileStoreOptions, SlotStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Save lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Construction finished, not wired into a host yet.
    Uninitialized,
    /// Fully operational.
    Ready,
    /// Shutdown ran; the coordinator stays inert from here on.
    ShutDown,
}

/// How a save attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// The snapshot reached the backend.
    Saved,
    /// The coordinator is not in the ready state.
    NotReady,
    /// No slot backend is configured.
    NoBackend,
    /// The backend failed to persist the snapshot.
    StoreFailed,
}

/// Result of a save attempt.
#[derive(Debug, Clone)]
pub struct SaveReport {
    pub slot_key: String,
    pub status: SaveStatus,
    /// Subsystems that contributed an entry.
    pub captured: Vec<String>,
    /// Subsystems with nothing to persist.
    pub skipped: Vec<String>,
    /// Subsystems omitted because capture or encoding failed.
    pub failed: Vec<String>,
}

impl SaveReport {
    /// Whether the snapshot was persisted.
    pub fn success(&self) -> bool {
        self.status == SaveStatus::Saved
    }

    fn refused(slot_key: impl Into<String>, status: SaveStatus) -> Self {
        Self {
            slot_key: slot_key.into(),
            status,
            captured: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
        }
    }
}

/// How a load attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The snapshot was read and applied.
    Applied,
    /// No snapshot is stored under the slot key.
    MissingSlot,
    /// The coordinator is not in the ready state.
    NotReady,
    /// No slot backend is configured.
    NoBackend,
    /// The backend failed while reading the snapshot.
    StoreFailed,
    /// The snapshot's schema version is newer than this build supports.
    UnsupportedVersion,
    /// The load was cancelled before any state changed.
    Cancelled,
}

/// Result of a load attempt.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub slot_key: String,
    pub status: LoadStatus,
    /// Per-subsystem outcomes when a restore ran.
    pub restore: Option<RestoreReport>,
}

impl LoadReport {
    /// Whether the snapshot was applied and every attempted restore was
    /// accepted.
    pub fn success(&self) -> bool {
        self.status == LoadStatus::Applied && self.restore.as_ref().map_or(false, |r| r.success)
    }

    fn refused(slot_key: impl Into<String>, status: LoadStatus) -> Self {
        Self {
            slot_key: slot_key.into(),
            status,
            restore: None,
        }
    }
}

/// Session descriptors stamped into snapshot metadata at save time.
#[derive(Default)]
struct SessionMeta {
    play_time_seconds: f64,
    player_name: String,
    location: String,
    custom_data: String,
}

/// Countdown for interval auto-saves.
#[derive(Default)]
struct AutosaveClock {
    remaining_secs: f64,
}

/// Coordinates saves and loads across every registered subsystem.
#[derive(Clone)]
pub struct SaveCoordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    /// Registered saveable subsystems.
    registry: RwLock<SaveRegistry>,

    /// Payload codecs.
    codecs: RwLock<CodecRegistry>,

    /// Persistence and policy settings.
    settings: RwLock<SaveSettings>,

    /// Slot backend, if one was configured.
    store: Option<Arc<dyn SlotStore>>,

    /// Event bus.
    bus: Bus,

    /// Lifecycle state.
    state: RwLock<LifecycleState>,

    /// One guard per slot key, so the same slot never has two writers.
    slot_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,

    /// Session descriptors for snapshot metadata.
    session: RwLock<SessionMeta>,

    /// Interval auto-save countdown.
    autosave: Mutex<AutosaveClock>,

    /// Whether the host ready signal already ran its policy.
    host_ready_seen: Mutex<bool>,

    /// Context the coordinator registered itself into.
    context: RwLock<Option<ServiceContext>>,
}

impl SaveCoordinator {
    /// Create a coordinator without a slot backend.
    ///
    /// Initialization refuses to bring it ready until a backend exists, and
    /// slot operations fail gracefully in the meantime. Pass a
    /// [`NullStore`](savepoint_store::NullStore) instead to reach the ready
    /// state without persistence wired up.
    pub fn new(settings: SaveSettings) -> Self {
        Self::build(settings, None)
    }

    /// Create a coordinator with the given slot backend.
    pub fn with_store(settings: SaveSettings, store: Arc<dyn SlotStore>) -> Self {
        Self::build(settings, Some(store))
    }

    /// Create a coordinator backed by a file store in the platform data
    /// directory, configured from the settings' persistence fields.
    ///
    /// `None` when the platform exposes no data directory.
    pub fn with_default_store(settings: SaveSettings) -> Option<Self> {
        let options = FileStoreOptions {
            extension: settings.file_extension.clone(),
            pretty: settings.pretty_json,
        };
        let store = default_store_with(&settings.save_dir_name, options)?;
        Some(Self::build(settings, Some(Arc::new(store))))
    }

    fn build(settings: SaveSettings, store: Option<Arc<dyn SlotStore>>) -> Self {
        Self {
            inner: Arc::new(CoordinatorInner {
                registry: RwLock::new(SaveRegistry::new()),
                codecs: RwLock::new(CodecRegistry::new()),
                settings: RwLock::new(settings),
                store,
                bus: Bus::new(),
                state: RwLock::new(LifecycleState::Uninitialized),
                slot_locks: Mutex::new(HashMap::new()),
                session: RwLock::new(SessionMeta::default()),
                autosave: Mutex::new(AutosaveClock::default()),
                host_ready_seen: Mutex::new(false),
                context: RwLock::new(None),
            }),
        }
    }

    /// Get the event bus.
    pub fn bus(&self) -> &Bus {
        &self.inner.bus
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> LifecycleState {
        *self.inner.state.read().await
    }

    /// Whether the coordinator accepts slot operations.
    pub async fn is_ready(&self) -> bool {
        self.state().await == LifecycleState::Ready
    }

    /// Register a saveable subsystem.
    pub async fn register(&self, adapter: Arc<dyn Saveable>) {
        self.inner.registry.write().await.register(adapter);
    }

    /// Remove a subsystem by id.
    pub async fn unregister(&self, id: &str) {
        self.inner.registry.write().await.unregister(id);
    }

    /// Ids of registered subsystems in capture order.
    pub async fn registered_ids(&self) -> Vec<String> {
        self.inner.registry.read().await.ids()
    }

    /// Register a payload codec.
    pub async fn register_codec(&self, codec: Arc<dyn PayloadCodec>) {
        self.inner.codecs.write().await.register(codec);
    }

    /// Get a copy of the settings.
    pub async fn settings(&self) -> SaveSettings {
        self.inner.settings.read().await.clone()
    }

    /// Update the settings.
    ///
    /// Re-arms the auto-save countdown when the interval changed.
    pub async fn update_settings<F>(&self, f: F)
    where
        F: FnOnce(&mut SaveSettings),
    {
        let interval_changed = {
            let mut settings = self.inner.settings.write().await;
            let before = settings.autosave_interval_secs;
            f(&mut settings);
            settings.autosave_interval_secs != before
        };
        if interval_changed {
            self.arm_autosave().await;
        }
    }

    /// Select the active slot index.
    pub async fn set_active_slot(&self, index: i32) -> CoreResult<()> {
        let mut settings = self.inner.settings.write().await;
        settings.set_active_slot(index)?;
        Ok(())
    }

    /// Set the player name stamped into snapshot metadata.
    pub async fn set_player_name(&self, name: impl Into<String>) {
        self.inner.session.write().await.player_name = name.into();
    }

    /// Set the display location stamped into snapshot metadata.
    pub async fn set_location(&self, location: impl Into<String>) {
        self.inner.session.write().await.location = location.into();
    }

    /// Set free-form host data stamped into snapshot metadata.
    pub async fn set_custom_data(&self, data: impl Into<String>) {
        self.inner.session.write().await.custom_data = data.into();
    }

    /// Override the accumulated play time.
    pub async fn set_play_time(&self, seconds: f64) {
        self.inner.session.write().await.play_time_seconds = seconds;
    }

    /// Accumulated play time in seconds.
    pub async fn play_time(&self) -> f64 {
        self.inner.session.read().await.play_time_seconds
    }

    /// Bring the coordinator into the ready state.
    ///
    /// Requires a slot backend. Registers the coordinator in the shared
    /// context so other systems can resolve it, and starts listening for
    /// the host ready signal. Returns whether the coordinator is ready
    /// afterwards; a shut down coordinator cannot be revived.
    pub async fn initialize(&self, context: &ServiceContext) -> bool {
        match self.state().await {
            LifecycleState::Ready => {
                warn!("Coordinator is already initialized");
                return true;
            }
            LifecycleState::ShutDown => {
                error!("Cannot initialize a coordinator that was shut down");
                return false;
            }
            LifecycleState::Uninitialized => {}
        }

        if self.inner.store.is_none() {
            error!("Cannot initialize without a slot backend");
            return false;
        }

        context.register(self.clone()).await;
        *self.inner.context.write().await = Some(context.clone());

        self.arm_autosave().await;
        self.listen_for_host_ready().await;

        *self.inner.state.write().await = LifecycleState::Ready;
        info!("Save coordinator ready");
        true
    }

    /// Signal that the host finished bootstrapping.
    ///
    /// The first call runs the load-on-ready policy; later calls are
    /// ignored. Hosts can call this directly or publish [`HostReady`] on
    /// the bus.
    pub async fn notify_host_ready(&self) {
        if !self.is_ready().await {
            warn!("Ignoring host ready signal, coordinator is not initialized");
            return;
        }

        {
            let mut seen = self.inner.host_ready_seen.lock().await;
            if *seen {
                return;
            }
            *seen = true;
        }

        let settings = self.inner.settings.read().await.clone();
        if !settings.load_on_ready {
            return;
        }

        match settings.current_auto_key() {
            Some(key) => {
                info!(slot = %key, "Loading auto slot after host ready");
                self.load_slot(&key).await;
            }
            None => debug!("Load on ready skipped, no active slot selected"),
        }
    }

    /// Advance the coordinator's clock.
    ///
    /// Hosts call this from their frame or tick loop. Accumulates play time
    /// and drives the interval auto-save countdown; firing schedules the
    /// save on the runtime and immediately re-arms, so a slow backend never
    /// stalls the tick.
    pub async fn tick(&self, delta_secs: f64) {
        if delta_secs <= 0.0 || !self.is_ready().await {
            return;
        }

        self.inner.session.write().await.play_time_seconds += delta_secs;

        let settings = self.inner.settings.read().await.clone();
        if !settings.autosave_enabled() {
            return;
        }

        let fired = {
            let mut clock = self.inner.autosave.lock().await;
            clock.remaining_secs -= delta_secs;
            if clock.remaining_secs <= 0.0 {
                clock.remaining_secs = settings.autosave_interval_secs;
                true
            } else {
                false
            }
        };
        if !fired {
            return;
        }

        match settings.current_auto_key() {
            Some(key) => {
                debug!(slot = %key, "Interval auto-save fired");
                let coordinator = self.clone();
                tokio::spawn(async move {
                    coordinator.save_slot(&key).await;
                });
            }
            None => debug!("Interval auto-save skipped, no active slot selected"),
        }
    }

    /// Signal that the host is being suspended.
    ///
    /// Runs the save-on-suspend policy and waits for the write, since the
    /// host may not get another chance to run it.
    pub async fn notify_suspended(&self) {
        if !self.is_ready().await {
            return;
        }

        let settings = self.inner.settings.read().await.clone();
        if !settings.save_on_suspend {
            return;
        }

        match settings.current_auto_key() {
            Some(key) => {
                info!(slot = %key, "Saving before suspend");
                self.save_slot(&key).await;
            }
            None => debug!("Suspend save skipped, no active slot selected"),
        }
    }

    /// Shut the coordinator down.
    ///
    /// Runs the save-on-quit policy to completion, clears the registry, and
    /// leaves the coordinator in its terminal state. Further operations are
    /// rejected; build a fresh coordinator to start over.
    pub async fn shutdown(&self) {
        if self.state().await != LifecycleState::Ready {
            debug!("Shutdown requested but coordinator is not ready");
            return;
        }

        let settings = self.inner.settings.read().await.clone();
        if settings.save_on_quit {
            match settings.current_auto_key() {
                Some(key) => {
                    info!(slot = %key, "Saving before shutdown");
                    self.save_slot(&key).await;
                }
                None => debug!("Quit save skipped, no active slot selected"),
            }
        }

        *self.inner.state.write().await = LifecycleState::ShutDown;
        self.inner.registry.write().await.clear();

        if let Some(context) = self.inner.context.write().await.take() {
            context.unregister::<SaveCoordinator>().await;
        }

        info!("Save coordinator shut down");
    }

    /// Blocking variant of [`SaveCoordinator::shutdown`] for hosts whose
    /// quit callback is synchronous.
    ///
    /// Bridges onto the ambient multi-threaded runtime when called from
    /// inside one, otherwise runs shutdown on a throwaway runtime. Not for
    /// use inside a single-threaded runtime; call
    /// [`SaveCoordinator::shutdown`] there.
    pub fn shutdown_blocking(&self) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let coordinator = self.clone();
                tokio::task::block_in_place(move || handle.block_on(coordinator.shutdown()));
            }
            Err(_) => match tokio::runtime::Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime.block_on(self.shutdown()),
                Err(e) => error!(error = %e, "Could not run blocking shutdown"),
            },
        }
    }

    /// Save every registered subsystem into the given slot.
    pub async fn save_slot(&self, slot_key: &str) -> SaveReport {
        let Some(store) = self.inner.store.as_ref() else {
            error!(slot = %slot_key, "Cannot save, no slot backend configured");
            return SaveReport::refused(slot_key, SaveStatus::NoBackend);
        };
        if !self.is_ready().await {
            warn!(slot = %slot_key, "Cannot save, coordinator is not ready");
            return SaveReport::refused(slot_key, SaveStatus::NotReady);
        }

        let guard = self.slot_lock(slot_key).await;
        let _guard = guard.lock().await;

        self.inner
            .bus
            .publish(SaveStarted {
                slot_key: slot_key.to_string(),
            })
            .await;

        let format_version = self.inner.settings.read().await.format_version;
        let assembler = SnapshotAssembler::new(format_version);

        let registry = self.inner.registry.read().await;
        let mut outcome = {
            let codecs = self.inner.codecs.read().await;
            assembler.capture(&registry, &codecs)
        };

        {
            let session = self.inner.session.read().await;
            let snapshot = &mut outcome.snapshot;
            snapshot.metadata.slot_key = slot_key.to_string();
            snapshot.metadata.captured_at = snapshot.captured_at;
            snapshot.metadata.play_time_seconds = session.play_time_seconds;
            snapshot.metadata.player_name = session.player_name.clone();
            snapshot.metadata.location = session.location.clone();
            snapshot.metadata.custom_data = session.custom_data.clone();
        }

        let status = match store.write(slot_key, &outcome.snapshot).await {
            Ok(()) => {
                info!(
                    slot = %slot_key,
                    subsystems = outcome.captured.len(),
                    "Saved snapshot"
                );
                SaveStatus::Saved
            }
            Err(e) => {
                error!(slot = %slot_key, error = %e, "Failed to persist snapshot");
                SaveStatus::StoreFailed
            }
        };

        let success = status == SaveStatus::Saved;
        for adapter in registry.iter() {
            adapter.after_save(success);
        }
        drop(registry);

        self.inner
            .bus
            .publish(SaveFinished {
                slot_key: slot_key.to_string(),
                success,
            })
            .await;

        SaveReport {
            slot_key: slot_key.to_string(),
            status,
            captured: outcome.captured,
            skipped: outcome.skipped,
            failed: outcome.failed,
        }
    }

    /// Load the given slot and restore every registered subsystem.
    pub async fn load_slot(&self, slot_key: &str) -> LoadReport {
        self.load_slot_inner(slot_key, None).await
    }

    /// Like [`SaveCoordinator::load_slot`], but abandons the load if the
    /// token is cancelled before any subsystem state has changed.
    pub async fn load_slot_with_cancel(
        &self,
        slot_key: &str,
        cancel: &CancellationToken,
    ) -> LoadReport {
        self.load_slot_inner(slot_key, Some(cancel)).await
    }

    async fn load_slot_inner(
        &self,
        slot_key: &str,
        cancel: Option<&CancellationToken>,
    ) -> LoadReport {
        let Some(store) = self.inner.store.as_ref() else {
            error!(slot = %slot_key, "Cannot load, no slot backend configured");
            return LoadReport::refused(slot_key, LoadStatus::NoBackend);
        };
        if !self.is_ready().await {
            warn!(slot = %slot_key, "Cannot load, coordinator is not ready");
            return LoadReport::refused(slot_key, LoadStatus::NotReady);
        }

        let guard = self.slot_lock(slot_key).await;
        let _guard = guard.lock().await;

        self.inner
            .bus
            .publish(LoadStarted {
                slot_key: slot_key.to_string(),
            })
            .await;

        let report = self.run_load(store, slot_key, cancel).await;

        self.inner
            .bus
            .publish(LoadFinished {
                slot_key: slot_key.to_string(),
                success: report.success(),
            })
            .await;

        report
    }

    async fn run_load(
        &self,
        store: &Arc<dyn SlotStore>,
        slot_key: &str,
        cancel: Option<&CancellationToken>,
    ) -> LoadReport {
        if cancelled(cancel) {
            debug!(slot = %slot_key, "Load cancelled before reading slot");
            return LoadReport::refused(slot_key, LoadStatus::Cancelled);
        }

        let snapshot = match store.read(slot_key).await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                warn!(slot = %slot_key, "No snapshot stored under slot");
                return LoadReport::refused(slot_key, LoadStatus::MissingSlot);
            }
            Err(e) => {
                error!(slot = %slot_key, error = %e, "Failed to read snapshot");
                return LoadReport::refused(slot_key, LoadStatus::StoreFailed);
            }
        };

        let supported = self.inner.settings.read().await.format_version;
        if snapshot.format_version > supported {
            warn!(
                slot = %slot_key,
                version = snapshot.format_version,
                supported,
                "Snapshot format is newer than this build supports"
            );
            return LoadReport::refused(slot_key, LoadStatus::UnsupportedVersion);
        }

        if cancelled(cancel) {
            debug!(slot = %slot_key, "Load cancelled before applying snapshot");
            return LoadReport::refused(slot_key, LoadStatus::Cancelled);
        }

        let assembler = SnapshotAssembler::new(supported);
        let restore = {
            let registry = self.inner.registry.read().await;
            let codecs = self.inner.codecs.read().await;
            assembler.restore(&snapshot, &registry, &codecs)
        };

        {
            let mut session = self.inner.session.write().await;
            session.play_time_seconds = snapshot.metadata.play_time_seconds;
            session.player_name = snapshot.metadata.player_name.clone();
            session.location = snapshot.metadata.location.clone();
            session.custom_data = snapshot.metadata.custom_data.clone();
        }

        info!(slot = %slot_key, success = restore.success, "Applied snapshot");
        LoadReport {
            slot_key: slot_key.to_string(),
            status: LoadStatus::Applied,
            restore: Some(restore),
        }
    }

    /// Whether a snapshot is stored under the slot key.
    pub async fn slot_exists(&self, slot_key: &str) -> bool {
        let Some(store) = self.inner.store.as_ref() else {
            error!(slot = %slot_key, "Cannot check slot, no slot backend configured");
            return false;
        };
        if !self.is_ready().await {
            warn!(slot = %slot_key, "Cannot check slot, coordinator is not ready");
            return false;
        }

        match store.exists(slot_key).await {
            Ok(exists) => exists,
            Err(e) => {
                warn!(slot = %slot_key, error = %e, "Slot existence check failed");
                false
            }
        }
    }

    /// Metadata of the snapshot stored under the slot key, if any.
    ///
    /// A convenience for slot pickers; only the snapshot head is read.
    pub async fn slot_metadata(&self, slot_key: &str) -> Option<SnapshotMetadata> {
        let Some(store) = self.inner.store.as_ref() else {
            error!(slot = %slot_key, "Cannot read metadata, no slot backend configured");
            return None;
        };
        if !self.is_ready().await {
            warn!(slot = %slot_key, "Cannot read metadata, coordinator is not ready");
            return None;
        }

        match store.read_head(slot_key).await {
            Ok(Some(head)) => Some(head.metadata),
            Ok(None) => None,
            Err(e) => {
                warn!(slot = %slot_key, error = %e, "Could not read slot metadata");
                None
            }
        }
    }

    /// Stored slot keys, optionally filtered by prefix.
    pub async fn list_slots(&self, prefix: Option<&str>) -> Vec<String> {
        let Some(store) = self.inner.store.as_ref() else {
            error!("Cannot list slots, no slot backend configured");
            return Vec::new();
        };
        if !self.is_ready().await {
            warn!("Cannot list slots, coordinator is not ready");
            return Vec::new();
        }

        match store.list_keys(prefix).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, "Could not list slots");
                Vec::new()
            }
        }
    }

    /// Delete the slot. Deleting an absent slot succeeds.
    pub async fn delete_slot(&self, slot_key: &str) -> bool {
        let Some(store) = self.inner.store.as_ref() else {
            error!(slot = %slot_key, "Cannot delete slot, no slot backend configured");
            return false;
        };
        if !self.is_ready().await {
            warn!(slot = %slot_key, "Cannot delete slot, coordinator is not ready");
            return false;
        }

        let guard = self.slot_lock(slot_key).await;
        let _guard = guard.lock().await;

        let existed = store.exists(slot_key).await.unwrap_or(false);
        match store.delete(slot_key).await {
            Ok(()) => {
                if existed {
                    info!(slot = %slot_key, "Deleted slot");
                    self.inner
                        .bus
                        .publish(SlotDeleted {
                            slot_key: slot_key.to_string(),
                        })
                        .await;
                }
                true
            }
            Err(e) => {
                error!(slot = %slot_key, error = %e, "Failed to delete slot");
                false
            }
        }
    }

    async fn arm_autosave(&self) {
        let interval = self.inner.settings.read().await.autosave_interval_secs;
        self.inner.autosave.lock().await.remaining_secs = interval;
    }

    /// Spawn a task that forwards the first [`HostReady`] bus event into
    /// [`SaveCoordinator::notify_host_ready`].
    ///
    /// Holds only a weak handle, so it winds down once the coordinator is
    /// dropped.
    async fn listen_for_host_ready(&self) {
        let mut rx = self.inner.bus.subscribe::<HostReady>().await;
        let weak = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            if rx.recv().await.is_ok() {
                if let Some(inner) = weak.upgrade() {
                    SaveCoordinator { inner }.notify_host_ready().await;
                }
            }
        });
    }

    async fn slot_lock(&self, slot_key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.inner.slot_locks.lock().await;
        locks
            .entry(slot_key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

fn cancelled(cancel: Option<&CancellationToken>) -> bool {
    cancel.is_some_and(|token| token.is_cancelled())
}
