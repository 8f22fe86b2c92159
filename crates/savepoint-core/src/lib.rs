//! Save orchestration for savepoint.
//!
//! This crate provides the coordination layer of savepoint:
//! - Saveable adapter trait and priority-ordered registry
//! - Snapshot assembly and two-pass restore
//! - Payload codecs for entry encoding
//! - Save coordinator with lifecycle state machine and auto-save policy
//! - Settings with slot-key derivation
//! - Event bus for save lifecycle notifications
//! - Shared service context for host integration
//! - Logging setup with tracing

pub mod assembler;
pub mod bus;
pub mod codec;
pub mod context;
pub mod coordinator;
pub mod error;
pub mod log;
pub mod registry;
pub mod saveable;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_support;

pub use assembler::{
    CaptureOutcome, RestoreReport, RestoreStatus, SnapshotAssembler, SubsystemRestore,
};
pub use bus::{
    Bus, BusEvent, Event, HostReady, LoadFinished, LoadStarted, SaveFinished, SaveStarted,
    SlotDeleted,
};
pub use codec::{CodecRegistry, JsonCodec, PayloadCodec};
pub use context::ServiceContext;
pub use coordinator::{
    LifecycleState, LoadReport, LoadStatus, SaveCoordinator, SaveReport, SaveStatus,
};
pub use error::{CodecError, CoreError, CoreResult, SettingsError};
pub use registry::SaveRegistry;
pub use saveable::Saveable;
pub use settings::{SaveSettings, NO_ACTIVE_SLOT};
