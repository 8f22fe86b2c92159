//! The adapter trait subsystems implement to take part in saves.

use serde_json::Value;

/// A subsystem that contributes state to unified snapshots.
///
/// Implementors register once with the coordinator and are driven through
/// the capture/restore protocol from then on. All methods take `&self`;
/// adapters that mutate state on restore use interior mutability, since the
/// registry shares them as `Arc<dyn Saveable>` and the owning application
/// usually keeps its own handle.
///
/// # Example
///
/// ```
/// use savepoint_core::Saveable;
/// use serde_json::{json, Value};
/// use std::sync::Mutex;
///
/// struct Wallet {
///     coins: Mutex<u64>,
/// }
///
/// impl Saveable for Wallet {
///     fn save_id(&self) -> &str {
///         "wallet"
///     }
///
///     fn capture(&self) -> anyhow::Result<Option<Value>> {
///         Ok(Some(json!({ "coins": *self.coins.lock().unwrap() })))
///     }
///
///     fn restore(&self, payload: Value) -> bool {
///         match payload.get("coins").and_then(|v| v.as_u64()) {
///             Some(coins) => {
///                 *self.coins.lock().unwrap() = coins;
///                 true
///             }
///             None => false,
///         }
///     }
/// }
/// ```
pub trait Saveable: Send + Sync {
    /// Stable unique key identifying this subsystem in snapshots.
    fn save_id(&self) -> &str;

    /// Capture/restore ordering. Lower values run first; ties keep
    /// registration order.
    fn priority(&self) -> i32 {
        0
    }

    /// Codec tag for this subsystem's payloads.
    fn payload_kind(&self) -> &str {
        "json"
    }

    /// Capture the subsystem's current state.
    ///
    /// `Ok(None)` means there is nothing to persist right now; the
    /// subsystem is left out of the snapshot without counting as a failure.
    /// An `Err` is caught, logged, and also leaves the subsystem out.
    fn capture(&self) -> anyhow::Result<Option<Value>>;

    /// Apply a previously captured payload.
    ///
    /// Returns whether the subsystem accepted the payload.
    fn restore(&self, payload: Value) -> bool;

    /// Called immediately before this subsystem's state is captured.
    fn before_save(&self) {}

    /// Called after a save attempt with its outcome. Runs for every
    /// registered subsystem, whether or not it contributed an entry.
    fn after_save(&self, _success: bool) {}

    /// Called on every registered subsystem before any restore runs, so
    /// state can be reset ahead of a load.
    fn before_load(&self) {}

    /// Called after this subsystem's restore attempt with its outcome.
    fn after_load(&self, _success: bool) {}
}
