//! Event bus for save lifecycle notifications.
//!
//! The event bus provides a publish/subscribe mechanism so UI layers and
//! other observers can react to saves and loads without direct coupling
//! to the coordinator. Events are typed and can carry payload data.
//!
//! # Example
//!
//! ```ignore
//! let bus = coordinator.bus();
//!
//! // Subscribe to save completion events
//! let mut rx = bus.subscribe::<SaveFinished>().await;
//! tokio::spawn(async move {
//!     while let Ok(event) = rx.recv().await {
//!         println!("Saved {}: {}", event.slot_key, event.success);
//!     }
//! });
//! ```

use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::warn;

/// Default channel capacity.
const DEFAULT_CAPACITY: usize = 256;

/// Trait for events published on the bus.
pub trait Event: Clone + Send + Sync + 'static {
    /// Dot-separated event name, stable across releases.
    fn event_type() -> &'static str;
}

/// Clonable handle to the save event bus.
#[derive(Clone)]
pub struct Bus {
    inner: Arc<BusInner>,
}

struct BusInner {
    /// One broadcast channel per concrete event type.
    channels: RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
    /// Mirror of every event as JSON, for whole-lifecycle observers.
    wildcard: broadcast::Sender<BusEvent>,
}

/// A serialized event, as seen by wildcard subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusEvent {
    /// Event type name.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event payload as JSON.
    pub payload: serde_json::Value,
}

impl Bus {
    /// Create a new event bus.
    pub fn new() -> Self {
        let (wildcard, _) = broadcast::channel(DEFAULT_CAPACITY);
        Self {
            inner: Arc::new(BusInner {
                channels: RwLock::new(HashMap::new()),
                wildcard,
            }),
        }
    }

    /// Publish an event to typed and wildcard subscribers.
    ///
    /// Publishing never fails; an event with no subscribers is dropped.
    pub async fn publish<E: Event + Serialize>(&self, event: E) {
        {
            let channels = self.inner.channels.read().await;
            if let Some(tx) = channels
                .get(&TypeId::of::<E>())
                .and_then(|sender| sender.downcast_ref::<broadcast::Sender<E>>())
            {
                let _ = tx.send(event.clone());
            }
        }

        match serde_json::to_value(&event) {
            Ok(payload) => {
                let _ = self.inner.wildcard.send(BusEvent {
                    event_type: E::event_type().to_string(),
                    payload,
                });
            }
            Err(e) => {
                warn!(event_type = E::event_type(), error = %e, "Skipping wildcard mirror");
            }
        }
    }

    /// Subscribe to events of type `E`.
    ///
    /// The channel for `E` is created on first use; all subscribers of the
    /// same type share it.
    pub async fn subscribe<E: Event>(&self) -> broadcast::Receiver<E> {
        let mut channels = self.inner.channels.write().await;

        if let Some(tx) = channels
            .get(&TypeId::of::<E>())
            .and_then(|sender| sender.downcast_ref::<broadcast::Sender<E>>())
        {
            return tx.subscribe();
        }

        let (tx, rx) = broadcast::channel::<E>(DEFAULT_CAPACITY);
        channels.insert(TypeId::of::<E>(), Box::new(tx));
        rx
    }

    /// Subscribe to every event in its JSON form.
    pub fn subscribe_all(&self) -> broadcast::Receiver<BusEvent> {
        self.inner.wildcard.subscribe()
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Built-in Event Types
// ============================================================================

/// Save started event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveStarted {
    pub slot_key: String,
}

impl Event for SaveStarted {
    fn event_type() -> &'static str {
        "save.started"
    }
}

/// Save finished event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveFinished {
    pub slot_key: String,
    pub success: bool,
}

impl Event for SaveFinished {
    fn event_type() -> &'static str {
        "save.finished"
    }
}

/// Load started event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadStarted {
    pub slot_key: String,
}

impl Event for LoadStarted {
    fn event_type() -> &'static str {
        "load.started"
    }
}

/// Load finished event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadFinished {
    pub slot_key: String,
    pub success: bool,
}

impl Event for LoadFinished {
    fn event_type() -> &'static str {
        "load.finished"
    }
}

/// Slot deleted event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotDeleted {
    pub slot_key: String,
}

impl Event for SlotDeleted {
    fn event_type() -> &'static str {
        "slot.deleted"
    }
}

/// Host finished its bootstrap and gameplay systems are live.
///
/// The coordinator listens for the first occurrence and runs its
/// load-on-ready policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HostReady;

impl Event for HostReady {
    fn event_type() -> &'static str {
        "host.ready"
    }
}
