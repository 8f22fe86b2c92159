//! Shared service context.
//!
//! A typed service locator the host threads through its subsystems. The
//! coordinator registers itself here during initialization so gameplay
//! code can resolve it without holding direct references, and removes
//! itself again on shutdown.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Service registry keyed by type. Cheap to clone and share.
#[derive(Clone, Default)]
pub struct ServiceContext {
    inner: Arc<RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>>,
}

impl ServiceContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service, replacing any previous one of the same type.
    pub async fn register<T: Clone + Send + Sync + 'static>(&self, service: T) {
        let mut services = self.inner.write().await;
        services.insert(TypeId::of::<T>(), Box::new(service));
    }

    /// Resolve a service by type.
    pub async fn get<T: Clone + Send + Sync + 'static>(&self) -> Option<T> {
        let services = self.inner.read().await;
        services
            .get(&TypeId::of::<T>())
            .and_then(|service| service.downcast_ref::<T>())
            .cloned()
    }

    /// Remove a service by type.
    pub async fn unregister<T: Clone + Send + Sync + 'static>(&self) {
        let mut services = self.inner.write().await;
        services.remove(&TypeId::of::<T>());
    }

    /// Whether a service of the given type is registered.
    pub async fn contains<T: Clone + Send + Sync + 'static>(&self) -> bool {
        let services = self.inner.read().await;
        services.contains_key(&TypeId::of::<T>())
    }
}
