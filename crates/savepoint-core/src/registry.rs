//! Registry of saveable subsystems.

use crate::saveable::Saveable;
use std::sync::Arc;
use tracing::{debug, warn};

/// An adapter plus the ordering data captured at registration time.
struct RegisteredSaveable {
    adapter: Arc<dyn Saveable>,
    id: String,
    priority: i32,
    seq: u64,
}

/// Ordered collection of saveable subsystems.
///
/// Iteration always follows `(priority, registration order)`, re-established
/// after every mutation, so capture and restore see the same reproducible
/// sequence given the same registrations.
#[derive(Default)]
pub struct SaveRegistry {
    entries: Vec<RegisteredSaveable>,
    next_seq: u64,
}

impl SaveRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter.
    ///
    /// A duplicate `save_id` is ignored with a warning; the first
    /// registration wins.
    pub fn register(&mut self, adapter: Arc<dyn Saveable>) {
        let id = adapter.save_id().to_string();
        if self.lookup(&id).is_some() {
            warn!(id = %id, "Ignoring duplicate saveable registration");
            return;
        }

        let priority = adapter.priority();
        let seq = self.next_seq;
        self.next_seq += 1;

        debug!(id = %id, priority, "Registered saveable");
        self.entries.push(RegisteredSaveable {
            adapter,
            id,
            priority,
            seq,
        });
        self.entries.sort_by_key(|e| (e.priority, e.seq));
    }

    /// Remove an adapter by id. Removing an unknown id is a no-op.
    pub fn unregister(&mut self, id: &str) {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() < before {
            debug!(id = %id, "Unregistered saveable");
        }
    }

    /// Look up an adapter by id.
    pub fn lookup(&self, id: &str) -> Option<&Arc<dyn Saveable>> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.adapter)
    }

    /// Iterate adapters in capture/restore order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Saveable>> {
        self.entries.iter().map(|e| &e.adapter)
    }

    /// Registered ids in capture/restore order.
    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.id.clone()).collect()
    }

    /// Number of registered adapters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every adapter.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestSubsystem;

    #[test]
    fn test_orders_by_priority_then_registration() {
        let mut registry = SaveRegistry::new();
        registry.register(TestSubsystem::new("third").with_priority(30).shared());
        registry.register(TestSubsystem::new("first").with_priority(10).shared());
        registry.register(TestSubsystem::new("second").with_priority(20).shared());

        assert_eq!(registry.ids(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let mut registry = SaveRegistry::new();
        registry.register(TestSubsystem::new("a").shared());
        registry.register(TestSubsystem::new("b").shared());
        registry.register(TestSubsystem::new("c").shared());

        assert_eq!(registry.ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_id_keeps_first() {
        let mut registry = SaveRegistry::new();
        registry.register(TestSubsystem::new("wallet").with_value(1).shared());
        registry.register(TestSubsystem::new("wallet").with_value(2).shared());

        assert_eq!(registry.len(), 1);

        let kept = registry.lookup("wallet").unwrap();
        let captured = kept.capture().unwrap().unwrap();
        assert_eq!(captured["value"], 1);
    }

    #[test]
    fn test_unregister_unknown_is_noop() {
        let mut registry = SaveRegistry::new();
        registry.register(TestSubsystem::new("wallet").shared());

        registry.unregister("nonexistent");
        assert_eq!(registry.len(), 1);

        registry.unregister("wallet");
        assert!(registry.is_empty());
        assert!(registry.lookup("wallet").is_none());
    }

    #[test]
    fn test_reregistration_after_unregister() {
        let mut registry = SaveRegistry::new();
        registry.register(TestSubsystem::new("a").shared());
        registry.register(TestSubsystem::new("b").shared());

        registry.unregister("a");
        registry.register(TestSubsystem::new("a").shared());

        // Same priority, so the re-registered adapter now follows "b"
        assert_eq!(registry.ids(), vec!["b", "a"]);
    }

    #[test]
    fn test_clear() {
        let mut registry = SaveRegistry::new();
        registry.register(TestSubsystem::new("a").shared());
        registry.register(TestSubsystem::new("b").shared());

        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.ids(), Vec::<String>::new());
    }
}
