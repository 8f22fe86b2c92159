//! Shared fixtures for crate tests.

use crate::saveable::Saveable;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// A configurable saveable for exercising capture/restore paths.
///
/// Holds a single integer as its state and records every protocol call in
/// an event log. Failure modes are switched on through the builder methods.
pub(crate) struct TestSubsystem {
    id: &'static str,
    priority: i32,
    kind: &'static str,
    value: Mutex<i64>,
    capture_none: bool,
    fail_capture: bool,
    reject_restore: bool,
    events: Arc<Mutex<Vec<String>>>,
}

impl TestSubsystem {
    pub(crate) fn new(id: &'static str) -> Self {
        Self {
            id,
            priority: 0,
            kind: "json",
            value: Mutex::new(0),
            capture_none: false,
            fail_capture: false,
            reject_restore: false,
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub(crate) fn with_kind(mut self, kind: &'static str) -> Self {
        self.kind = kind;
        self
    }

    pub(crate) fn with_value(self, value: i64) -> Self {
        *self.value.lock().unwrap() = value;
        self
    }

    /// Capture reports "nothing to persist".
    pub(crate) fn capture_none(mut self) -> Self {
        self.capture_none = true;
        self
    }

    /// Capture returns an error.
    pub(crate) fn fail_capture(mut self) -> Self {
        self.fail_capture = true;
        self
    }

    /// Restore refuses every payload.
    pub(crate) fn reject_restore(mut self) -> Self {
        self.reject_restore = true;
        self
    }

    /// Record protocol calls into a log shared with other fixtures.
    pub(crate) fn with_events(mut self, events: Arc<Mutex<Vec<String>>>) -> Self {
        self.events = events;
        self
    }

    pub(crate) fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub(crate) fn value(&self) -> i64 {
        *self.value.lock().unwrap()
    }

    pub(crate) fn set_value(&self, value: i64) {
        *self.value.lock().unwrap() = value;
    }

    pub(crate) fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl Saveable for TestSubsystem {
    fn save_id(&self) -> &str {
        self.id
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn payload_kind(&self) -> &str {
        self.kind
    }

    fn capture(&self) -> anyhow::Result<Option<Value>> {
        self.record(format!("{}:capture", self.id));
        if self.fail_capture {
            anyhow::bail!("{} capture failed", self.id);
        }
        if self.capture_none {
            return Ok(None);
        }
        Ok(Some(json!({ "value": self.value() })))
    }

    fn restore(&self, payload: Value) -> bool {
        self.record(format!("{}:restore", self.id));
        if self.reject_restore {
            return false;
        }
        match payload.get("value").and_then(|v| v.as_i64()) {
            Some(value) => {
                self.set_value(value);
                true
            }
            None => false,
        }
    }

    fn before_save(&self) {
        self.record(format!("{}:before_save", self.id));
    }

    fn after_save(&self, success: bool) {
        self.record(format!("{}:after_save:{success}", self.id));
    }

    fn before_load(&self) {
        self.record(format!("{}:before_load", self.id));
    }

    fn after_load(&self, success: bool) {
        self.record(format!("{}:after_load:{success}", self.id));
    }
}
