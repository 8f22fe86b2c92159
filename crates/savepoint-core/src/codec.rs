//! Payload codecs.
//!
//! Every snapshot entry carries a `payload_kind` tag. A codec registered for
//! that tag turns captured subsystem state into the entry's opaque payload
//! text and back. The JSON codec is registered by default; applications add
//! codecs for other kinds alongside subsystem registration at startup.

use crate::error::CodecError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// A strategy for encoding and decoding one payload kind.
pub trait PayloadCodec: Send + Sync {
    /// Kind tag this codec handles.
    fn kind(&self) -> &str;

    /// Encode a captured value into payload text.
    fn encode(&self, value: &Value) -> Result<String, CodecError>;

    /// Decode payload text back into a value.
    fn decode(&self, payload: &str) -> Result<Value, CodecError>;
}

/// The built-in JSON payload codec.
pub struct JsonCodec;

impl PayloadCodec for JsonCodec {
    fn kind(&self) -> &str {
        "json"
    }

    fn encode(&self, value: &Value) -> Result<String, CodecError> {
        serde_json::to_string(value).map_err(|e| CodecError::encode(e.to_string()))
    }

    fn decode(&self, payload: &str) -> Result<Value, CodecError> {
        serde_json::from_str(payload).map_err(|e| CodecError::decode(e.to_string()))
    }
}

/// Registry mapping payload kinds to codecs.
pub struct CodecRegistry {
    codecs: HashMap<String, Arc<dyn PayloadCodec>>,
}

impl CodecRegistry {
    /// Create a registry with the JSON codec pre-registered.
    pub fn new() -> Self {
        let mut registry = Self {
            codecs: HashMap::new(),
        };
        registry.register(Arc::new(JsonCodec));
        registry
    }

    /// Register a codec under its kind.
    ///
    /// A duplicate kind is ignored with a warning; the first registration
    /// wins.
    pub fn register(&mut self, codec: Arc<dyn PayloadCodec>) {
        let kind = codec.kind().to_string();
        if self.codecs.contains_key(&kind) {
            warn!(kind = %kind, "Ignoring duplicate codec registration");
            return;
        }

        debug!(kind = %kind, "Registered payload codec");
        self.codecs.insert(kind, codec);
    }

    /// Look up the codec for a payload kind.
    pub fn get(&self, kind: &str) -> Result<&Arc<dyn PayloadCodec>, CodecError> {
        self.codecs
            .get(kind)
            .ok_or_else(|| CodecError::unknown_kind(kind))
    }

    /// Whether a codec is registered for a kind.
    pub fn contains(&self, kind: &str) -> bool {
        self.codecs.contains_key(kind)
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}
