//! Error types for the core crate.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Settings error.
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Codec error.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Store error.
    #[error("store error: {0}")]
    Store(#[from] savepoint_store::StoreError),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings-specific errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Slot index outside `[0, max_slots)`.
    #[error("slot index {index} out of range (max_slots: {max_slots})")]
    SlotIndexOutOfRange { index: i32, max_slots: u32 },
}

/// Codec-specific errors.
#[derive(Debug, Error)]
pub enum CodecError {
    /// No codec registered for a payload kind.
    #[error("no codec registered for payload kind: {0}")]
    UnknownKind(String),

    /// Payload could not be encoded.
    #[error("encode failed: {0}")]
    Encode(String),

    /// Payload could not be decoded.
    #[error("decode failed: {0}")]
    Decode(String),
}

impl CodecError {
    /// Create an unknown kind error.
    pub fn unknown_kind(kind: impl Into<String>) -> Self {
        Self::UnknownKind(kind.into())
    }

    /// Create an encode error.
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode(message.into())
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
