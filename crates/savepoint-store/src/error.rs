//! Store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure in the backing directory
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot document failed to serialize or parse
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Slot key is empty or reduces to nothing after sanitization
    #[error("Invalid slot key: {0}")]
    InvalidKey(String),

    /// Backend cannot persist anything (null store)
    #[error("Store is unavailable: {0}")]
    Unavailable(String),

    /// A thread panicked while holding the slot table lock
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

impl StoreError {
    /// Create an invalid key error.
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey(message.into())
    }

    /// Create an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_invalid_key_formats_message() {
        let err = StoreError::invalid_key("empty slot key");
        assert_eq!(err.to_string(), "Invalid slot key: empty slot key");
    }

    #[test]
    fn test_store_error_unavailable_formats_message() {
        let err = StoreError::unavailable("null store discards writes");
        assert_eq!(
            err.to_string(),
            "Store is unavailable: null store discards writes"
        );
    }

    #[test]
    fn test_store_error_io_wraps_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only dir");
        let err = StoreError::from(io_err);
        assert!(err.to_string().contains("IO error"));
        assert!(err.to_string().contains("read-only dir"));
    }

    #[test]
    fn test_store_error_json_wraps_serde_error() {
        let json_err = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
        let err = StoreError::from(json_err);
        assert!(err.to_string().contains("JSON error"));
    }

    #[test]
    fn test_store_error_lock_poisoned_displays() {
        let err = StoreError::LockPoisoned("mutex poisoned".to_string());
        assert_eq!(err.to_string(), "Lock poisoned: mutex poisoned");
    }
}
