//! Error types for keylog
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using KeylogError
pub type Result<T> = std::result::Result<T, KeylogError>;

/// Unified error type for keylog operations
#[derive(Debug, Error)]
pub enum KeylogError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("append at offset {offset} failed: {source}")]
    Append {
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("read of row at offset {offset} failed: {source}")]
    Read {
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("writer disabled after a failed rollback at offset {offset}")]
    Poisoned { offset: u64 },

    // -------------------------------------------------------------------------
    // Row Encoding Errors (raised before any I/O)
    // -------------------------------------------------------------------------
    #[error("key too long: {len} bytes (max {})", crate::row::MAX_KEY_LEN)]
    KeyTooLong { len: usize },

    #[error("value too long: {len} bytes (max {})", crate::row::MAX_VALUE_LEN)]
    ValueTooLong { len: usize },

    // -------------------------------------------------------------------------
    // Log Corruption Errors
    // -------------------------------------------------------------------------
    #[error("truncated row at offset {offset}: log ends while reading {field}")]
    TruncatedRow { offset: u64, field: &'static str },

    #[error("unknown op 0x{op:02x} at offset {offset}")]
    UnknownOp { offset: u64, op: u8 },

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("key not found: {:?}", String::from_utf8_lossy(.key))]
    KeyNotFound { key: Vec<u8> },

    #[error("prefix not found: {:?}", String::from_utf8_lossy(.prefix))]
    PrefixNotFound { prefix: Vec<u8> },

    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("store is closed")]
    Closed,

    // -------------------------------------------------------------------------
    // Caller Errors
    // -------------------------------------------------------------------------
    #[error("walk callback failed: {0}")]
    Callback(Box<dyn std::error::Error + Send + Sync>),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl KeylogError {
    /// Wrap an arbitrary caller error raised from inside a walk callback
    pub fn callback<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        KeylogError::Callback(err.into())
    }

    /// Whether this error means the log on disk is malformed
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            KeylogError::TruncatedRow { .. } | KeylogError::UnknownOp { .. }
        )
    }

    /// Byte offset in the log where the error was detected, if any
    pub fn offset(&self) -> Option<u64> {
        match self {
            KeylogError::TruncatedRow { offset, .. }
            | KeylogError::UnknownOp { offset, .. }
            | KeylogError::Append { offset, .. }
            | KeylogError::Read { offset, .. }
            | KeylogError::Poisoned { offset } => Some(*offset),
            _ => None,
        }
    }
}
