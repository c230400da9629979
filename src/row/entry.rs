//! Row definitions
//!
//! Defines the structure of individual log rows.

use bytes::Bytes;

use crate::error::Result;

/// Operations that can be logged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Op {
    /// Install a value for a key
    Set = 0x01,

    /// Remove a key (tombstone)
    Delete = 0x02,
}

impl Op {
    /// Parse an op tag; `None` for bytes outside the known set
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(Op::Set),
            0x02 => Some(Op::Delete),
            _ => None,
        }
    }

    /// The tag written to disk
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// A single row in the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// The operation this row records
    pub op: Op,

    /// Key bytes (at most 255)
    pub key: Vec<u8>,

    /// Value bytes (at most 65535, empty for deletes)
    pub value: Vec<u8>,
}

impl Row {
    /// Create a Set row
    pub fn set(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            op: Op::Set,
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a Delete row
    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        Self {
            op: Op::Delete,
            key: key.into(),
            value: Vec::new(),
        }
    }

    /// Encode this row to its on-disk bytes
    pub fn encode(&self) -> Result<Bytes> {
        super::encode_row(self.op, &self.key, &self.value)
    }

    /// Size of this row once encoded
    pub fn encoded_len(&self) -> usize {
        super::HEADER_SIZE + self.key.len() + self.value.len()
    }
}
