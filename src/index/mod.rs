//! Index Module
//!
//! In-memory map from key to the location of its latest row in the log.
//!
//! ## Responsibilities
//! - Point lookups in O(key length)
//! - Mirror exactly what replaying the log would produce
//! - Ordered prefix traversal without sorting
//!
//! ## Data Structure Choice
//! A 256-ary trie stored in an arena (`Vec` of nodes addressed by index):
//! - Children kept sorted by byte, so depth-first order is lexicographic order
//! - Deletes only clear a node's ref; nodes are reclaimed solely by an
//!   explicit compaction (see `KeyIndex::compacted`)

mod trie;

pub use trie::KeyIndex;

/// Location of one encoded row within the log file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// Byte offset of the row's first byte
    pub offset: u64,

    /// Encoded row length in bytes
    pub len: u64,
}

impl ByteRange {
    pub fn new(offset: u64, len: u64) -> Self {
        Self { offset, len }
    }

    /// Offset one past the row's last byte
    pub fn end(&self) -> u64 {
        self.offset + self.len
    }
}
