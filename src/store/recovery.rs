//! Log Recovery
//!
//! Rebuilds the key index by replaying the log from offset zero.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::Result;
use crate::index::{ByteRange, KeyIndex};
use crate::row::{decode_row, Op};

/// Summary of one replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecoveryStats {
    /// Rows decoded
    pub rows_replayed: u64,

    /// Set rows among them
    pub sets: u64,

    /// Delete rows among them
    pub deletes: u64,

    /// Bytes consumed; also the offset the next append goes to
    pub log_size: u64,

    /// Keys live once replay finished
    pub live_keys: usize,
}

/// Replay the log at `path` into a fresh index
///
/// The whole log must decode: a truncated row or an unknown op fails the
/// replay with the offset of the bad row, and no partial index is returned.
pub fn replay(path: &Path, buffer_size: usize) -> Result<(KeyIndex, RecoveryStats)> {
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(buffer_size, file);

    let mut index = KeyIndex::new();
    let mut stats = RecoveryStats::default();

    loop {
        let offset = stats.log_size;
        let decoded = match decode_row(&mut reader, offset) {
            Ok(Some(decoded)) => decoded,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(offset, error = %e, "log replay failed");
                return Err(e);
            }
        };

        match decoded.row.op {
            Op::Set => {
                index.set(&decoded.row.key, ByteRange::new(offset, decoded.len));
                stats.sets += 1;
            }
            Op::Delete => {
                index.delete(&decoded.row.key);
                stats.deletes += 1;
            }
        }

        stats.rows_replayed += 1;
        stats.log_size += decoded.len;
    }

    stats.live_keys = index.len();
    Ok((index, stats))
}
