//! Store Module
//!
//! The storage engine: one append-only log file plus its in-memory index.
//!
//! ## Responsibilities
//! - Rebuild the index by replaying the log on open
//! - Append a row before touching the index on every write
//! - Serve reads with one seek + decode per key
//! - Enforce the Open → Closed lifecycle
//!
//! ## Lifecycle
//! ```text
//!   open (replay ok) ┌────────┐   close   ┌────────┐
//!  ─────────────────►│  Open  │──────────►│ Closed │
//!                    └────────┘           └────────┘
//! ```
//! Every operation on a closed store fails with `KeylogError::Closed`.

mod reader;
mod recovery;
mod writer;

pub use reader::LogReader;
pub use recovery::{replay, RecoveryStats};
pub use writer::{LogFile, LogWriter};

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::time::Instant;

use crate::config::{Config, IndexCompaction};
use crate::error::{KeylogError, Result};
use crate::index::KeyIndex;
use crate::row::{encode_row, Op};

/// File handles held while the store is open
struct Handles {
    reader: LogReader,
    writer: LogWriter,
}

/// An open single-file key-value store
///
/// ## Concurrency Model: single owner
///
/// Every mutating call takes `&mut self`, and so do reads that seek the
/// file. Share a store across threads through [`crate::SharedStore`].
pub struct Store {
    /// Store configuration
    config: Config,

    /// Read/write handles; `None` once closed
    handles: Option<Handles>,

    /// Key → location of the key's latest Set row
    index: KeyIndex,

    /// What the replay at open found
    recovery: RecoveryStats,

    /// Deletes since the index was last compacted
    deletes_since_compaction: usize,
}

impl Store {
    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Create parent directories and the log file if missing
    /// 2. Replay the whole log into a fresh index
    /// 3. Open the read handle and the append handle
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let path = config.path.as_path();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Create the log if needed without ever truncating it
        OpenOptions::new().create(true).append(true).open(path)?;

        let started = Instant::now();
        let (index, recovery) = recovery::replay(path, config.replay_buffer_size)?;

        let reader = LogReader::open(path)?;
        let writer = LogWriter::open(path, recovery.log_size, config.sync_strategy)?;

        tracing::info!(
            path = %path.display(),
            rows = recovery.rows_replayed,
            live_keys = recovery.live_keys,
            log_size = recovery.log_size,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "store opened"
        );

        Ok(Self {
            config,
            handles: Some(Handles { reader, writer }),
            index,
            recovery,
            deletes_since_compaction: 0,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified log file
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::builder().path(path.as_ref()).build();
        Self::open(config)
    }

    /// Set a key-value pair
    ///
    /// Steps:
    /// 1. Encode the row (length limits fail here, before any I/O)
    /// 2. Append it to the log
    /// 3. Point the index at the appended bytes
    /// 4. Sync if the strategy calls for it
    pub fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let handles = self.handles.as_mut().ok_or(KeylogError::Closed)?;
        let row = encode_row(Op::Set, key, value)?;

        let range = handles.writer.append(&row)?;
        self.index.set(key, range);
        tracing::trace!(offset = range.offset, len = range.len, "set");

        // The row is in the log now; a sync failure must not undo the index
        handles.writer.sync_if_due()
    }

    /// Delete a key
    ///
    /// A tombstone row is appended even when the key is not present.
    pub fn delete(&mut self, key: &[u8]) -> Result<()> {
        let handles = self.handles.as_mut().ok_or(KeylogError::Closed)?;
        let row = encode_row(Op::Delete, key, &[])?;

        let range = handles.writer.append(&row)?;
        self.index.delete(key);
        tracing::trace!(offset = range.offset, len = range.len, "delete");

        let synced = handles.writer.sync_if_due();

        if let IndexCompaction::AfterDeletes { count } = self.config.index_compaction {
            self.deletes_since_compaction += 1;
            if self.deletes_since_compaction >= count {
                self.compact_index()?;
            }
        }

        synced
    }

    /// Get the current value of a key
    pub fn get(&mut self, key: &[u8]) -> Result<Vec<u8>> {
        let handles = self.handles.as_mut().ok_or(KeylogError::Closed)?;
        let range = self
            .index
            .get(key)
            .ok_or_else(|| KeylogError::KeyNotFound { key: key.to_vec() })?;

        handles.reader.read_value(range)
    }

    /// Whether a key is live (index lookup only, no I/O)
    pub fn has(&self, key: &[u8]) -> Result<bool> {
        self.ensure_open()?;
        Ok(self.index.get(key).is_some())
    }

    /// Number of live keys, counted by a full index traversal
    pub fn count(&self) -> Result<usize> {
        self.ensure_open()?;
        let mut count = 0;
        self.index.walk(&[], |_, _| {
            count += 1;
            Ok(())
        })?;
        Ok(count)
    }

    /// Visit every live key starting with `prefix`, in ascending byte order
    pub fn walk_prefix<F>(&self, prefix: &[u8], mut callback: F) -> Result<()>
    where
        F: FnMut(&[u8]) -> Result<()>,
    {
        self.ensure_open()?;
        self.index.walk(prefix, |key, _| callback(key))
    }

    /// Visit every live key starting with `prefix` together with its value
    ///
    /// Reads one row per visited key, so the cost follows the number of live
    /// keys under the prefix rather than the log size.
    pub fn walk_prefix_key_value<F>(&mut self, prefix: &[u8], mut callback: F) -> Result<()>
    where
        F: FnMut(&[u8], &[u8]) -> Result<()>,
    {
        let handles = self.handles.as_mut().ok_or(KeylogError::Closed)?;
        let reader = &mut handles.reader;

        self.index.walk(prefix, |key, range| {
            let value = reader.read_value(range)?;
            callback(key, value.as_slice())
        })
    }

    /// Force every appended row to stable storage now
    pub fn sync(&mut self) -> Result<()> {
        let handles = self.handles.as_mut().ok_or(KeylogError::Closed)?;
        handles.writer.sync()
    }

    /// Drop trie nodes that no longer lead to a live key
    ///
    /// Afterwards, prefixes spelled only by deleted keys report
    /// `PrefixNotFound`.
    pub fn compact_index(&mut self) -> Result<()> {
        self.ensure_open()?;

        let before = self.index.node_count();
        self.index = self.index.compacted();
        self.deletes_since_compaction = 0;

        tracing::debug!(
            nodes_before = before,
            nodes_after = self.index.node_count(),
            "index compacted"
        );
        Ok(())
    }

    /// Close the store
    ///
    /// Syncs outstanding appends and releases both file handles. The store
    /// is closed afterwards even if the sync fails.
    pub fn close(&mut self) -> Result<()> {
        let mut handles = self.handles.take().ok_or(KeylogError::Closed)?;
        handles.writer.sync()?;

        tracing::info!(
            path = %self.config.path.display(),
            log_size = handles.writer.offset(),
            "store closed"
        );
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the log file path
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether the store still accepts operations
    pub fn is_open(&self) -> bool {
        self.handles.is_some()
    }

    /// Current size of the log in bytes
    pub fn log_size(&self) -> Result<u64> {
        self.handles
            .as_ref()
            .map(|h| h.writer.offset())
            .ok_or(KeylogError::Closed)
    }

    /// Statistics from the replay performed at open
    pub fn recovery_stats(&self) -> &RecoveryStats {
        &self.recovery
    }

    /// Number of trie nodes allocated, including ones for deleted keys
    pub fn index_node_count(&self) -> usize {
        self.index.node_count()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.handles.is_some() {
            Ok(())
        } else {
            Err(KeylogError::Closed)
        }
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        if let Some(mut handles) = self.handles.take() {
            if let Err(e) = handles.writer.sync() {
                tracing::warn!(path = %self.config.path.display(), error = %e, "sync on drop failed");
            }
        }
    }
}
