//! Log Writer
//!
//! Handles appending rows to the log file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::config::SyncStrategy;
use crate::error::{KeylogError, Result};
use crate::index::ByteRange;

/// The file operations the writer needs beyond `Write`
pub trait LogFile: Write {
    /// Cut the file back to `len` bytes
    fn truncate_to(&mut self, len: u64) -> io::Result<()>;

    /// Flush written data to stable storage
    fn sync_data(&mut self) -> io::Result<()>;
}

impl LogFile for File {
    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }

    fn sync_data(&mut self) -> io::Result<()> {
        File::sync_data(self)
    }
}

/// Appends encoded rows to the end of the log
pub struct LogWriter<F: LogFile = File> {
    /// Append-only handle on the log file
    file: F,

    /// Offset the next row will be written at
    offset: u64,

    /// When to fsync
    sync_strategy: SyncStrategy,

    /// Appends since the last fsync
    unsynced: usize,

    /// Set when a failed append could not be rolled back
    poisoned: bool,
}

impl LogWriter {
    /// Open the log for appending; `offset` is the replayed end of the log
    pub fn open(path: &Path, offset: u64, sync_strategy: SyncStrategy) -> Result<Self> {
        let file = OpenOptions::new().append(true).open(path)?;
        Ok(Self::with_file(file, offset, sync_strategy))
    }
}

impl<F: LogFile> LogWriter<F> {
    /// Wrap an already positioned append handle whose current length is `offset`
    pub fn with_file(file: F, offset: u64, sync_strategy: SyncStrategy) -> Self {
        Self {
            file,
            offset,
            sync_strategy,
            unsynced: 0,
            poisoned: false,
        }
    }

    /// Append one encoded row and return where it landed
    ///
    /// The write offset only advances once every byte was accepted. A failed
    /// write is cut back off the file so the next row starts at `offset`; if
    /// that cut fails too, the writer refuses all further appends.
    ///
    /// Syncing is left to [`LogWriter::sync_if_due`] so callers can record
    /// the range before a sync error surfaces.
    pub fn append(&mut self, row: &[u8]) -> Result<ByteRange> {
        if self.poisoned {
            return Err(KeylogError::Poisoned {
                offset: self.offset,
            });
        }

        if let Err(source) = self.file.write_all(row) {
            let offset = self.offset;
            match self.file.truncate_to(offset) {
                Ok(()) => {
                    tracing::warn!(offset, error = %source, "append failed, partial row removed");
                }
                Err(e) => {
                    self.poisoned = true;
                    tracing::error!(offset, error = %e, "append failed and rollback failed, writer disabled");
                }
            }
            return Err(KeylogError::Append { offset, source });
        }

        let range = ByteRange::new(self.offset, row.len() as u64);
        self.offset = range.end();
        self.unsynced += 1;

        Ok(range)
    }

    /// Sync if the strategy says this append is due for one
    pub fn sync_if_due(&mut self) -> Result<()> {
        match self.sync_strategy {
            SyncStrategy::EveryWrite => self.sync(),
            SyncStrategy::EveryNWrites { count } if self.unsynced >= count => self.sync(),
            _ => Ok(()),
        }
    }

    /// Force appended rows to stable storage
    pub fn sync(&mut self) -> Result<()> {
        if self.unsynced == 0 {
            return Ok(());
        }
        self.file.sync_data()?;
        tracing::trace!(rows = self.unsynced, offset = self.offset, "log synced");
        self.unsynced = 0;
        Ok(())
    }

    /// Offset the next row will be written at (the current log size)
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Appends not yet fsynced
    pub fn unsynced(&self) -> usize {
        self.unsynced
    }

    /// Whether a failed rollback has disabled appends
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Borrow the underlying file
    pub fn get_ref(&self) -> &F {
        &self.file
    }

    /// Mutably borrow the underlying file
    pub fn get_mut(&mut self) -> &mut F {
        &mut self.file
    }
}
