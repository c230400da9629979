//! Log Reader
//!
//! Random-access reads of single rows by byte range.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{KeylogError, Result};
use crate::index::ByteRange;
use crate::row::{decode_row, Row};

/// Reads rows back from the log at known offsets
pub struct LogReader<R: Read + Seek = File> {
    file: BufReader<R>,
}

impl LogReader {
    /// Open the log for reading
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::from_reader(file))
    }
}

impl<R: Read + Seek> LogReader<R> {
    /// Read rows from any seekable source laid out like the log
    pub fn from_reader(inner: R) -> Self {
        Self {
            file: BufReader::new(inner),
        }
    }

    /// Seek to `range` and decode the single row stored there
    ///
    /// I/O failures come back as `Read` carrying the row's offset.
    pub fn read_row(&mut self, range: ByteRange) -> Result<Row> {
        let offset = range.offset;
        let at_offset = |source| KeylogError::Read { offset, source };

        self.file.seek(SeekFrom::Start(offset)).map_err(at_offset)?;

        let decoded = decode_row(&mut self.file, offset).map_err(|e| match e {
            KeylogError::Io(source) => at_offset(source),
            other => other,
        })?;

        match decoded {
            Some(decoded) => Ok(decoded.row),
            // The index points past the end of the log
            None => Err(KeylogError::TruncatedRow {
                offset,
                field: "op",
            }),
        }
    }

    /// Read only the value of the row at `range`
    pub fn read_value(&mut self, range: ByteRange) -> Result<Vec<u8>> {
        self.read_row(range).map(|row| row.value)
    }
}
