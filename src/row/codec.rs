//! Row codec
//!
//! Encoding and decoding functions for log rows.

use std::io::{ErrorKind, Read};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{KeylogError, Result};
use super::{Op, Row, HEADER_SIZE, MAX_KEY_LEN, MAX_VALUE_LEN};

/// A row read back from the log together with its encoded size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRow {
    /// Number of bytes the row occupied in the log
    pub len: u64,

    /// The decoded row
    pub row: Row,
}

// =============================================================================
// Encoding
// =============================================================================

/// Encode a row to bytes
///
/// Format: op (1) + key_len (1) + value_len (2, BE) + key + value
///
/// Length limits are checked before anything is allocated, so callers can
/// rely on a failed encode never reaching the disk.
pub fn encode_row(op: Op, key: &[u8], value: &[u8]) -> Result<Bytes> {
    if key.len() > MAX_KEY_LEN {
        return Err(KeylogError::KeyTooLong { len: key.len() });
    }
    if value.len() > MAX_VALUE_LEN {
        return Err(KeylogError::ValueTooLong { len: value.len() });
    }

    let mut buf = BytesMut::with_capacity(HEADER_SIZE + key.len() + value.len());
    buf.put_u8(op.as_byte());
    buf.put_u8(key.len() as u8);
    buf.put_u16(value.len() as u16);
    buf.put_slice(key);
    buf.put_slice(value);

    Ok(buf.freeze())
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode exactly one row from a stream
///
/// `offset` is the absolute log position the stream is at; it only feeds
/// error context.
///
/// Returns:
/// - `Ok(None)` — no bytes left before the op byte (clean end of log)
/// - `Ok(Some(row))` — one complete row
/// - `Err(TruncatedRow)` — the stream ended somewhere after the op byte
/// - `Err(UnknownOp)` — the op byte is not a known tag
pub fn decode_row<R: Read>(reader: &mut R, offset: u64) -> Result<Option<DecodedRow>> {
    // Op byte: zero bytes here is the only clean stop
    let mut op_byte = [0u8; 1];
    loop {
        match reader.read(&mut op_byte) {
            Ok(0) => return Ok(None),
            Ok(_) => break,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    let op = Op::from_byte(op_byte[0]).ok_or(KeylogError::UnknownOp {
        offset,
        op: op_byte[0],
    })?;

    // Remaining header: key length + value length
    let mut key_len = [0u8; 1];
    read_field(reader, &mut key_len, offset, "key-length")?;

    let mut value_len = [0u8; 2];
    read_field(reader, &mut value_len, offset, "value-length")?;

    let key_len = key_len[0] as usize;
    let value_len = (&value_len[..]).get_u16() as usize;

    let mut key = vec![0u8; key_len];
    read_field(reader, &mut key, offset, "key")?;

    let mut value = vec![0u8; value_len];
    read_field(reader, &mut value, offset, "value")?;

    Ok(Some(DecodedRow {
        len: (HEADER_SIZE + key_len + value_len) as u64,
        row: Row { op, key, value },
    }))
}

/// Fill `buf` completely, reporting a short read as a truncated row
fn read_field<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    offset: u64,
    field: &'static str,
) -> Result<()> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
            Err(KeylogError::TruncatedRow { offset, field })
        }
        Err(e) => Err(e.into()),
    }
}
