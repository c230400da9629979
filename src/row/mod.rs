//! Row Module
//!
//! The on-disk record format of the log.
//!
//! ## Responsibilities
//! - Encode one Set/Delete operation into a self-describing row
//! - Decode exactly one row from a byte stream
//! - Tell a clean end of log apart from a partially written row
//!
//! ## File Format
//! The log is a back-to-back sequence of rows. There is no file header,
//! no delimiter and no checksum; each row describes its own length.
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │ Row 1                                                  │
//! │ ┌────────┬───────────┬──────────────┬──────┬─────────┐ │
//! │ │ Op (1) │ KeyLen(1) │ ValueLen (2) │ Key  │  Value  │ │
//! │ └────────┴───────────┴──────────────┴──────┴─────────┘ │
//! ├────────────────────────────────────────────────────────┤
//! │ Row 2 ...                                              │
//! └────────────────────────────────────────────────────────┘
//! ```
//! `ValueLen` is big-endian. Delete rows carry an empty value.

mod entry;
mod codec;

pub use entry::{Op, Row};
pub use codec::{decode_row, encode_row, DecodedRow};

/// Fixed row header size: op (1) + key length (1) + value length (2)
pub const HEADER_SIZE: usize = 4;

/// Largest key a row can hold
pub const MAX_KEY_LEN: usize = u8::MAX as usize;

/// Largest value a row can hold
pub const MAX_VALUE_LEN: usize = u16::MAX as usize;
