//! # keylog
//!
//! An embedded, single-file key-value store with:
//! - An append-only log as the only on-disk structure
//! - Replay-based recovery that rebuilds the index on open
//! - An in-memory 256-ary trie giving ordered prefix scans for free
//! - Configurable fsync policy
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              REPL / SharedStore (optional callers)           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                         Store                                │
//! │           (single owner, Open → Closed lifecycle)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │     Log     │          │  KeyIndex   │
//!   │  (Append)   │◄─────────│   (Trie)    │
//!   └──────┬──────┘  ranges  └─────────────┘
//!          │
//!          ▼
//!   ┌─────────────┐
//!   │  Row Codec  │
//!   └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod row;
pub mod index;
pub mod store;
pub mod shared;
pub mod repl;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KeylogError, Result};
pub use config::{Config, IndexCompaction, SyncStrategy};
pub use index::{ByteRange, KeyIndex};
pub use row::{Op, Row};
pub use shared::SharedStore;
pub use store::{RecoveryStats, Store};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of keylog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
