//! Configuration for keylog
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{KeylogError, Result};

/// Main configuration for a keylog store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the single log file. Created (with parent directories) on open.
    pub path: PathBuf,

    /// Read buffer capacity used while replaying the log at open (in bytes)
    pub replay_buffer_size: usize,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// Sync strategy: how often appended rows are fsynced
    pub sync_strategy: SyncStrategy,

    // -------------------------------------------------------------------------
    // Index Configuration
    // -------------------------------------------------------------------------
    /// Whether dead trie nodes are ever reclaimed
    pub index_compaction: IndexCompaction,
}

/// Log sync strategy
///
/// Every strategy hands the row to the OS immediately; they differ only in
/// when `sync_data` is called. All of them sync on close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// fsync after every append (safest, slowest)
    EveryWrite,

    /// fsync after N appends (balanced durability/performance)
    EveryNWrites { count: usize },

    /// Leave write-back to the OS until close or an explicit sync
    Never,
}

/// Index node reclamation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexCompaction {
    /// Never drop trie nodes; deletes only clear the node's ref
    Disabled,

    /// Rebuild the trie from live keys after every N deletes
    AfterDeletes { count: usize },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./keylog.db"),
            replay_buffer_size: 64 * 1024, // 64 KB
            sync_strategy: SyncStrategy::EveryWrite,
            index_compaction: IndexCompaction::Disabled,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject values that would make the store misbehave
    pub fn validate(&self) -> Result<()> {
        if self.replay_buffer_size == 0 {
            return Err(KeylogError::Config(
                "replay_buffer_size must be greater than zero".to_string(),
            ));
        }
        if let SyncStrategy::EveryNWrites { count: 0 } = self.sync_strategy {
            return Err(KeylogError::Config(
                "EveryNWrites count must be greater than zero".to_string(),
            ));
        }
        if let IndexCompaction::AfterDeletes { count: 0 } = self.index_compaction {
            return Err(KeylogError::Config(
                "AfterDeletes count must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the log file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the replay read buffer size (in bytes)
    pub fn replay_buffer_size(mut self, size: usize) -> Self {
        self.config.replay_buffer_size = size;
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the index compaction policy
    pub fn index_compaction(mut self, policy: IndexCompaction) -> Self {
        self.config.index_compaction = policy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
