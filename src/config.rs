//! Configuration for AtlasGraph
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{GraphError, Result};

/// Main configuration for a storage engine instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all data files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── nodes.db         (node record log)
    ///     ├── edges.db         (edge record log)
    ///     ├── node_index.db    (node B-tree, level-order text)
    ///     ├── edge_index.db    (edge B-tree, level-order text)
    ///     └── id_counters.db   (next node/edge ids)
    pub data_dir: PathBuf,

    /// Sync strategy: when to fsync the record logs
    pub log_sync: LogSyncStrategy,

    // -------------------------------------------------------------------------
    // Index Configuration
    // -------------------------------------------------------------------------
    /// Minimum degree `t` of both B-tree indexes (must be >= 2)
    pub btree_order: usize,

    // -------------------------------------------------------------------------
    // Cache Configuration
    // -------------------------------------------------------------------------
    /// Max number of entities (nodes and edges combined) held in the cache
    pub cache_capacity: usize,
}

/// Log sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSyncStrategy {
    /// fsync after every appended record (safest, slowest)
    EveryWrite,

    /// fsync only on `flush()` and close
    OnFlush,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./atlasgraph_data"),
            log_sync: LogSyncStrategy::OnFlush,
            btree_order: 32,
            cache_capacity: 1024,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject parameters the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.btree_order < 2 {
            return Err(GraphError::InvalidArgument(format!(
                "B-tree order must be at least 2, got {}",
                self.btree_order
            )));
        }
        if self.cache_capacity == 0 {
            return Err(GraphError::InvalidArgument(
                "cache capacity must be greater than zero".to_string(),
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
    /// Set the data directory (root for all storage)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the log sync strategy
    pub fn log_sync(mut self, strategy: LogSyncStrategy) -> Self {
        self.config.log_sync = strategy;
        self
    }

    /// Set the B-tree minimum degree
    pub fn btree_order(mut self, order: usize) -> Self {
        self.config.btree_order = order;
        self
    }

    /// Set the combined node + edge cache capacity
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
