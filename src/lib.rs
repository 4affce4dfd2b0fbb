//! # AtlasGraph
//!
//! An embedded, disk-backed property-graph storage engine with:
//! - Append-only record logs for nodes and edges
//! - Persistent B-tree indexes mapping entity ids to log offsets
//! - A bounded LRU cache shared by nodes and edges
//! - Shared entity handles with in-place, write-through updates
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      StorageEngine                           │
//! │          get / add / update / delete / flush                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┼─────────────────────┐
//!          │            │                     │
//!          ▼            ▼                     ▼
//!   ┌─────────────┐ ┌─────────────┐   ┌─────────────┐
//!   │ EntityCache │ │IndexManager │   │  LogFile ×2 │
//!   │    (LRU)    │ │ (B-tree ×2) │   │  (append)   │
//!   └─────────────┘ └──────┬──────┘   └─────────────┘
//!                          │
//!                          ▼
//!                  node_index.db / edge_index.db
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod model;
pub mod index;
pub mod cache;
pub mod storage;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{GraphError, Result};
pub use config::{Config, LogSyncStrategy};
pub use engine::StorageEngine;
pub use model::{
    Direction, Edge, EdgeHandle, EntityId, EntityKind, Node, NodeHandle, PropertyMap,
    PropertyType, PropertyValue,
};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of AtlasGraph
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
