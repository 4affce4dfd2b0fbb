//! Index Manager
//!
//! Owns the node and edge B-trees and the files they are persisted to.
//!
//! ## Responsibilities
//! - Load each tree from its index file on startup (empty file → empty tree)
//! - Route offset lookups/updates to the tree of the right entity kind
//! - Rewrite both index files in full on flush

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{GraphError, Result};
use crate::model::{EntityId, EntityKind};

use super::BTreeIndex;

/// Node and edge positional indexes plus their backing files
pub struct IndexManager {
    node_index: BTreeIndex,
    edge_index: BTreeIndex,
    node_index_path: PathBuf,
    edge_index_path: PathBuf,
}

impl IndexManager {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    pub const NODE_INDEX_FILENAME: &'static str = "node_index.db";
    pub const EDGE_INDEX_FILENAME: &'static str = "edge_index.db";

    /// Open or create both index files in `dir` and load their trees
    ///
    /// `order` is used for trees that start empty; a persisted tree keeps the
    /// order it was written with.
    pub fn open(dir: &Path, order: usize) -> Result<Self> {
        let node_index_path = dir.join(Self::NODE_INDEX_FILENAME);
        let edge_index_path = dir.join(Self::EDGE_INDEX_FILENAME);

        let node_index = Self::load(&node_index_path, order)?;
        let edge_index = Self::load(&edge_index_path, order)?;

        debug!(
            nodes = node_index.len(),
            edges = edge_index.len(),
            "Loaded indexes from {}",
            dir.display()
        );

        Ok(Self {
            node_index,
            edge_index,
            node_index_path,
            edge_index_path,
        })
    }

    /// Record the log offset of an entity (insert or repoint)
    pub fn insert(&mut self, kind: EntityKind, id: EntityId, offset: u64) {
        self.index_mut(kind).insert(id, offset);
    }

    /// Log offset of an entity, `NotFound` if it is not indexed
    pub fn offset(&self, kind: EntityKind, id: EntityId) -> Result<u64> {
        self.index(kind)
            .search(id)
            .map_err(|e| Self::describe_missing(e, kind, id))
    }

    /// Drop an entity from its index, `NotFound` if it is not indexed
    pub fn remove(&mut self, kind: EntityKind, id: EntityId) -> Result<()> {
        self.index_mut(kind)
            .remove(id)
            .map_err(|e| Self::describe_missing(e, kind, id))
    }

    pub fn contains(&self, kind: EntityKind, id: EntityId) -> bool {
        self.index(kind).contains(id)
    }

    /// Number of indexed entities of one kind
    pub fn len(&self, kind: EntityKind) -> usize {
        self.index(kind).len()
    }

    /// Largest indexed id of one kind
    pub fn max_id(&self, kind: EntityKind) -> Option<EntityId> {
        self.index(kind).max_key()
    }

    pub fn index(&self, kind: EntityKind) -> &BTreeIndex {
        match kind {
            EntityKind::Node => &self.node_index,
            EntityKind::Edge => &self.edge_index,
        }
    }

    /// Serialize both trees over their files
    pub fn flush(&self) -> Result<()> {
        Self::save(&self.node_index, &self.node_index_path)?;
        Self::save(&self.edge_index, &self.edge_index_path)?;
        debug!(
            nodes = self.node_index.len(),
            edges = self.edge_index.len(),
            "Flushed indexes"
        );
        Ok(())
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn index_mut(&mut self, kind: EntityKind) -> &mut BTreeIndex {
        match kind {
            EntityKind::Node => &mut self.node_index,
            EntityKind::Edge => &mut self.edge_index,
        }
    }

    fn load(path: &Path, order: usize) -> Result<BTreeIndex> {
        // Create the file up front so a missing directory or permission problem fails here
        OpenOptions::new().create(true).append(true).open(path)?;

        let data = fs::read_to_string(path)?;
        if data.is_empty() {
            return BTreeIndex::new(order);
        }

        let index = BTreeIndex::deserialize(&data)?;
        if index.order() != order {
            warn!(
                persisted = index.order(),
                configured = order,
                "Index {} keeps its persisted order",
                path.display()
            );
        }
        Ok(index)
    }

    fn save(index: &BTreeIndex, path: &Path) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        file.write_all(index.serialize().as_bytes())?;
        file.sync_all()?;
        Ok(())
    }

    fn describe_missing(error: GraphError, kind: EntityKind, id: EntityId) -> GraphError {
        match error {
            GraphError::NotFound(_) => GraphError::NotFound(format!("{} {}", kind, id)),
            other => other,
        }
    }
}
