//! Id Allocator
//!
//! Monotonic node and edge id counters that survive restarts.
//!
//! ## File Format
//! ```text
//! nextNodeId|nextEdgeId|
//! ```

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{GraphError, Result};
use crate::model::{EntityId, EntityKind};

/// First id handed out for each kind
pub const FIRST_ID: EntityId = 1;

/// Hands out fresh ids; an id is never handed out twice, even after deletion
pub struct IdAllocator {
    path: PathBuf,
    next_node_id: EntityId,
    next_edge_id: EntityId,
}

impl IdAllocator {
    pub const FILENAME: &'static str = "id_counters.db";

    /// Load the counters from `dir`, never below the given floors
    ///
    /// The floors come from the largest indexed ids, which covers entities
    /// added after the counter file was last written.
    pub fn open(dir: &Path, node_floor: EntityId, edge_floor: EntityId) -> Result<Self> {
        let path = dir.join(Self::FILENAME);
        OpenOptions::new().create(true).append(true).open(&path)?;

        let data = fs::read_to_string(&path)?;
        let (stored_node, stored_edge) = if data.is_empty() {
            (FIRST_ID, FIRST_ID)
        } else {
            Self::decode(&data)?
        };

        let allocator = Self {
            path,
            next_node_id: stored_node.max(node_floor).max(FIRST_ID),
            next_edge_id: stored_edge.max(edge_floor).max(FIRST_ID),
        };
        debug!(
            next_node_id = allocator.next_node_id,
            next_edge_id = allocator.next_edge_id,
            "Loaded id counters"
        );
        Ok(allocator)
    }

    /// Take the next id of one kind
    ///
    /// Fails with `InvalidArgument` once the id space of that kind is used up;
    /// `EntityId::MAX` itself is never handed out.
    pub fn allocate(&mut self, kind: EntityKind) -> Result<EntityId> {
        let counter = match kind {
            EntityKind::Node => &mut self.next_node_id,
            EntityKind::Edge => &mut self.next_edge_id,
        };
        let id = *counter;
        *counter = id.checked_add(1).ok_or_else(|| {
            GraphError::InvalidArgument(format!("{} ids are exhausted at {}", kind, id))
        })?;
        Ok(id)
    }

    /// The id the next `allocate` call would return
    pub fn peek(&self, kind: EntityKind) -> EntityId {
        match kind {
            EntityKind::Node => self.next_node_id,
            EntityKind::Edge => self.next_edge_id,
        }
    }

    /// Write both counters over the counter file
    pub fn persist(&self) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        write!(file, "{}|{}|", self.next_node_id, self.next_edge_id)?;
        file.sync_all()?;
        Ok(())
    }

    fn decode(data: &str) -> Result<(EntityId, EntityId)> {
        let malformed = || GraphError::InvalidFormat(format!("invalid id counter file '{}'", data));

        let body = data.strip_suffix('|').ok_or_else(malformed)?;
        let (node, edge) = body.split_once('|').ok_or_else(malformed)?;
        let node = node.parse().map_err(|_| malformed())?;
        let edge = edge.parse().map_err(|_| malformed())?;
        Ok((node, edge))
    }
}
