//! Model Module
//!
//! The property-graph entities the storage engine persists.
//!
//! ## Responsibilities
//! - Typed property values with a stable text encoding
//! - Node and edge shapes (identity, properties, adjacency, dirty flag)
//! - Pipe-delimited record encoding written to the logs
//!
//! ## Record Formats
//! ```text
//! Node:  id|propCount|(key:tag:value|)*|inCount|(edgeId,)*|outCount|(edgeId,)*|
//! Edge:  id|sourceId|targetId|type|propCount|(key:tag:value|)*
//! ```
//! Property records are emitted sorted by key.

mod codec;
mod edge;
mod node;
mod property;

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;

pub use edge::Edge;
pub use node::{Direction, Node};
pub use property::{PropertyMap, PropertyType, PropertyValue};

/// Identifier of a node or an edge
pub type EntityId = i64;

/// Shared, mutable handle to an entity; the cache and callers hold the same object
pub type Handle<E> = Arc<RwLock<E>>;

pub type NodeHandle = Handle<Node>;

pub type EdgeHandle = Handle<Edge>;

/// The two kinds of stored entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Node,
    Edge,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Node => f.write_str("node"),
            EntityKind::Edge => f.write_str("edge"),
        }
    }
}

/// Behaviour the storage engine needs from every persisted entity
pub trait GraphEntity: Clone + Sized {
    const KIND: EntityKind;

    fn id(&self) -> EntityId;

    fn set_id(&mut self, id: EntityId);

    fn is_dirty(&self) -> bool;

    fn mark_dirty(&mut self);

    /// Called by the engine once the entity's current state is on disk
    fn mark_clean(&mut self);

    fn serialize(&self) -> String;

    fn deserialize(data: &str) -> Result<Self>;
}
