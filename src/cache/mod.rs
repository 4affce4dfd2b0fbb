//! Cache Module
//!
//! Bounded cache of recently touched nodes and edges.
//!
//! ## Responsibilities
//! - Serve repeated reads without touching the logs
//! - Hold the same shared handle callers receive, so in-place updates are visible
//! - Evict the globally least-recently-used entity when full
//!
//! ## Policy
//! Nodes and edges share one capacity and one recency order: eviction always
//! removes the entry touched longest ago, whichever kind it is. Eviction only
//! drops the cached copy; the log and index are never touched.

mod entity_cache;

pub use entity_cache::EntityCache;

use crate::model::{Edge, EdgeHandle, EntityId, EntityKind, GraphEntity, Handle, Node, NodeHandle};

/// Cache key: the same id may exist once as a node and once as an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: EntityKind,
    pub id: EntityId,
}

impl CacheKey {
    pub fn new(kind: EntityKind, id: EntityId) -> Self {
        Self { kind, id }
    }
}

/// A cached entity handle of either kind
#[derive(Debug, Clone)]
pub enum CachedEntity {
    Node(NodeHandle),
    Edge(EdgeHandle),
}

impl CachedEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            CachedEntity::Node(_) => EntityKind::Node,
            CachedEntity::Edge(_) => EntityKind::Edge,
        }
    }

    pub fn as_node(&self) -> Option<&NodeHandle> {
        match self {
            CachedEntity::Node(handle) => Some(handle),
            CachedEntity::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<&EdgeHandle> {
        match self {
            CachedEntity::Edge(handle) => Some(handle),
            CachedEntity::Node(_) => None,
        }
    }
}

/// Entities that can be stored in the [`EntityCache`]
pub trait Cacheable: GraphEntity {
    fn into_cached(handle: Handle<Self>) -> CachedEntity;

    fn from_cached(entry: CachedEntity) -> Option<Handle<Self>>;
}

impl Cacheable for Node {
    fn into_cached(handle: Handle<Self>) -> CachedEntity {
        CachedEntity::Node(handle)
    }

    fn from_cached(entry: CachedEntity) -> Option<Handle<Self>> {
        match entry {
            CachedEntity::Node(handle) => Some(handle),
            CachedEntity::Edge(_) => None,
        }
    }
}

impl Cacheable for Edge {
    fn into_cached(handle: Handle<Self>) -> CachedEntity {
        CachedEntity::Edge(handle)
    }

    fn from_cached(entry: CachedEntity) -> Option<Handle<Self>> {
        match entry {
            CachedEntity::Edge(handle) => Some(handle),
            CachedEntity::Node(_) => None,
        }
    }
}
