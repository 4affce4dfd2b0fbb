//! Engine Module
//!
//! The storage engine that coordinates logs, indexes and cache.
//!
//! ## Responsibilities
//! - Append serialized entities to the node/edge logs
//! - Keep each kind's B-tree pointing at the latest record of every entity
//! - Serve reads from the cache, falling back to index lookup + log read
//! - Persist indexes and id counters on flush and on close

use std::fs;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error, info};

use crate::cache::{Cacheable, EntityCache};
use crate::config::{Config, LogSyncStrategy};
use crate::error::{GraphError, Result};
use crate::index::IndexManager;
use crate::model::{Edge, EdgeHandle, EntityId, EntityKind, Handle, Node, NodeHandle};
use crate::storage::{IdAllocator, LogFile};

/// The main storage engine
///
/// ## Execution Model
///
/// - Every operation takes `&mut self` and runs to completion synchronously
/// - No internal locking and no background threads
/// - Callers sharing one engine across threads wrap it in their own lock
///
/// ## Update Policy: write-through
///
/// `update_*` appends the new version immediately and repoints the index; the
/// previous record stays in the log as unreachable garbage.
pub struct StorageEngine {
    /// Engine configuration
    config: Config,

    /// Append-only node record log
    node_log: LogFile,

    /// Append-only edge record log
    edge_log: LogFile,

    /// Id → offset trees for both kinds
    indexes: IndexManager,

    /// Recently touched entities of both kinds
    cache: EntityCache,

    /// Persisted monotonic id counters
    ids: IdAllocator,

    /// Set once `close` has flushed, so drop does not flush again
    closed: bool,
}

impl StorageEngine {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const NODE_LOG_FILENAME: &'static str = "nodes.db";
    const EDGE_LOG_FILENAME: &'static str = "edges.db";

    /// Open or create an engine with the given config
    ///
    /// On startup:
    /// 1. Validate config and create the data directory
    /// 2. Open/create both record logs
    /// 3. Load both indexes (empty file → empty tree)
    /// 4. Restore id counters
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        // Step 1: Create data directory if it doesn't exist
        fs::create_dir_all(&config.data_dir)?;

        // Step 2: Open logs
        let node_log = LogFile::open(&config.data_dir.join(Self::NODE_LOG_FILENAME))?;
        let edge_log = LogFile::open(&config.data_dir.join(Self::EDGE_LOG_FILENAME))?;

        // Step 3: Load indexes
        let indexes = IndexManager::open(&config.data_dir, config.btree_order)?;

        // Step 4: Counters never fall behind what the indexes already hold
        let node_floor = Self::id_floor(&indexes, EntityKind::Node)?;
        let edge_floor = Self::id_floor(&indexes, EntityKind::Edge)?;
        let ids = IdAllocator::open(&config.data_dir, node_floor, edge_floor)?;

        let cache = EntityCache::new(config.cache_capacity)?;

        info!(
            data_dir = %config.data_dir.display(),
            nodes = indexes.len(EntityKind::Node),
            edges = indexes.len(EntityKind::Edge),
            "Storage engine opened"
        );

        Ok(Self {
            config,
            node_log,
            edge_log,
            indexes,
            cache,
            ids,
            closed: false,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    // =========================================================================
    // Node Operations
    // =========================================================================

    /// Get a node, loading it from disk on a cache miss
    pub fn get_node(&mut self, id: EntityId) -> Result<NodeHandle> {
        self.get::<Node>(id)
    }

    /// Store a new node under a freshly allocated id and return that id
    pub fn add_node(&mut self, node: Node) -> Result<EntityId> {
        self.add(node)
    }

    /// Apply `update` to a node and append the new version
    pub fn update_node<F>(&mut self, id: EntityId, update: F) -> Result<()>
    where
        F: FnOnce(&mut Node),
    {
        self.update(id, update)
    }

    /// Make a node unreachable; its log records stay on disk
    pub fn delete_node(&mut self, id: EntityId) -> Result<()> {
        self.delete(EntityKind::Node, id)
    }

    pub fn contains_node(&self, id: EntityId) -> bool {
        self.indexes.contains(EntityKind::Node, id)
    }

    // =========================================================================
    // Edge Operations
    // =========================================================================

    /// Get an edge, loading it from disk on a cache miss
    pub fn get_edge(&mut self, id: EntityId) -> Result<EdgeHandle> {
        self.get::<Edge>(id)
    }

    /// Store a new edge under a freshly allocated id and return that id
    ///
    /// Endpoint adjacency lists are the caller's responsibility.
    pub fn add_edge(&mut self, edge: Edge) -> Result<EntityId> {
        self.add(edge)
    }

    /// Apply `update` to an edge and append the new version
    pub fn update_edge<F>(&mut self, id: EntityId, update: F) -> Result<()>
    where
        F: FnOnce(&mut Edge),
    {
        self.update(id, update)
    }

    /// Make an edge unreachable; its log records stay on disk
    pub fn delete_edge(&mut self, id: EntityId) -> Result<()> {
        self.delete(EntityKind::Edge, id)
    }

    pub fn contains_edge(&self, id: EntityId) -> bool {
        self.indexes.contains(EntityKind::Edge, id)
    }

    // =========================================================================
    // General Operations
    // =========================================================================

    /// Sync both logs and persist both indexes and the id counters
    pub fn flush(&mut self) -> Result<()> {
        self.node_log.sync()?;
        self.edge_log.sync()?;
        self.indexes.flush()?;
        self.ids.persist()?;
        debug!("Storage engine flushed");
        Ok(())
    }

    /// Close the engine gracefully
    ///
    /// Same as dropping it, but reports a failing final flush to the caller.
    pub fn close(mut self) -> Result<()> {
        self.flush()?;
        self.closed = true;
        info!(data_dir = %self.config.data_dir.display(), "Storage engine closed");
        Ok(())
    }

    /// Drop every cached entity; later reads go to disk
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of cached entities (both kinds)
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Whether an entity currently sits in the cache
    pub fn is_cached(&self, kind: EntityKind, id: EntityId) -> bool {
        self.cache.contains(kind, id)
    }

    /// Number of live (indexed) nodes
    pub fn node_count(&self) -> usize {
        self.indexes.len(EntityKind::Node)
    }

    /// Number of live (indexed) edges
    pub fn edge_count(&self) -> usize {
        self.indexes.len(EntityKind::Edge)
    }

    /// The id the next added entity of `kind` will receive
    pub fn next_id(&self, kind: EntityKind) -> EntityId {
        self.ids.peek(kind)
    }

    /// Get the index manager
    pub fn indexes(&self) -> &IndexManager {
        &self.indexes
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// One past the largest indexed id of `kind`
    fn id_floor(indexes: &IndexManager, kind: EntityKind) -> Result<EntityId> {
        match indexes.max_id(kind) {
            None => Ok(0),
            // Allocation never hands out the maximum id, so an index holding it is corrupt
            Some(id) => id.checked_add(1).ok_or_else(|| {
                GraphError::InvalidFormat(format!("{} index holds out-of-range id {}", kind, id))
            }),
        }
    }

    fn log_mut(&mut self, kind: EntityKind) -> &mut LogFile {
        match kind {
            EntityKind::Node => &mut self.node_log,
            EntityKind::Edge => &mut self.edge_log,
        }
    }

    fn get<E: Cacheable>(&mut self, id: EntityId) -> Result<Handle<E>> {
        if let Some(handle) = self.cache.get_entity::<E>(id) {
            return Ok(handle);
        }

        let entity = self.load::<E>(id)?;
        let handle = Arc::new(RwLock::new(entity));
        self.cache.put_entity(id, Arc::clone(&handle));
        Ok(handle)
    }

    /// Index lookup + log read + decode
    fn load<E: Cacheable>(&mut self, id: EntityId) -> Result<E> {
        let offset = self.indexes.offset(E::KIND, id)?;
        let payload = self.log_mut(E::KIND).read_at(offset)?;
        let text = std::str::from_utf8(&payload).map_err(|e| {
            GraphError::InvalidFormat(format!(
                "{} {} record at offset {} is not UTF-8: {}",
                E::KIND,
                id,
                offset,
                e
            ))
        })?;

        let mut entity = E::deserialize(text)?;
        if entity.id() != id {
            return Err(GraphError::InvalidFormat(format!(
                "index maps {} {} to a record of {} {}",
                E::KIND,
                id,
                E::KIND,
                entity.id()
            )));
        }
        entity.mark_clean();
        Ok(entity)
    }

    fn add<E: Cacheable>(&mut self, mut entity: E) -> Result<EntityId> {
        let id = self.ids.allocate(E::KIND)?;
        entity.set_id(id);
        self.persist(&mut entity)?;

        debug!(kind = %E::KIND, id, "Added entity");
        self.cache.put_entity(id, Arc::new(RwLock::new(entity)));
        Ok(id)
    }

    fn update<E, F>(&mut self, id: EntityId, update: F) -> Result<()>
    where
        E: Cacheable,
        F: FnOnce(&mut E),
    {
        let handle = self.get::<E>(id)?;

        // Mutate a draft so a rejected or failed write leaves the shared entity untouched
        let mut draft = handle.read().clone();
        update(&mut draft);
        draft.mark_dirty();
        if draft.id() != id {
            return Err(GraphError::InvalidArgument(format!(
                "update of {} {} must not change its id to {}",
                E::KIND,
                id,
                draft.id()
            )));
        }

        self.persist(&mut draft)?;
        *handle.write() = draft;
        self.cache.put_entity(id, handle);
        Ok(())
    }

    fn delete(&mut self, kind: EntityKind, id: EntityId) -> Result<()> {
        self.indexes.remove(kind, id)?;
        self.cache.remove(kind, id);
        debug!(kind = %kind, id, "Deleted entity");
        Ok(())
    }

    /// Append the entity's current state and point the index at it
    fn persist<E: Cacheable>(&mut self, entity: &mut E) -> Result<()> {
        let payload = entity.serialize();
        let sync = self.config.log_sync == LogSyncStrategy::EveryWrite;

        let log = self.log_mut(E::KIND);
        let offset = log.append(payload.as_bytes())?;
        if sync {
            log.sync()?;
        }

        self.indexes.insert(E::KIND, entity.id(), offset);
        entity.mark_clean();
        Ok(())
    }
}

impl Drop for StorageEngine {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.flush() {
            error!("Failed to flush storage engine on drop: {}", e);
        }
    }
}
