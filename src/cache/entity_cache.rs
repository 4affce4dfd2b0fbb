//! Entity cache implementation
//!
//! `LruCache`-backed store keyed by `(kind, id)`, so nodes and edges share a
//! single recency list and a single capacity.

use std::num::NonZeroUsize;

use lru::LruCache;
use tracing::trace;

use crate::error::{GraphError, Result};
use crate::model::{EntityId, EntityKind, Handle};

use super::{CacheKey, CachedEntity, Cacheable};

/// Bounded LRU cache of entity handles
pub struct EntityCache {
    entries: LruCache<CacheKey, CachedEntity>,
}

impl EntityCache {
    /// Create a cache holding at most `capacity` entities of both kinds combined
    pub fn new(capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            GraphError::InvalidArgument("cache capacity must be greater than zero".to_string())
        })?;
        Ok(Self {
            entries: LruCache::new(capacity),
        })
    }

    /// Insert or refresh an entity, evicting the least recently used one if full
    pub fn put(&mut self, id: EntityId, entity: CachedEntity) {
        let key = CacheKey::new(entity.kind(), id);
        if let Some((evicted, _)) = self.entries.push(key, entity) {
            // push also hands back the old value when the key was already cached
            if evicted != key {
                trace!(kind = %evicted.kind, id = evicted.id, "Evicted from cache");
            }
        }
    }

    /// Look up an entity and mark it most recently used
    pub fn get(&mut self, kind: EntityKind, id: EntityId) -> Option<CachedEntity> {
        let hit = self.entries.get(&CacheKey::new(kind, id)).cloned();
        trace!(kind = %kind, id, hit = hit.is_some(), "Cache lookup");
        hit
    }

    /// Typed insert
    pub fn put_entity<E: Cacheable>(&mut self, id: EntityId, handle: Handle<E>) {
        self.put(id, E::into_cached(handle));
    }

    /// Typed lookup
    pub fn get_entity<E: Cacheable>(&mut self, id: EntityId) -> Option<Handle<E>> {
        self.get(E::KIND, id).and_then(E::from_cached)
    }

    /// Drop an entity from the cache, returning it if it was present
    pub fn remove(&mut self, kind: EntityKind, id: EntityId) -> Option<CachedEntity> {
        self.entries.pop(&CacheKey::new(kind, id))
    }

    /// Check residency without touching recency
    pub fn contains(&self, kind: EntityKind, id: EntityId) -> bool {
        self.entries.contains(&CacheKey::new(kind, id))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached entities of both kinds
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }
}
