//! Edge entity
//!
//! ## Record Format
//! ```text
//! id|sourceId|targetId|type|propCount|(key:tag:value|)*
//! ```

use crate::error::Result;

use super::codec::{self, Fields, FIELD_SEP};
use super::property::{PropertyMap, PropertyValue};
use super::{EntityId, EntityKind, GraphEntity};

/// A directed, typed connection between two nodes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Edge {
    id: EntityId,
    source: EntityId,
    target: EntityId,
    edge_type: String,
    properties: PropertyMap,
    dirty: bool,
}

impl Edge {
    pub fn new(
        id: EntityId,
        source: EntityId,
        target: EntityId,
        edge_type: impl Into<String>,
    ) -> Self {
        Self {
            id,
            source,
            target,
            edge_type: edge_type.into(),
            ..Self::default()
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn set_id(&mut self, id: EntityId) {
        self.id = id;
        self.dirty = true;
    }

    pub fn source_id(&self) -> EntityId {
        self.source
    }

    pub fn target_id(&self) -> EntityId {
        self.target
    }

    pub fn edge_type(&self) -> &str {
        &self.edge_type
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// Get a property, failing with `NotFound` if absent
    pub fn property(&self, key: &str) -> Result<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.set(key, value);
        self.dirty = true;
    }

    pub fn remove_property(&mut self, key: &str) -> Option<PropertyValue> {
        let removed = self.properties.remove(key);
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains(key)
    }

    pub fn property_keys(&self) -> Vec<&str> {
        self.properties.keys()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for field in [self.id.to_string(), self.source.to_string(), self.target.to_string()] {
            out.push_str(&field);
            out.push(FIELD_SEP);
        }
        out.push_str(&codec::escape(&self.edge_type));
        out.push(FIELD_SEP);
        self.properties.encode_into(&mut out);
        out
    }

    /// Decode an edge record; the result is clean
    pub fn deserialize(data: &str) -> Result<Self> {
        let mut fields = Fields::new(data, "edge")?;
        let id = fields.parse("edge id")?;
        let source = fields.parse("source node id")?;
        let target = fields.parse("target node id")?;
        let edge_type = codec::unescape(fields.next("edge type")?)?;
        let properties = PropertyMap::decode_from(&mut fields)?;
        fields.finish()?;

        Ok(Self {
            id,
            source,
            target,
            edge_type,
            properties,
            dirty: false,
        })
    }
}

impl GraphEntity for Edge {
    const KIND: EntityKind = EntityKind::Edge;

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        Edge::set_id(self, id);
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn serialize(&self) -> String {
        Edge::serialize(self)
    }

    fn deserialize(data: &str) -> Result<Self> {
        Edge::deserialize(data)
    }
}
