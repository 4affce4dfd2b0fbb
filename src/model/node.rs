//! Node entity
//!
//! ## Record Format
//! ```text
//! id|propCount|(key:tag:value|)*|inCount|(edgeId,)*|outCount|(edgeId,)*|
//! ```

use crate::error::{GraphError, Result};

use super::codec::{self, Fields, FIELD_SEP, LIST_SEP};
use super::property::{PropertyMap, PropertyValue};
use super::{EntityId, EntityKind, GraphEntity};

/// Which adjacency list of a node an edge belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Incoming,
    Outgoing,
}

/// A graph vertex with properties and adjacency lists of edge ids
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    id: EntityId,
    properties: PropertyMap,
    incoming: Vec<EntityId>,
    outgoing: Vec<EntityId>,
    dirty: bool,
}

impl Node {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Create a node carrying an initial property map
    pub fn with_properties(id: EntityId, properties: PropertyMap) -> Self {
        Self {
            id,
            properties,
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

    // =========================================================================
    // Properties
    // =========================================================================

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

    // =========================================================================
    // Adjacency
    // =========================================================================

    /// Record an edge id; returns false if it was already listed
    pub fn add_edge(&mut self, edge_id: EntityId, direction: Direction) -> bool {
        let list = self.list_mut(direction);
        if list.contains(&edge_id) {
            return false;
        }
        list.push(edge_id);
        self.dirty = true;
        true
    }

    /// Drop an edge id; returns false if it was not listed
    pub fn remove_edge(&mut self, edge_id: EntityId, direction: Direction) -> bool {
        let list = self.list_mut(direction);
        match list.iter().position(|&id| id == edge_id) {
            Some(pos) => {
                list.remove(pos);
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    pub fn incoming_edges(&self) -> &[EntityId] {
        &self.incoming
    }

    pub fn outgoing_edges(&self) -> &[EntityId] {
        &self.outgoing
    }

    fn list_mut(&mut self, direction: Direction) -> &mut Vec<EntityId> {
        match direction {
            Direction::Incoming => &mut self.incoming,
            Direction::Outgoing => &mut self.outgoing,
        }
    }

    // =========================================================================
    // Dirty Tracking
    // =========================================================================

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // =========================================================================
    // Encoding
    // =========================================================================

    pub fn serialize(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.id.to_string());
        out.push(FIELD_SEP);
        self.properties.encode_into(&mut out);
        out.push(FIELD_SEP);
        encode_id_list(&self.incoming, &mut out);
        encode_id_list(&self.outgoing, &mut out);
        out
    }

    /// Decode a node record; the result is clean
    pub fn deserialize(data: &str) -> Result<Self> {
        let mut fields = Fields::new(data, "node")?;
        let id = fields.parse("node id")?;
        let properties = PropertyMap::decode_from(&mut fields)?;
        fields.separator("property section terminator")?;
        let incoming = decode_id_list(&mut fields, "incoming")?;
        let outgoing = decode_id_list(&mut fields, "outgoing")?;
        fields.finish()?;

        Ok(Self {
            id,
            properties,
            incoming,
            outgoing,
            dirty: false,
        })
    }
}

fn encode_id_list(ids: &[EntityId], out: &mut String) {
    out.push_str(&ids.len().to_string());
    out.push(FIELD_SEP);
    for id in ids {
        out.push_str(&id.to_string());
        out.push(LIST_SEP);
    }
    out.push(FIELD_SEP);
}

fn decode_id_list(fields: &mut Fields<'_>, which: &str) -> Result<Vec<EntityId>> {
    let count: usize = fields.parse(&format!("{} edge count", which))?;
    let list = fields.next(&format!("{} edge list", which))?;

    let mut pieces = codec::split_unescaped(list, LIST_SEP);
    // Every id is followed by a separator, so the last piece is always empty
    if pieces.pop() != Some("") {
        return Err(GraphError::InvalidFormat(format!(
            "{} edge list '{}' is not terminated by '{}'",
            which, list, LIST_SEP
        )));
    }
    if pieces.len() != count {
        return Err(GraphError::InvalidFormat(format!(
            "{} edge list declares {} ids but holds {}",
            which,
            count,
            pieces.len()
        )));
    }

    let mut ids: Vec<EntityId> = Vec::with_capacity(count);
    for piece in pieces {
        let id = codec::parse_field(piece, "edge id")?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

impl GraphEntity for Node {
    const KIND: EntityKind = EntityKind::Node;

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        Node::set_id(self, id);
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
        Node::serialize(self)
    }

    fn deserialize(data: &str) -> Result<Self> {
        Node::deserialize(data)
    }
}
