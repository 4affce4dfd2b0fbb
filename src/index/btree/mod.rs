//! B-tree Index
//!
//! In-memory B-tree of minimum degree `t` mapping entity ids to log offsets.
//!
//! ## Invariants
//! - Every non-root node holds between `t - 1` and `2t - 1` keys
//! - An internal node with `k` keys has exactly `k + 1` children
//! - Keys within a node are strictly ascending, and every key of child `i`
//!   lies strictly between the parent's keys `i - 1` and `i`
//! - All leaves sit at the same depth
//! - Keys are unique: inserting an existing key overwrites its value
//!
//! Insertion splits full nodes on the way down; removal tops up thin
//! children on the way down, so neither ever has to walk back up.

mod codec;
mod node;
mod validate;

pub use node::Entry;

use crate::error::{GraphError, Result};

use node::BTreeNode;

/// Persistent positional index: `i64` key → `u64` byte offset
#[derive(Debug, Clone)]
pub struct BTreeIndex {
    root: Option<BTreeNode>,
    order: usize,
    len: usize,
}

impl BTreeIndex {
    /// Create an empty tree of minimum degree `order`
    pub fn new(order: usize) -> Result<Self> {
        if order < 2 {
            return Err(GraphError::InvalidArgument(format!(
                "B-tree order must be at least 2, got {}",
                order
            )));
        }
        Ok(Self {
            root: None,
            order,
            len: 0,
        })
    }

    /// Minimum degree `t`
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    // =========================================================================
    // Insert
    // =========================================================================

    /// Insert `key`, or overwrite its value if already present
    pub fn insert(&mut self, key: i64, value: u64) {
        let order = self.order;
        let root = match self.root.take() {
            None => {
                let mut leaf = BTreeNode::leaf();
                leaf.entries.push(Entry { key, value });
                self.root = Some(leaf);
                self.len = 1;
                return;
            }
            Some(root) if root.is_full(order) => {
                let mut new_root = BTreeNode::internal();
                new_root.children.push(root);
                new_root.split_child(0, order);
                new_root
            }
            Some(root) => root,
        };

        let root = self.root.insert(root);
        if insert_non_full(root, key, value, order) {
            self.len += 1;
        }

        self.debug_validate();
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Value stored for `key`, failing with `NotFound` if absent
    pub fn search(&self, key: i64) -> Result<u64> {
        let mut node = self.root.as_ref().ok_or_else(|| not_found(key))?;
        loop {
            match node.find(key) {
                Ok(i) => return Ok(node.entries[i].value),
                Err(_) if node.leaf => return Err(not_found(key)),
                Err(i) => node = &node.children[i],
            }
        }
    }

    pub fn contains(&self, key: i64) -> bool {
        self.search(key).is_ok()
    }

    /// Smallest key, if any
    pub fn min_key(&self) -> Option<i64> {
        self.root.as_ref()?.min_entry().map(|e| e.key)
    }

    /// Largest key, if any
    pub fn max_key(&self) -> Option<i64> {
        self.root.as_ref()?.max_entry().map(|e| e.key)
    }

    /// All entries in ascending key order
    pub fn entries(&self) -> Vec<Entry> {
        let mut out = Vec::with_capacity(self.len);
        if let Some(root) = &self.root {
            collect_in_order(root, &mut out);
        }
        out
    }

    // =========================================================================
    // Remove
    // =========================================================================

    /// Remove `key`, failing with `NotFound` if absent
    ///
    /// A failed remove leaves the tree untouched.
    pub fn remove(&mut self, key: i64) -> Result<()> {
        self.search(key)?;

        let order = self.order;
        let Some(root) = self.root.as_mut() else {
            return Err(not_found(key));
        };
        remove_from(root, key, order)?;
        self.len -= 1;

        // Shrink height once the root runs out of keys
        if root.entries.is_empty() {
            self.root = if root.leaf { None } else { root.children.pop() };
        }

        self.debug_validate();
        Ok(())
    }

    fn debug_validate(&self) {
        debug_assert!(
            self.validate().is_ok(),
            "B-tree invariants violated: {:?}",
            self.validate().err()
        );
    }
}

fn not_found(key: i64) -> GraphError {
    GraphError::NotFound(format!("key {} is not in the index", key))
}

/// Insert into a node known not to be full; returns true for a new key
fn insert_non_full(node: &mut BTreeNode, key: i64, value: u64, order: usize) -> bool {
    let mut index = match node.find(key) {
        Ok(i) => {
            node.entries[i].value = value;
            return false;
        }
        Err(i) => i,
    };

    if node.leaf {
        node.entries.insert(index, Entry { key, value });
        return true;
    }

    if node.children[index].is_full(order) {
        node.split_child(index, order);
        let promoted = node.entries[index].key;
        if key == promoted {
            node.entries[index].value = value;
            return false;
        }
        if key > promoted {
            index += 1;
        }
    }

    insert_non_full(&mut node.children[index], key, value, order)
}

fn remove_from(node: &mut BTreeNode, key: i64, order: usize) -> Result<()> {
    match node.find(key) {
        Ok(i) if node.leaf => {
            node.entries.remove(i);
            Ok(())
        }
        Ok(i) => {
            if node.children[i].entries.len() >= order {
                let pred = node.children[i].max_entry().ok_or_else(|| not_found(key))?;
                node.entries[i] = pred;
                remove_from(&mut node.children[i], pred.key, order)
            } else if node.children[i + 1].entries.len() >= order {
                let succ = node.children[i + 1].min_entry().ok_or_else(|| not_found(key))?;
                node.entries[i] = succ;
                remove_from(&mut node.children[i + 1], succ.key, order)
            } else {
                node.merge_children(i);
                remove_from(&mut node.children[i], key, order)
            }
        }
        Err(_) if node.leaf => Err(not_found(key)),
        Err(i) => {
            let i = node.fill_child(i, order);
            remove_from(&mut node.children[i], key, order)
        }
    }
}

fn collect_in_order(node: &BTreeNode, out: &mut Vec<Entry>) {
    if node.leaf {
        out.extend_from_slice(&node.entries);
        return;
    }
    for (i, entry) in node.entries.iter().enumerate() {
        collect_in_order(&node.children[i], out);
        out.push(*entry);
    }
    if let Some(last) = node.children.last() {
        collect_in_order(last, out);
    }
}
