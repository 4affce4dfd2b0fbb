//! Structural checks and debug display for the B-tree

use std::fmt;

use crate::error::{GraphError, Result};

use super::node::BTreeNode;
use super::BTreeIndex;

impl BTreeIndex {
    /// Verify every B-tree invariant, failing with `InvalidFormat` on the first violation
    pub fn validate(&self) -> Result<()> {
        let Some(root) = &self.root else {
            if self.len != 0 {
                return Err(corrupt(format!("empty tree reports {} entries", self.len)));
            }
            return Ok(());
        };

        if root.entries.is_empty() {
            return Err(corrupt("root node holds no keys".to_string()));
        }

        let mut checker = Checker {
            order: self.order,
            leaf_depth: None,
            entries: 0,
        };
        checker.check(root, 0, None, None, true)?;

        if checker.entries != self.len {
            return Err(corrupt(format!(
                "tree holds {} entries but reports {}",
                checker.entries, self.len
            )));
        }
        Ok(())
    }
}

fn corrupt(message: String) -> GraphError {
    GraphError::InvalidFormat(format!("B-tree invariant violated: {}", message))
}

struct Checker {
    order: usize,
    leaf_depth: Option<usize>,
    entries: usize,
}

impl Checker {
    /// Check `node` and its subtree; keys must lie in the open range `(low, high)`
    fn check(
        &mut self,
        node: &BTreeNode,
        depth: usize,
        low: Option<i64>,
        high: Option<i64>,
        is_root: bool,
    ) -> Result<()> {
        let count = node.entries.len();
        let max_keys = 2 * self.order - 1;
        let min_keys = if is_root { 1 } else { self.order - 1 };

        if count < min_keys || count > max_keys {
            return Err(corrupt(format!(
                "node at depth {} holds {} keys, allowed {}..={}",
                depth, count, min_keys, max_keys
            )));
        }

        for pair in node.entries.windows(2) {
            if pair[0].key >= pair[1].key {
                return Err(corrupt(format!(
                    "keys {} and {} at depth {} are not strictly ascending",
                    pair[0].key, pair[1].key, depth
                )));
            }
        }

        for entry in &node.entries {
            let above_low = low.map_or(true, |low| entry.key > low);
            let below_high = high.map_or(true, |high| entry.key < high);
            if !above_low || !below_high {
                return Err(corrupt(format!(
                    "key {} at depth {} lies outside its parent's range",
                    entry.key, depth
                )));
            }
        }
        self.entries += count;

        if node.leaf {
            if !node.children.is_empty() {
                return Err(corrupt(format!(
                    "leaf at depth {} has {} children",
                    depth,
                    node.children.len()
                )));
            }
            match self.leaf_depth {
                None => self.leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    return Err(corrupt(format!(
                        "leaves found at depths {} and {}",
                        expected, depth
                    )))
                }
                Some(_) => {}
            }
            return Ok(());
        }

        if node.children.len() != count + 1 {
            return Err(corrupt(format!(
                "internal node at depth {} has {} keys but {} children",
                depth,
                count,
                node.children.len()
            )));
        }

        for (i, child) in node.children.iter().enumerate() {
            let child_low = if i == 0 { low } else { Some(node.entries[i - 1].key) };
            let child_high = if i == count { high } else { Some(node.entries[i].key) };
            self.check(child, depth + 1, child_low, child_high, false)?;
        }
        Ok(())
    }
}

/// One line per level, each node's keys in brackets
///
/// ```text
/// L0: [20]
/// L1: [5 10] [30 40]
/// ```
impl fmt::Display for BTreeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = &self.root else {
            return writeln!(f, "(empty, t={})", self.order);
        };

        let mut level = vec![root];
        let mut depth = 0;
        while !level.is_empty() {
            write!(f, "L{}:", depth)?;
            let mut next = Vec::new();
            for node in level {
                let keys: Vec<String> = node.entries.iter().map(|e| e.key.to_string()).collect();
                write!(f, " [{}]", keys.join(" "))?;
                next.extend(node.children.iter());
            }
            writeln!(f)?;
            level = next;
            depth += 1;
        }
        Ok(())
    }
}
