//! B-tree node
//!
//! Each node exclusively owns its children; the tree owns the root.
//! Restructuring helpers assume the caller checked the key counts they rely on.

/// One `(key, value)` pair: entity id → log offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub key: i64,
    pub value: u64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct BTreeNode {
    pub(crate) leaf: bool,
    pub(crate) entries: Vec<Entry>,
    pub(crate) children: Vec<BTreeNode>,
}

impl BTreeNode {
    pub(crate) fn leaf() -> Self {
        Self {
            leaf: true,
            ..Self::default()
        }
    }

    pub(crate) fn internal() -> Self {
        Self::default()
    }

    /// Position of `key` in this node, or where it would be inserted
    pub(crate) fn find(&self, key: i64) -> Result<usize, usize> {
        self.entries.binary_search_by_key(&key, |e| e.key)
    }

    pub(crate) fn is_full(&self, order: usize) -> bool {
        self.entries.len() >= 2 * order - 1
    }

    /// Split the full child at `index` around its median
    ///
    /// The median moves up into this node at `index`; the upper half becomes
    /// a new right sibling at `index + 1`.
    pub(crate) fn split_child(&mut self, index: usize, order: usize) {
        let child = &mut self.children[index];

        let mut right = BTreeNode {
            leaf: child.leaf,
            entries: child.entries.split_off(order),
            children: Vec::new(),
        };
        if !child.leaf {
            right.children = child.children.split_off(order);
        }
        let Some(median) = child.entries.pop() else {
            return;
        };

        self.entries.insert(index, median);
        self.children.insert(index + 1, right);
    }

    /// Largest entry of the subtree rooted here
    pub(crate) fn max_entry(&self) -> Option<Entry> {
        let mut node = self;
        while !node.leaf {
            node = node.children.last()?;
        }
        node.entries.last().copied()
    }

    /// Smallest entry of the subtree rooted here
    pub(crate) fn min_entry(&self) -> Option<Entry> {
        let mut node = self;
        while !node.leaf {
            node = node.children.first()?;
        }
        node.entries.first().copied()
    }

    /// Fold child `index + 1` and the separator `entries[index]` into child `index`
    pub(crate) fn merge_children(&mut self, index: usize) {
        let separator = self.entries.remove(index);
        let right = self.children.remove(index + 1);
        let left = &mut self.children[index];

        left.entries.push(separator);
        left.entries.extend(right.entries);
        left.children.extend(right.children);
    }

    /// Move the last entry of child `index - 1` up, and the separator down into child `index`
    pub(crate) fn rotate_right(&mut self, index: usize) {
        let (before, after) = self.children.split_at_mut(index);
        let left = &mut before[index - 1];
        let child = &mut after[0];

        let Some(borrowed) = left.entries.pop() else {
            return;
        };
        let separator = std::mem::replace(&mut self.entries[index - 1], borrowed);
        child.entries.insert(0, separator);
        if !left.leaf {
            if let Some(grandchild) = left.children.pop() {
                child.children.insert(0, grandchild);
            }
        }
    }

    /// Move the first entry of child `index + 1` up, and the separator down into child `index`
    pub(crate) fn rotate_left(&mut self, index: usize) {
        let (before, after) = self.children.split_at_mut(index + 1);
        let child = &mut before[index];
        let right = &mut after[0];

        if right.entries.is_empty() {
            return;
        }
        let borrowed = right.entries.remove(0);
        let separator = std::mem::replace(&mut self.entries[index], borrowed);
        child.entries.push(separator);
        if !right.leaf && !right.children.is_empty() {
            child.children.push(right.children.remove(0));
        }
    }

    /// Make sure child `index` has at least `order` keys before descending into it
    ///
    /// Returns the index of the child that now covers the original range; it
    /// shifts left by one when the child is merged into its left sibling.
    pub(crate) fn fill_child(&mut self, index: usize, order: usize) -> usize {
        if self.children[index].entries.len() >= order {
            return index;
        }

        let has_left = index > 0;
        let has_right = index + 1 < self.children.len();

        if has_left && self.children[index - 1].entries.len() >= order {
            self.rotate_right(index);
            index
        } else if has_right && self.children[index + 1].entries.len() >= order {
            self.rotate_left(index);
            index
        } else if has_right {
            self.merge_children(index);
            index
        } else {
            self.merge_children(index - 1);
            index - 1
        }
    }
}
