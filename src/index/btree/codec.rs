//! Level-order B-tree codec
//!
//! ## Format
//! ```text
//! t|
//! isLeaf|keyCount|(key:value|)*childCount|      <- root
//! isLeaf|keyCount|(key:value|)*childCount|      <- root's children, left to right
//! ...                                           <- then each following level
//! ```
//! An empty tree encodes to the empty string.

use std::collections::VecDeque;
use std::str::FromStr;

use crate::error::{GraphError, Result};

use super::node::{BTreeNode, Entry};
use super::BTreeIndex;

const SEP: char = '|';
const PAIR_SEP: char = ':';

/// Upper bound on the order accepted from a stream
const MAX_ORDER: usize = 1 << 20;

impl BTreeIndex {
    /// Encode the whole tree breadth-first
    pub fn serialize(&self) -> String {
        let Some(root) = &self.root else {
            return String::new();
        };

        let mut out = self.order.to_string();
        out.push(SEP);

        let mut queue = VecDeque::from([root]);
        while let Some(node) = queue.pop_front() {
            out.push(if node.leaf { '1' } else { '0' });
            out.push(SEP);
            out.push_str(&node.entries.len().to_string());
            out.push(SEP);
            for entry in &node.entries {
                out.push_str(&entry.key.to_string());
                out.push(PAIR_SEP);
                out.push_str(&entry.value.to_string());
                out.push(SEP);
            }
            out.push_str(&node.children.len().to_string());
            out.push(SEP);
            queue.extend(node.children.iter());
        }
        out
    }

    /// Rebuild a tree from [`BTreeIndex::serialize`] output
    ///
    /// Fails with `InvalidFormat` on an empty stream, malformed records, or a
    /// tree that breaks any B-tree invariant.
    pub fn deserialize(data: &str) -> Result<Self> {
        if data.is_empty() {
            return Err(malformed("empty index stream".to_string()));
        }

        let mut tokens = Tokens::new(data)?;
        let order: usize = tokens.parse("order")?;
        if !(2..=MAX_ORDER).contains(&order) {
            return Err(malformed(format!("order {} is outside 2..={}", order, MAX_ORDER)));
        }

        // Records arrive in BFS order, one level at a time: the root, then as
        // many records as the previous level announced children.
        let root = read_record(&mut tokens, order, true)?;
        let mut level_size = root.child_count;
        let mut records = vec![root];
        let mut depth = 0;
        while level_size > 0 {
            depth += 1;
            let mut next_level_size = 0;
            let mut level_leaf = None;
            for _ in 0..level_size {
                let record = read_record(&mut tokens, order, false)?;
                match level_leaf {
                    None => level_leaf = Some(record.node.leaf),
                    Some(leaf) if leaf != record.node.leaf => {
                        return Err(malformed(format!(
                            "leaves and internal nodes mixed at depth {}",
                            depth
                        )))
                    }
                    Some(_) => {}
                }
                next_level_size += record.child_count;
                records.push(record);
            }
            level_size = next_level_size;
        }
        tokens.finish()?;

        let root = assemble(records)?;
        let len = count_entries(&root);
        let tree = Self {
            root: Some(root),
            order,
            len,
        };
        tree.validate()?;
        Ok(tree)
    }
}

fn malformed(message: String) -> GraphError {
    GraphError::InvalidFormat(format!("B-tree stream: {}", message))
}

/// One node as read from the stream, before its children are attached
struct Record {
    node: BTreeNode,
    child_count: usize,
}

/// Read one node record; key counts are checked against the bounds for its position
fn read_record(tokens: &mut Tokens<'_>, order: usize, is_root: bool) -> Result<Record> {
    let leaf = match tokens.next("leaf flag")? {
        "0" => false,
        "1" => true,
        other => return Err(malformed(format!("invalid leaf flag '{}'", other))),
    };

    let key_count: usize = tokens.parse("key count")?;
    let min_keys = if is_root { 1 } else { order - 1 };
    let max_keys = 2 * order - 1;
    if key_count < min_keys || key_count > max_keys {
        return Err(malformed(format!(
            "{} declares {} keys, allowed {}..={}",
            if is_root { "root" } else { "node" },
            key_count,
            min_keys,
            max_keys
        )));
    }

    let mut entries = Vec::new();
    for _ in 0..key_count {
        let pair = tokens.next("key:value pair")?;
        let (key, value) = pair
            .split_once(PAIR_SEP)
            .ok_or_else(|| malformed(format!("invalid key:value pair '{}'", pair)))?;
        entries.push(Entry {
            key: parse(key, "key")?,
            value: parse(value, "value")?,
        });
    }

    let child_count: usize = tokens.parse("child count")?;
    if leaf && child_count != 0 {
        return Err(malformed(format!("leaf declares {} children", child_count)));
    }
    if !leaf && child_count != key_count + 1 {
        return Err(malformed(format!(
            "internal node with {} keys declares {} children",
            key_count, child_count
        )));
    }

    Ok(Record {
        node: BTreeNode {
            leaf,
            entries,
            children: Vec::with_capacity(child_count),
        },
        child_count,
    })
}

/// Link BFS-ordered records into a tree; record `i`'s children are the
/// `child_count` records that follow all children of records before it
fn assemble(records: Vec<Record>) -> Result<BTreeNode> {
    let mut first_child = Vec::with_capacity(records.len());
    let mut next = 1;
    for record in &records {
        first_child.push(next);
        next += record.child_count;
    }
    if next != records.len() {
        return Err(malformed(format!(
            "{} records announced but {} read",
            next,
            records.len()
        )));
    }

    let mut slots: Vec<Option<Record>> = records.into_iter().map(Some).collect();
    build(0, &mut slots, &first_child)
}

fn build(index: usize, slots: &mut [Option<Record>], first_child: &[usize]) -> Result<BTreeNode> {
    let Record { mut node, child_count } = slots
        .get_mut(index)
        .and_then(Option::take)
        .ok_or_else(|| malformed(format!("record {} is missing", index)))?;

    let start = first_child[index];
    for child in start..start + child_count {
        node.children.push(build(child, slots, first_child)?);
    }
    Ok(node)
}

fn count_entries(node: &BTreeNode) -> usize {
    node.entries.len() + node.children.iter().map(count_entries).sum::<usize>()
}

fn parse<T: FromStr>(token: &str, what: &str) -> Result<T> {
    token
        .parse()
        .map_err(|_| malformed(format!("invalid {} '{}'", what, token)))
}

/// `|`-separated token stream; the final separator must end the data
struct Tokens<'a> {
    tokens: std::str::Split<'a, char>,
}

impl<'a> Tokens<'a> {
    fn new(data: &'a str) -> Result<Self> {
        let body = data
            .strip_suffix(SEP)
            .ok_or_else(|| malformed(format!("stream is not terminated by '{}'", SEP)))?;
        Ok(Self {
            tokens: body.split(SEP),
        })
    }

    fn next(&mut self, what: &str) -> Result<&'a str> {
        self.tokens
            .next()
            .ok_or_else(|| malformed(format!("stream ended before {}", what)))
    }

    fn parse<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let token = self.next(what)?;
        parse(token, what)
    }

    fn finish(mut self) -> Result<()> {
        match self.tokens.next() {
            None => Ok(()),
            Some(extra) => Err(malformed(format!("trailing data at '{}'", extra))),
        }
    }
}
