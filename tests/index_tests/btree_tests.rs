//! Tests for BTreeIndex
//!
//! These tests verify:
//! - Insert, upsert, search and remove semantics
//! - Structural invariants after every mutation (split, rotate, merge, root shrink)
//! - Ordered traversal helpers and the level dump

use atlasgraph::index::{BTreeIndex, Entry};
use atlasgraph::GraphError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

// =============================================================================
// Helper Functions
// =============================================================================

fn tree_with_keys(order: usize, keys: &[i64]) -> BTreeIndex {
    let mut tree = BTreeIndex::new(order).unwrap();
    for &key in keys {
        tree.insert(key, key as u64 * 10);
        tree.validate().unwrap();
    }
    tree
}

fn shuffled(range: std::ops::RangeInclusive<i64>, seed: u64) -> Vec<i64> {
    let mut keys: Vec<i64> = range.collect();
    keys.shuffle(&mut StdRng::seed_from_u64(seed));
    keys
}

// =============================================================================
// Construction Tests
// =============================================================================

#[test]
fn test_new_rejects_order_below_two() {
    assert!(matches!(BTreeIndex::new(0), Err(GraphError::InvalidArgument(_))));
    assert!(matches!(BTreeIndex::new(1), Err(GraphError::InvalidArgument(_))));
    assert!(BTreeIndex::new(2).is_ok());
}

#[test]
fn test_new_tree_is_empty() {
    let tree = BTreeIndex::new(3).unwrap();
    assert!(tree.is_empty());
    assert_eq!(tree.len(), 0);
    assert_eq!(tree.order(), 3);
    assert_eq!(tree.min_key(), None);
    assert!(matches!(tree.search(1), Err(GraphError::NotFound(_))));
    tree.validate().unwrap();
}

// =============================================================================
// Insert / Search Tests
// =============================================================================

#[test]
fn test_insert_and_search() {
    let mut tree = BTreeIndex::new(3).unwrap();
    tree.insert(10, 100);
    tree.insert(20, 200);
    tree.insert(5, 50);

    assert_eq!(tree.search(10).unwrap(), 100);
    assert_eq!(tree.search(20).unwrap(), 200);
    assert_eq!(tree.search(5).unwrap(), 50);
    assert!(matches!(tree.search(15), Err(GraphError::NotFound(_))));
    assert_eq!(tree.len(), 3);
}

#[test]
fn test_insert_existing_key_overwrites() {
    let mut tree = tree_with_keys(2, &[1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(tree.len(), 7);

    // 4 sits in an internal node by now; overwrite must not duplicate it
    tree.insert(4, 999);
    tree.insert(7, 777);

    assert_eq!(tree.len(), 7);
    assert_eq!(tree.search(4).unwrap(), 999);
    assert_eq!(tree.search(7).unwrap(), 777);
    tree.validate().unwrap();
}

#[test]
fn test_insert_overwrites_key_promoted_during_split() {
    // With t=2 the root leaf [1 2 3] is full; upserting its median splits it first
    let mut tree = tree_with_keys(2, &[1, 2, 3]);
    tree.insert(2, 222);

    assert_eq!(tree.len(), 3);
    assert_eq!(tree.search(2).unwrap(), 222);
    tree.validate().unwrap();
}

#[test]
fn test_negative_and_extreme_keys() {
    let keys = [i64::MIN, -5, 0, 5, i64::MAX];
    let mut tree = BTreeIndex::new(2).unwrap();
    for (i, &key) in keys.iter().enumerate() {
        tree.insert(key, i as u64);
    }

    for (i, &key) in keys.iter().enumerate() {
        assert_eq!(tree.search(key).unwrap(), i as u64);
    }
    assert_eq!(tree.min_key(), Some(i64::MIN));
    assert_eq!(tree.max_key(), Some(i64::MAX));
}

#[test]
fn test_sequential_inserts_keep_invariants() {
    let keys: Vec<i64> = (1..=200).collect();
    let tree = tree_with_keys(3, &keys);

    assert_eq!(tree.len(), 200);
    for key in 1..=200 {
        assert_eq!(tree.search(key).unwrap(), key as u64 * 10);
    }
}

// =============================================================================
// Remove Tests
// =============================================================================

#[test]
fn test_remove() {
    let mut tree = tree_with_keys(3, &[10, 20, 5]);

    tree.remove(10).unwrap();
    assert!(matches!(tree.search(10), Err(GraphError::NotFound(_))));
    assert_eq!(tree.search(20).unwrap(), 200);
    assert_eq!(tree.search(5).unwrap(), 50);
    assert_eq!(tree.len(), 2);
}

#[test]
fn test_remove_missing_key_leaves_tree_intact() {
    let keys: Vec<i64> = (1..=30).map(|k| k * 2).collect();
    let mut tree = tree_with_keys(2, &keys);
    let before = tree.entries();
    let dump_before = tree.to_string();

    // Odd keys fall between stored keys at every level
    for missing in [1, 31, 61, -4] {
        assert!(matches!(tree.remove(missing), Err(GraphError::NotFound(_))));
    }

    assert_eq!(tree.entries(), before);
    assert_eq!(tree.to_string(), dump_before);
    tree.validate().unwrap();
}

#[test]
fn test_remove_from_empty_tree() {
    let mut tree = BTreeIndex::new(3).unwrap();
    assert!(matches!(tree.remove(1), Err(GraphError::NotFound(_))));
    assert!(tree.is_empty());
}

#[test]
fn test_boundary_order_three() {
    // 2t-1 = 5 keys fill the root; the sixth insert splits it
    let mut tree = tree_with_keys(3, &[1, 2, 3, 4, 5]);
    assert_eq!(tree.to_string(), "L0: [1 2 3 4 5]\n");

    tree.insert(6, 60);
    assert_eq!(tree.to_string(), "L0: [3]\nL1: [1 2] [4 5 6]\n");

    // Removing from the thin left child borrows from, then merges with, its sibling
    tree.remove(1).unwrap();
    tree.validate().unwrap();
    assert_eq!(tree.to_string(), "L0: [4]\nL1: [2 3] [5 6]\n");

    tree.remove(2).unwrap();
    tree.validate().unwrap();
    assert_eq!(tree.to_string(), "L0: [3 4 5 6]\n");

    for key in [3, 4, 5, 6] {
        tree.remove(key).unwrap();
        tree.validate().unwrap();
    }
    assert!(tree.is_empty());
    assert_eq!(tree.len(), 0);
}

#[test]
fn test_remove_internal_keys() {
    let keys: Vec<i64> = (1..=50).collect();
    let mut tree = tree_with_keys(2, &keys);

    // Keys in the root and other internal nodes exercise predecessor/successor replacement
    let internal: Vec<i64> = tree
        .to_string()
        .lines()
        .rev()
        .skip(1)
        .flat_map(|line| {
            line.split(|c| c == '[' || c == ']' || c == ' ')
                .filter_map(|s| s.parse::<i64>().ok())
                .collect::<Vec<_>>()
        })
        .collect();
    assert!(!internal.is_empty());

    for key in &internal {
        tree.remove(*key).unwrap();
        tree.validate().unwrap();
        assert!(!tree.contains(*key));
    }
    assert_eq!(tree.len(), 50 - internal.len());
}

#[test]
fn test_random_insert_remove_keeps_invariants() {
    for order in [2, 3, 5] {
        let mut tree = BTreeIndex::new(order).unwrap();
        for key in shuffled(1..=1000, 7) {
            tree.insert(key, key as u64);
            tree.validate().unwrap();
        }
        assert_eq!(tree.len(), 1000);

        let removal = shuffled(1..=1000, 11);
        for (done, key) in removal.iter().enumerate() {
            tree.remove(*key).unwrap();
            tree.validate().unwrap();
            assert!(!tree.contains(*key));
            assert_eq!(tree.len(), 1000 - done - 1);
        }

        assert!(tree.is_empty());
    }
}

#[test]
fn test_reinsert_after_emptying() {
    let mut tree = tree_with_keys(2, &[1, 2, 3]);
    for key in [1, 2, 3] {
        tree.remove(key).unwrap();
    }
    assert!(tree.is_empty());

    tree.insert(42, 420);
    assert_eq!(tree.search(42).unwrap(), 420);
    assert_eq!(tree.len(), 1);
}

// =============================================================================
// Traversal Tests
// =============================================================================

#[test]
fn test_entries_in_key_order() {
    let tree = tree_with_keys(2, &shuffled(1..=40, 3));

    let entries = tree.entries();
    assert_eq!(entries.len(), 40);
    assert_eq!(entries[0], Entry { key: 1, value: 10 });
    assert!(entries.windows(2).all(|w| w[0].key < w[1].key));
    assert_eq!(tree.min_key(), Some(1));
    assert_eq!(tree.max_key(), Some(40));
}

#[test]
fn test_display_empty() {
    let tree = BTreeIndex::new(4).unwrap();
    assert_eq!(tree.to_string(), "(empty, t=4)\n");
}
