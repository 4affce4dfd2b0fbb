//! Tests for the level-order B-tree codec
//!
//! These tests verify:
//! - The exact text layout for small trees
//! - Round-trip of multi-level trees (structure and contents)
//! - Rejection of malformed and structurally invalid streams

use atlasgraph::index::BTreeIndex;
use atlasgraph::GraphError;

// =============================================================================
// Helper Functions
// =============================================================================

fn tree_with_keys(order: usize, keys: &[i64]) -> BTreeIndex {
    let mut tree = BTreeIndex::new(order).unwrap();
    for &key in keys {
        tree.insert(key, key as u64 * 10);
    }
    tree
}

fn assert_rejected(data: &str) {
    let result = BTreeIndex::deserialize(data);
    assert!(
        matches!(result, Err(GraphError::InvalidFormat(_))),
        "'{}' should be rejected, got {:?}",
        data,
        result.map(|t| t.to_string())
    );
}

// =============================================================================
// Format Tests
// =============================================================================

#[test]
fn test_empty_tree_serializes_to_empty_string() {
    let tree = BTreeIndex::new(3).unwrap();
    assert_eq!(tree.serialize(), "");
}

#[test]
fn test_empty_stream_is_rejected() {
    assert_rejected("");
}

#[test]
fn test_single_leaf_format() {
    let tree = tree_with_keys(3, &[2, 1]);
    assert_eq!(tree.serialize(), "3|1|2|1:10|2:20|0|");
}

#[test]
fn test_two_level_format() {
    // t=2: the fourth insert splits the root leaf [1 2 3] around 2
    let tree = tree_with_keys(2, &[1, 2, 3, 4]);
    assert_eq!(
        tree.serialize(),
        "2|0|1|2:20|2|1|1|1:10|0|1|2|3:30|4:40|0|"
    );
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_round_trip_small_tree() {
    let tree = tree_with_keys(3, &[3, 1, 5, 7, 2]);
    let decoded = BTreeIndex::deserialize(&tree.serialize()).unwrap();

    for key in [1, 2, 3, 5, 7] {
        assert_eq!(decoded.search(key).unwrap(), key as u64 * 10);
    }
    for key in [4, 6] {
        assert!(matches!(decoded.search(key), Err(GraphError::NotFound(_))));
    }
    assert_eq!(decoded.order(), 3);
    assert_eq!(decoded.len(), 5);
}

#[test]
fn test_round_trip_preserves_structure() {
    let keys: Vec<i64> = (1..=300).map(|k| (k * 37) % 301).collect();
    let mut tree = tree_with_keys(2, &keys);
    for key in (0..300).step_by(7) {
        let _ = tree.remove(key);
    }

    let encoded = tree.serialize();
    let decoded = BTreeIndex::deserialize(&encoded).unwrap();

    decoded.validate().unwrap();
    assert_eq!(decoded.entries(), tree.entries());
    assert_eq!(decoded.len(), tree.len());
    assert_eq!(decoded.to_string(), tree.to_string());
    assert_eq!(decoded.serialize(), encoded);
}

#[test]
fn test_decoded_tree_accepts_further_mutation() {
    let tree = tree_with_keys(3, &(1..=60).collect::<Vec<_>>());
    let mut decoded = BTreeIndex::deserialize(&tree.serialize()).unwrap();

    decoded.insert(61, 610);
    decoded.remove(30).unwrap();
    decoded.validate().unwrap();
    assert_eq!(decoded.len(), 60);
    assert_eq!(decoded.max_key(), Some(61));
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_rejects_bad_tokens() {
    assert_rejected("3");                         // no terminator
    assert_rejected("3|");                        // order without root
    assert_rejected("x|1|1|1:10|0|");             // bad order
    assert_rejected("1|1|1|1:10|0|");             // order below 2
    assert_rejected("3|2|1|1:10|0|");             // bad leaf flag
    assert_rejected("3|1|1|1-10|0|");             // bad pair
    assert_rejected("3|1|1|1:-10|0|");            // negative offset
    assert_rejected("3|1|1|1:10|0");              // missing final separator
    assert_rejected("3|1|1|1:10|0|junk|");        // trailing data
}

#[test]
fn test_rejects_inconsistent_child_counts() {
    assert_rejected("3|1|1|1:10|2|");             // leaf with children
    assert_rejected("3|0|1|5:50|3|");             // internal: keys + 1 != children
    assert_rejected("2|0|1|2:20|2|1|1|1:10|0|");  // announced child never arrives
}

#[test]
fn test_rejects_invariant_violations() {
    assert_rejected("3|1|2|2:20|1:10|0|");        // keys out of order
    assert_rejected("3|1|2|1:10|1:11|0|");        // duplicate key
    assert_rejected("2|1|4|1:1|2:2|3:3|4:4|0|");  // more than 2t-1 keys
    assert_rejected("3|1|0|0|");                  // empty root
    // Non-root node under t-1 = 2 keys
    assert_rejected("3|0|1|5:50|2|1|1|1:10|0|1|1|9:90|0|");
    // Child key outside the range its separator allows
    assert_rejected("2|0|1|5:50|2|1|1|7:70|0|1|1|9:90|0|");
    // Leaves at different depths
    assert_rejected(
        "2|0|1|10:1|2|1|1|5:1|0|0|1|20:1|2|1|1|15:1|0|1|1|25:1|0|",
    );
}

#[test]
fn test_rejects_zero_key_records() {
    assert_rejected("2|0|0|1|1|1|5:50|0|");       // keyless internal root
    assert_rejected("3|0|1|5:50|2|1|0|0|1|2|6:60|7:70|0|"); // keyless leaf
}

#[test]
fn test_rejects_long_keyless_chain() {
    // Each keyless internal record announces a single child
    let mut data = String::from("2|");
    for _ in 0..200_000 {
        data.push_str("0|0|1|");
    }
    data.push_str("1|0|0|");

    assert_rejected(&data);
}

#[test]
fn test_rejects_deep_unbalanced_stream() {
    // Every level holds a leaf next to an internal node that keeps descending
    let mut data = String::from("2|0|1|1:0|2|");
    for _ in 0..100_000 {
        data.push_str("1|1|1:0|0|0|1|1:0|2|");
    }
    data.push_str("1|1|1:0|0|1|1|1:0|0|");

    assert_rejected(&data);
}
