//! Tests for Edge
//!
//! These tests verify:
//! - Endpoint and type accessors
//! - Property mutators and dirty tracking
//! - The record format, escaping of the edge type, and rejection of bad records

use atlasgraph::{Edge, GraphError, PropertyValue};
use proptest::prelude::*;

// =============================================================================
// Accessor Tests
// =============================================================================

#[test]
fn test_construction() {
    let edge = Edge::new(1, 10, 20, "KNOWS");
    assert_eq!(edge.id(), 1);
    assert_eq!(edge.source_id(), 10);
    assert_eq!(edge.target_id(), 20);
    assert_eq!(edge.edge_type(), "KNOWS");
    assert!(edge.properties().is_empty());
    assert!(!edge.is_dirty());
}

#[test]
fn test_properties_and_dirty_flag() {
    let mut edge = Edge::new(1, 10, 20, "KNOWS");
    edge.set_property("since", 2019);
    assert!(edge.is_dirty());
    assert_eq!(edge.property("since").unwrap().as_int().unwrap(), 2019);
    assert!(matches!(edge.property("weight"), Err(GraphError::NotFound(_))));

    assert_eq!(edge.remove_property("since"), Some(PropertyValue::Integer(2019)));
    assert!(!edge.has_property("since"));
}

#[test]
fn test_remove_missing_property_keeps_clean() {
    let mut edge = Edge::new(1, 10, 20, "KNOWS");
    assert_eq!(edge.remove_property("nothing"), None);
    assert!(!edge.is_dirty());
}

#[test]
fn test_set_id_marks_dirty() {
    let mut edge = Edge::new(1, 10, 20, "KNOWS");
    edge.set_id(2);
    assert_eq!(edge.id(), 2);
    assert!(edge.is_dirty());
}

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_serialize_format() {
    let mut edge = Edge::new(3, 1, 2, "LIKES");
    edge.set_property("weight", 0.5);
    edge.set_property("note", "hi");

    assert_eq!(edge.serialize(), "3|1|2|LIKES|2|note:3:hi|weight:2:0.5|");
}

#[test]
fn test_serialize_without_properties() {
    assert_eq!(Edge::new(7, 1, 1, "SELF").serialize(), "7|1|1|SELF|0|");
}

#[test]
fn test_round_trip_with_escaped_type() {
    let mut edge = Edge::new(5, 100, 200, "a|b:c,d\\e");
    edge.set_property("k", PropertyValue::Null);
    edge.set_property("flag", false);

    let decoded = Edge::deserialize(&edge.serialize()).unwrap();
    assert_eq!(decoded.id(), 5);
    assert_eq!(decoded.source_id(), 100);
    assert_eq!(decoded.target_id(), 200);
    assert_eq!(decoded.edge_type(), "a|b:c,d\\e");
    assert!(decoded.property("k").unwrap().is_null());
    assert!(!decoded.property("flag").unwrap().as_bool().unwrap());
    assert!(!decoded.is_dirty());
}

#[test]
fn test_deserialize_rejects_malformed() {
    let bad_records = [
        "",
        "3|1|2|LIKES|0",         // missing terminator
        "3|1|2|",                // missing type
        "3|x|2|LIKES|0|",        // bad source
        "3|1|2|LIKES|1|",        // declared property missing
        "3|1|2|LIKES|0|extra|",  // trailing field
        "3|1|2|LIKES|1|k:2:pi|", // bad double
        "3|1|2|bad\\|",          // dangling escape swallows the terminator
    ];

    for bad in bad_records {
        let result = Edge::deserialize(bad);
        assert!(
            matches!(result, Err(GraphError::InvalidFormat(_))),
            "'{}' should be rejected, got {:?}",
            bad,
            result
        );
    }
}

// =============================================================================
// Property-Based Round Trip
// =============================================================================

proptest! {
    #[test]
    fn prop_edge_round_trip(
        id in any::<i64>(),
        source in any::<i64>(),
        target in any::<i64>(),
        edge_type in "[A-Za-z_|:,\\\\]{0,10}",
        ints in prop::collection::hash_map("[a-z|:]{0,6}", any::<i32>(), 0..5),
    ) {
        let mut edge = Edge::new(id, source, target, edge_type.clone());
        for (key, value) in &ints {
            edge.set_property(key.clone(), *value);
        }

        let decoded = Edge::deserialize(&edge.serialize()).unwrap();
        prop_assert_eq!(decoded.id(), id);
        prop_assert_eq!(decoded.source_id(), source);
        prop_assert_eq!(decoded.target_id(), target);
        prop_assert_eq!(decoded.edge_type(), edge_type.as_str());
        prop_assert_eq!(decoded.properties(), edge.properties());
    }
}
