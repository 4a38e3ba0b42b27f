// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::tests::{aliased, pos, tree};
use crate::*;

use serde_json::json;

fn mapping(value: serde_json::Value, position: SourcePosition) -> MappingNode {
    MappingNode::from_serde_json_value(&value, &position)
}

#[test]
fn primary_wins_on_scalars() {
    let merged = MappingNode::deep_merge(
        &mapping(json!({"a": "1"}), pos(1)),
        &mapping(json!({"a": "2"}), pos(2)),
    );
    assert_eq!(Node::from(merged), tree(json!({"a": "1"}), pos(1)));
}

#[test]
fn mappings_merge_recursively() {
    let merged = MappingNode::deep_merge(
        &mapping(json!({"a": {"x": "1"}}), pos(1)),
        &mapping(json!({"a": {"y": "2"}}), pos(2)),
    );
    assert_eq!(
        Node::from(merged),
        tree(json!({"a": {"x": "1", "y": "2"}}), pos(1))
    );
}

#[test]
fn nested_conflicts_still_resolve_to_primary() {
    let merged = MappingNode::deep_merge(
        &mapping(json!({"a": {"x": "1", "shared": "ours"}}), pos(1)),
        &mapping(json!({"a": {"y": "2", "shared": "theirs"}}), pos(2)),
    );
    assert_eq!(
        Node::from(merged),
        tree(json!({"a": {"x": "1", "y": "2", "shared": "ours"}}), pos(1))
    );
}

#[test]
fn sequences_concatenate_with_secondary_first() {
    let merged = MappingNode::deep_merge(
        &mapping(json!({"a": ["3"]}), pos(1)),
        &mapping(json!({"a": ["1", "2"]}), pos(2)),
    );
    assert_eq!(Node::from(merged), tree(json!({"a": ["1", "2", "3"]}), pos(1)));
}

#[test]
fn disjoint_keys_union() {
    let merged = MappingNode::deep_merge(
        &mapping(json!({"a": "1"}), pos(1)),
        &mapping(json!({"b": "2"}), pos(2)),
    );
    assert_eq!(Node::from(merged), tree(json!({"a": "1", "b": "2"}), pos(1)));
}

#[test]
fn mismatched_shapes_resolve_to_primary_outright() {
    let merged = MappingNode::deep_merge(
        &mapping(json!({"a": "scalar"}), pos(1)),
        &mapping(json!({"a": {"x": "1"}}), pos(2)),
    );
    assert_eq!(Node::from(merged), tree(json!({"a": "scalar"}), pos(1)));

    let merged = MappingNode::deep_merge(
        &mapping(json!({"a": ["1"]}), pos(1)),
        &mapping(json!({"a": "scalar"}), pos(2)),
    );
    assert_eq!(Node::from(merged), tree(json!({"a": ["1"]}), pos(1)));
}

#[test]
fn merging_a_deep_copy_of_itself_changes_nothing() {
    let base = mapping(
        json!({"a": "1", "b": {"c": "2", "d": {"e": "3"}}}),
        pos(1),
    );
    let copy = Node::from(base.clone()).deep_copy();
    let merged = MappingNode::deep_merge(&base, copy.as_mapping().unwrap());
    assert_eq!(merged, base);
}

#[test]
fn the_result_carries_the_primary_position() {
    let merged = MappingNode::deep_merge(
        &mapping(json!({"a": {"x": "1"}}), pos(1)),
        &mapping(json!({"a": {"y": "2"}, "b": "2"}), pos(2)),
    );
    assert_eq!(*merged.position(), pos(1));
    // The recursively merged sub-mapping carries its own primary's position.
    assert_eq!(*merged.get("a").unwrap().position(), pos(1));
}

#[test]
fn a_concatenated_sequence_carries_the_primary_mapping_position() {
    // Give the primary's own sequence a distinct position to show the
    // synthesized one comes from the mapping, not from either sequence.
    let ours = Node::sequence([Node::scalar("3", pos(5))], pos(4));
    let primary = MappingNode::new([("a", ours)], pos(1));
    let secondary = mapping(json!({"a": ["1", "2"]}), pos(2));

    let merged = MappingNode::deep_merge(&primary, &secondary);
    assert_eq!(*merged.get("a").unwrap().position(), pos(1));
}

#[test]
fn secondary_values_are_deep_copied_in() {
    let secondary = mapping(json!({"b": {"k": "v"}}), pos(2));
    let merged = MappingNode::deep_merge(&mapping(json!({"a": "1"}), pos(1)), &secondary);

    let taken = merged.get("b").unwrap();
    assert_eq!(taken, secondary.get("b").unwrap());
    assert!(!aliased(taken, secondary.get("b").unwrap()));
}

#[test]
fn primary_values_are_inserted_by_reference() {
    let primary = mapping(json!({"a": {"k": "v"}}), pos(1));
    let merged = MappingNode::deep_merge(&primary, &mapping(json!({"b": "2"}), pos(2)));

    assert!(aliased(merged.get("a").unwrap(), primary.get("a").unwrap()));
}

#[test]
fn the_inputs_are_left_untouched() {
    let primary = mapping(json!({"a": {"x": "1"}, "s": ["3"]}), pos(1));
    let secondary = mapping(json!({"a": {"y": "2"}, "s": ["1"]}), pos(2));
    let primary_before = Node::from(primary.clone()).deep_copy();
    let secondary_before = Node::from(secondary.clone()).deep_copy();

    let _ = MappingNode::deep_merge(&primary, &secondary);

    assert_eq!(Node::from(primary), primary_before);
    assert_eq!(Node::from(secondary), secondary_before);
}
