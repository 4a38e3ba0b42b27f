// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

mod merge;

use crate::*;

/// A distinct position per call site so propagation is observable.
pub(crate) fn pos(line: u32) -> SourcePosition {
    SourcePosition::new(Mark::new(line, 1), Mark::new(line, 80))
}

/// Builds a tree from a JSON literal, every node stamped with `position`.
pub(crate) fn tree(value: serde_json::Value, position: SourcePosition) -> Node {
    Node::from_serde_json_value(&value, &position)
}

/// Whether two nodes share their payload allocation.
pub(crate) fn aliased(a: &Node, b: &Node) -> bool {
    match (a, b) {
        (Node::Scalar(x), Node::Scalar(y)) => Rc::ptr_eq(x, y),
        (Node::Mapping(x), Node::Mapping(y)) => Rc::ptr_eq(x, y),
        (Node::Sequence(x), Node::Sequence(y)) => Rc::ptr_eq(x, y),
        _ => false,
    }
}
