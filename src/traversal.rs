// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Conditional-aware traversal: enumerate every statically possible value
//! of a property, expanding the branch intrinsic without evaluating it.

use crate::*;

use core::fmt;

/// One step of a document path: a mapping key or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(Rc<str>),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.into())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key.into())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Path from the traversal root down to a yielded value.
pub type NodePath = Vec<PathSegment>;

/// Renders a path the way diagnostics print it: `Properties/Fn::If/1`.
pub fn format_path(path: &[PathSegment]) -> String {
    let segments: Vec<String> = path.iter().map(|s| s.to_string()).collect();
    segments.join("/")
}

fn admits(filter: &[NodeKind], node: &Node) -> bool {
    filter.is_empty() || filter.contains(&node.kind())
}

impl Node {
    /// Enumerates the statically possible values of this node together with
    /// the document path that selects each of them.
    ///
    /// A single-entry mapping holding a well-formed branch intrinsic
    /// expands into both branches at `path + [key, 1]` and
    /// `path + [key, 2]`; a malformed intrinsic yields nothing. The
    /// no-value reference sentinel yields nothing. Any other mapping,
    /// including the ambiguous multi-key case, yields itself unexpanded.
    /// Sequence elements are visited in order, recursing into mapping
    /// elements. A scalar yields itself.
    ///
    /// `filter` restricts the yielded values to the listed shapes; an empty
    /// filter admits everything. The result is a pure function of the
    /// inputs and is bounded by document size and branch depth.
    pub fn items_safe(&self, path: &[PathSegment], filter: &[NodeKind]) -> Vec<(Node, NodePath)> {
        let mut results = Vec::new();
        self.items_safe_into(path, filter, &mut results);
        results
    }

    fn items_safe_into(
        &self,
        path: &[PathSegment],
        filter: &[NodeKind],
        out: &mut Vec<(Node, NodePath)>,
    ) {
        match self {
            Node::Mapping(mapping) => {
                if let Some((key, value)) = mapping.sole_entry() {
                    if CONDITION_FUNCTIONS.contains(&key) {
                        expand_branches(key, value, path, filter, out);
                    } else if key == REF && *value == NO_VALUE {
                        // Explicitly absent under this branch.
                    } else if admits(filter, self) {
                        out.push((self.clone(), path.to_vec()));
                    }
                } else if admits(filter, self) {
                    // Multi-key mappings are ambiguous and never split.
                    out.push((self.clone(), path.to_vec()));
                }
            }
            Node::Sequence(sequence) => {
                for (i, item) in sequence.iter().enumerate() {
                    let mut item_path = path.to_vec();
                    item_path.push(PathSegment::Index(i));
                    if item.is_mapping() {
                        item.items_safe_into(&item_path, filter, out);
                    } else if admits(filter, item) {
                        out.push((item.clone(), item_path));
                    }
                }
            }
            Node::Scalar(_) => {
                if admits(filter, self) {
                    out.push((self.clone(), path.to_vec()));
                }
            }
        }
    }

    /// Looks up `key` in a mapping and enumerates the statically possible
    /// values of the property, delegating to [`Node::items_safe`] when the
    /// resolved value is itself a mapping.
    ///
    /// An absent key substitutes `default`; a mapping-shaped default is
    /// re-wrapped to carry this mapping's own position, while sequence and
    /// scalar defaults pass through untouched. An absent key with no
    /// default yields nothing, as does calling this on a non-mapping node.
    pub fn get_safe(
        &self,
        key: &str,
        default: Option<Node>,
        path: &[PathSegment],
        filter: &[NodeKind],
    ) -> Vec<(Node, NodePath)> {
        let Node::Mapping(mapping) = self else {
            return Vec::new();
        };
        let value = match mapping.get(key) {
            Some(value) => value.clone(),
            None => match default {
                Some(Node::Mapping(m)) => Node::from(m.with_position(*mapping.position())),
                Some(other) => other,
                None => return Vec::new(),
            },
        };

        let mut value_path = path.to_vec();
        value_path.push(PathSegment::from(key));
        if value.is_mapping() {
            value.items_safe(&value_path, filter)
        } else if admits(filter, &value) {
            vec![(value, value_path)]
        } else {
            Vec::new()
        }
    }
}

/// Expands `Fn::If: [condition, then, else]` into its two branches. A
/// mis-shaped intrinsic (non-sequence value, wrong arity) yields nothing
/// for the property; the parse stays total and downstream checks see an
/// empty result instead of an error.
fn expand_branches(
    key: &str,
    value: &Node,
    path: &[PathSegment],
    filter: &[NodeKind],
    out: &mut Vec<(Node, NodePath)>,
) {
    let Node::Sequence(args) = value else {
        return;
    };
    if args.len() != 3 {
        return;
    }
    for (offset, branch) in args.iter().skip(1).enumerate() {
        let mut branch_path = path.to_vec();
        branch_path.push(PathSegment::from(key));
        branch_path.push(PathSegment::Index(offset + 1));
        if branch.is_mapping() {
            branch.items_safe_into(&branch_path, filter, out);
        } else if admits(filter, branch) {
            out.push((branch.clone(), branch_path));
        }
    }
}
