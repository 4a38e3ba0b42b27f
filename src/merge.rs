// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Precedence-aware deep merge of two mapping trees, used to combine an
//! override document with its base before traversal.

use crate::*;

use indexmap::IndexMap;

impl MappingNode {
    /// Merges two mappings, `primary` taking precedence.
    ///
    /// Everything taken from `secondary` is deep-copied first, so the
    /// merged tree shares no structure with it; values from `primary` are
    /// inserted by reference. When both sides carry a mapping the merge
    /// recurses; when both carry a sequence the result is secondary's
    /// deep-copied elements followed by primary's. Any other pairing
    /// resolves to primary's value outright. The result carries `primary`'s
    /// position, as does the sequence synthesized by concatenation.
    pub fn deep_merge(primary: &MappingNode, secondary: &MappingNode) -> MappingNode {
        let mut merged: IndexMap<Rc<str>, Node> = IndexMap::new();

        for (key, value) in &secondary.entries {
            merged.insert(key.clone(), value.deep_copy());
        }

        for (key, value) in &primary.entries {
            let merged_value = match (value, secondary.entries.get(key)) {
                (Node::Mapping(ours), Some(Node::Mapping(theirs))) => {
                    Node::from(MappingNode::deep_merge(ours, theirs))
                }
                (Node::Sequence(ours), Some(Node::Sequence(theirs))) => {
                    let mut items = Vec::with_capacity(ours.items.len() + theirs.items.len());
                    for item in &theirs.items {
                        items.push(item.deep_copy());
                    }
                    items.extend(ours.items.iter().cloned());
                    Node::Sequence(Rc::new(SequenceNode {
                        items,
                        position: primary.position,
                    }))
                }
                _ => value.clone(),
            };
            merged.insert(key.clone(), merged_value);
        }

        MappingNode {
            entries: merged,
            position: primary.position,
        }
    }
}
