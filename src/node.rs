// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The annotated tree model: a closed union of scalar, mapping and
//! sequence nodes, each carrying the source position it was parsed from.
//!
//! Nodes are logically immutable once constructed. Cloning a node is a
//! shallow, pointer-equal alias; [`Node::deep_copy`] produces a fully
//! independent tree.

use crate::*;

use core::fmt;
use core::hash::{Hash, Hasher};
use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// The three shapes a document node can take.
///
/// Doubles as the traversal type filter: a filter slice restricts yielded
/// values to the listed shapes, and an empty slice admits everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Scalar,
    Mapping,
    Sequence,
}

/// A node of a parsed configuration document.
///
/// Equality is structural over payloads and ignores source positions, so
/// two nodes parsed from different places but spelling the same value
/// compare equal.
#[derive(Debug, Clone)]
pub enum Node {
    Scalar(Rc<ScalarNode>),
    Mapping(Rc<MappingNode>),
    Sequence(Rc<SequenceNode>),
}

/// A primitive text value with its document position.
///
/// Behaves as its text for equality, hashing and display.
#[derive(Debug, Clone)]
pub struct ScalarNode {
    pub(crate) value: Rc<str>,
    pub(crate) position: SourcePosition,
}

/// An insertion-ordered collection of unique keys and child nodes.
#[derive(Debug, Clone)]
pub struct MappingNode {
    pub(crate) entries: IndexMap<Rc<str>, Node>,
    pub(crate) position: SourcePosition,
}

/// An ordered list of child nodes.
#[derive(Debug, Clone)]
pub struct SequenceNode {
    pub(crate) items: Vec<Node>,
    pub(crate) position: SourcePosition,
}

impl ScalarNode {
    pub fn new(value: impl Into<Rc<str>>, position: SourcePosition) -> Self {
        Self {
            value: value.into(),
            position,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn position(&self) -> &SourcePosition {
        &self.position
    }

    /// Total conversion from an untyped JSON value.
    ///
    /// Input that does not fit a scalar falls back to the empty value
    /// rather than failing the surrounding document parse.
    pub fn from_serde_json_value(value: &serde_json::Value, position: &SourcePosition) -> Self {
        let text = match value {
            serde_json::Value::Bool(b) => b.to_string(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null
            | serde_json::Value::Array(_)
            | serde_json::Value::Object(_) => String::new(),
        };
        Self::new(text, *position)
    }
}

impl fmt::Display for ScalarNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl PartialEq for ScalarNode {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for ScalarNode {}

impl Hash for ScalarNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state)
    }
}

impl PartialEq<str> for ScalarNode {
    fn eq(&self, other: &str) -> bool {
        self.value() == other
    }
}

impl PartialEq<&str> for ScalarNode {
    fn eq(&self, other: &&str) -> bool {
        self.value() == *other
    }
}

impl MappingNode {
    /// Builds a mapping from `(key, node)` pairs. Keys are unique and keep
    /// their first-insertion order; a repeated key keeps its original slot
    /// and takes the last value, the way the upstream parser resolves
    /// duplicate document keys.
    pub fn new<K, I>(entries: I, position: SourcePosition) -> Self
    where
        K: Into<Rc<str>>,
        I: IntoIterator<Item = (K, Node)>,
    {
        let mut map = IndexMap::new();
        for (key, value) in entries {
            map.insert(key.into(), value);
        }
        Self {
            entries: map,
            position,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (&**k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| &**k)
    }

    pub fn position(&self) -> &SourcePosition {
        &self.position
    }

    /// A shallow re-wrap of this mapping at a different position. The
    /// entries are shared with `self`; only the position differs. Used when
    /// a substituted default must carry the position of the mapping it was
    /// looked up in.
    pub fn with_position(&self, position: SourcePosition) -> Self {
        Self {
            entries: self.entries.clone(),
            position,
        }
    }

    /// The sole `(key, value)` entry of a single-entry mapping.
    pub(crate) fn sole_entry(&self) -> Option<(&str, &Node)> {
        if self.entries.len() == 1 {
            self.entries.iter().next().map(|(k, v)| (&**k, v))
        } else {
            None
        }
    }

    /// Total conversion from an untyped JSON value. Non-object input falls
    /// back to the empty mapping rather than failing the surrounding parse.
    pub fn from_serde_json_value(value: &serde_json::Value, position: &SourcePosition) -> Self {
        match value {
            serde_json::Value::Object(fields) => Self::new(
                fields
                    .iter()
                    .map(|(k, v)| (k.as_str(), Node::from_serde_json_value(v, position))),
                *position,
            ),
            _ => Self {
                entries: IndexMap::new(),
                position: *position,
            },
        }
    }
}

impl PartialEq for MappingNode {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for MappingNode {}

impl SequenceNode {
    pub fn new<I>(items: I, position: SourcePosition) -> Self
    where
        I: IntoIterator<Item = Node>,
    {
        Self {
            items: items.into_iter().collect(),
            position,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.items.iter()
    }

    pub fn position(&self) -> &SourcePosition {
        &self.position
    }

    /// Total conversion from an untyped JSON value. Non-array input falls
    /// back to the empty sequence rather than failing the surrounding parse.
    pub fn from_serde_json_value(value: &serde_json::Value, position: &SourcePosition) -> Self {
        match value {
            serde_json::Value::Array(items) => Self::new(
                items.iter().map(|v| Node::from_serde_json_value(v, position)),
                *position,
            ),
            _ => Self {
                items: Vec::new(),
                position: *position,
            },
        }
    }
}

impl PartialEq for SequenceNode {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for SequenceNode {}

impl Node {
    pub fn scalar(value: impl Into<Rc<str>>, position: SourcePosition) -> Node {
        Node::Scalar(Rc::new(ScalarNode::new(value, position)))
    }

    pub fn mapping<K, I>(entries: I, position: SourcePosition) -> Node
    where
        K: Into<Rc<str>>,
        I: IntoIterator<Item = (K, Node)>,
    {
        Node::Mapping(Rc::new(MappingNode::new(entries, position)))
    }

    pub fn sequence<I>(items: I, position: SourcePosition) -> Node
    where
        I: IntoIterator<Item = Node>,
    {
        Node::Sequence(Rc::new(SequenceNode::new(items, position)))
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Scalar(_) => NodeKind::Scalar,
            Node::Mapping(_) => NodeKind::Mapping,
            Node::Sequence(_) => NodeKind::Sequence,
        }
    }

    pub fn position(&self) -> &SourcePosition {
        match self {
            Node::Scalar(s) => &s.position,
            Node::Mapping(m) => &m.position,
            Node::Sequence(q) => &q.position,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Node::Mapping(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Node::Sequence(_))
    }

    pub fn as_scalar(&self) -> Result<&ScalarNode> {
        match self {
            Node::Scalar(s) => Ok(s),
            _ => Err(anyhow!("not a scalar")),
        }
    }

    pub fn as_mapping(&self) -> Result<&MappingNode> {
        match self {
            Node::Mapping(m) => Ok(m),
            _ => Err(anyhow!("not a mapping")),
        }
    }

    pub fn as_sequence(&self) -> Result<&SequenceNode> {
        match self {
            Node::Sequence(q) => Ok(q),
            _ => Err(anyhow!("not a sequence")),
        }
    }

    /// Total conversion from an untyped JSON value. Never fails: null
    /// becomes the empty scalar, booleans and numbers their text form.
    pub fn from_serde_json_value(value: &serde_json::Value, position: &SourcePosition) -> Node {
        match value {
            serde_json::Value::Null => Node::scalar("", *position),
            serde_json::Value::Bool(b) => Node::scalar(b.to_string(), *position),
            serde_json::Value::Number(n) => Node::scalar(n.to_string(), *position),
            serde_json::Value::String(s) => Node::scalar(s.as_str(), *position),
            serde_json::Value::Array(items) => Node::sequence(
                items.iter().map(|v| Node::from_serde_json_value(v, position)),
                *position,
            ),
            serde_json::Value::Object(fields) => Node::mapping(
                fields
                    .iter()
                    .map(|(k, v)| (k.as_str(), Node::from_serde_json_value(v, position))),
                *position,
            ),
        }
    }

    pub fn to_json_str(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Duplicates the whole tree. Every descendant is copied exactly once:
    /// the memo table is keyed by payload identity, so substructure aliased
    /// in the input stays aliased (to its duplicate) in the output and the
    /// copy terminates even for DAG-shaped inputs. Positions carry over
    /// verbatim at every level.
    pub fn deep_copy(&self) -> Node {
        let mut memo = BTreeMap::new();
        self.deep_copy_with(&mut memo)
    }

    fn deep_copy_with(&self, memo: &mut BTreeMap<usize, Node>) -> Node {
        let identity = self.payload_addr();
        if let Some(duplicate) = memo.get(&identity) {
            return duplicate.clone();
        }
        let duplicate = match self {
            Node::Scalar(s) => Node::Scalar(Rc::new(ScalarNode {
                value: s.value.clone(),
                position: s.position,
            })),
            Node::Mapping(m) => {
                let entries = m
                    .entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.deep_copy_with(memo)))
                    .collect();
                Node::Mapping(Rc::new(MappingNode {
                    entries,
                    position: m.position,
                }))
            }
            Node::Sequence(q) => {
                let items = q.items.iter().map(|v| v.deep_copy_with(memo)).collect();
                Node::Sequence(Rc::new(SequenceNode {
                    items,
                    position: q.position,
                }))
            }
        };
        memo.insert(identity, duplicate.clone());
        duplicate
    }

    fn payload_addr(&self) -> usize {
        match self {
            Node::Scalar(s) => Rc::as_ptr(s) as usize,
            Node::Mapping(m) => Rc::as_ptr(m) as usize,
            Node::Sequence(q) => Rc::as_ptr(q) as usize,
        }
    }
}

impl From<ScalarNode> for Node {
    fn from(node: ScalarNode) -> Self {
        Node::Scalar(Rc::new(node))
    }
}

impl From<MappingNode> for Node {
    fn from(node: MappingNode) -> Self {
        Node::Mapping(Rc::new(node))
    }
}

impl From<SequenceNode> for Node {
    fn from(node: SequenceNode) -> Self {
        Node::Sequence(Rc::new(node))
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Scalar(a), Node::Scalar(b)) => a.as_ref() == b.as_ref(),
            (Node::Mapping(a), Node::Mapping(b)) => a.as_ref() == b.as_ref(),
            (Node::Sequence(a), Node::Sequence(b)) => a.as_ref() == b.as_ref(),
            _ => false,
        }
    }
}

impl Eq for Node {}

impl PartialEq<&str> for Node {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, Node::Scalar(s) if s.value() == *other)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Scalar(s) => s.as_ref().serialize(serializer),
            Node::Mapping(m) => m.as_ref().serialize(serializer),
            Node::Sequence(q) => q.as_ref().serialize(serializer),
        }
    }
}

impl Serialize for ScalarNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl Serialize for MappingNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(&**k, v)?;
        }
        map.end()
    }
}

impl Serialize for SequenceNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.items.len()))?;
        for v in &self.items {
            seq.serialize_element(v)?;
        }
        seq.end()
    }
}

#[cfg(feature = "yaml")]
impl Node {
    /// Total conversion from an untyped YAML value, mirroring the JSON
    /// bridge. CloudFormation short-form tags expand to their long-form
    /// intrinsic mappings: `!Ref x` becomes `{"Ref": x}` and any other
    /// `!Tag v` becomes `{"Fn::Tag": v}`.
    pub fn from_serde_yaml_value(value: &serde_yaml::Value, position: &SourcePosition) -> Node {
        match value {
            serde_yaml::Value::Null => Node::scalar("", *position),
            serde_yaml::Value::Bool(b) => Node::scalar(b.to_string(), *position),
            serde_yaml::Value::Number(n) => Node::scalar(n.to_string(), *position),
            serde_yaml::Value::String(s) => Node::scalar(s.as_str(), *position),
            serde_yaml::Value::Sequence(items) => Node::sequence(
                items.iter().map(|v| Node::from_serde_yaml_value(v, position)),
                *position,
            ),
            serde_yaml::Value::Mapping(fields) => Node::mapping(
                fields
                    .iter()
                    .map(|(k, v)| (yaml_key_text(k), Node::from_serde_yaml_value(v, position))),
                *position,
            ),
            serde_yaml::Value::Tagged(tagged) => Node::mapping(
                [(
                    intrinsic_name(&tagged.tag),
                    Node::from_serde_yaml_value(&tagged.value, position),
                )],
                *position,
            ),
        }
    }
}

#[cfg(feature = "yaml")]
fn yaml_key_text(key: &serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::String(s) => s.clone(),
        _ => String::new(),
    }
}

/// Long-form name of a short-form intrinsic tag: `!If` is `Fn::If`, while
/// `!Ref` stays `Ref`.
#[cfg(feature = "yaml")]
fn intrinsic_name(tag: &serde_yaml::value::Tag) -> String {
    let tag = tag.to_string();
    let name = tag.trim_start_matches('!');
    if name == crate::REF {
        name.to_string()
    } else {
        format!("Fn::{name}")
    }
}
