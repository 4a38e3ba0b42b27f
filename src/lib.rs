// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

// Use README.md as crate documentation.
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

mod check;
mod intrinsics;
mod merge;
mod node;
mod source;
mod traversal;

#[cfg(feature = "arc")]
pub use check::CHECK_REGISTRY;
pub use check::{Check, CheckCategory, CheckRegistry, CheckRegistryError, CheckResult};
pub use intrinsics::{CONDITION_FUNCTIONS, FN_FIND_IN_MAP, FN_IF, FN_SELECT, NO_VALUE, REF};
pub use node::{MappingNode, Node, NodeKind, ScalarNode, SequenceNode};
pub use source::{Mark, SourcePosition};
pub use traversal::{format_path, NodePath, PathSegment};

/// Reference-counted pointer used throughout the tree.
///
/// The `arc` feature swaps it to `Arc`, making trees shareable across
/// scanning threads.
#[cfg(not(feature = "arc"))]
pub use std::rc::Rc;
#[cfg(feature = "arc")]
pub use std::sync::Arc as Rc;

#[cfg(test)]
mod tests;
