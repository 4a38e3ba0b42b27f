// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Names of the document intrinsic functions the tree understands, and the
//! structural heuristic for values resolved through an external lookup
//! table.

use crate::*;

/// Branch-selection intrinsic: `{"Fn::If": [condition, then, else]}`.
pub const FN_IF: &str = "Fn::If";

/// Reference intrinsic.
pub const REF: &str = "Ref";

/// Reference target signalling an explicitly absent property.
pub const NO_VALUE: &str = "AWS::NoValue";

/// Index-selection intrinsic.
pub const FN_SELECT: &str = "Fn::Select";

/// Table-lookup intrinsic, resolved against data outside the document.
pub const FN_FIND_IN_MAP: &str = "Fn::FindInMap";

/// Conditional intrinsics expanded by the traversal engine.
pub const CONDITION_FUNCTIONS: &[&str] = &[FN_IF];

impl MappingNode {
    /// The conditional intrinsic names recognized by
    /// [`Node::items_safe`](crate::Node::items_safe).
    pub fn condition_functions(&self) -> &'static [&'static str] {
        CONDITION_FUNCTIONS
    }

    /// Whether this mapping is the intrinsic composition whose resolved
    /// value comes from indexing into an externally-defined table:
    /// a sole `Fn::Select` entry holding a 2-element sequence whose second
    /// element is a sole `Fn::FindInMap` mapping.
    ///
    /// Such a value cannot be known from the document text alone; checks
    /// consuming it must report unknown instead of asserting a pass or a
    /// fail against it.
    pub fn is_function_returning_object(&self) -> bool {
        let Some((key, value)) = self.sole_entry() else {
            return false;
        };
        if key != FN_SELECT {
            return false;
        }
        let Node::Sequence(args) = value else {
            return false;
        };
        if args.len() != 2 {
            return false;
        }
        let Some(Node::Mapping(lookup)) = args.get(1) else {
            return false;
        };
        matches!(lookup.sole_entry(), Some((k, _)) if k == FN_FIND_IN_MAP)
    }
}
