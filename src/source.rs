// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A single coordinate in a source document.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Mark {
    pub line: u32,
    pub col: u32,
}

impl Mark {
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Start and end coordinates of a node in the original document text.
///
/// Positions are propagated, never recomputed: every operation that makes a
/// new node from existing ones carries over the position of its primary
/// source. Diagnostics rely on this to point at exact document locations.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SourcePosition {
    pub start: Mark,
    pub end: Mark,
}

impl SourcePosition {
    pub const fn new(start: Mark, end: Mark) -> Self {
        Self { start, end }
    }

    /// Position for nodes fabricated outside a parsed document, such as
    /// substituted defaults in tests.
    pub const fn synthetic() -> Self {
        Self {
            start: Mark::new(0, 0),
            end: Mark::new(0, 0),
        }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
