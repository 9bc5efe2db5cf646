// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// An opaque reference into a [`crate::graph::Graph`]'s node table.
///
/// Kept as an interned index rather than an owned `String` so derivation
/// trees can carry node references cheaply (`Copy`) instead of cloning
/// names at every recursion level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Whether a parameter node lives on each sub-record (`Layer`) or once per
/// whole record (`Slab`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Layer,
    Slab,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Layer => write!(f, "Layer"),
            Level::Slab => write!(f, "Slab"),
        }
    }
}

/// The two node kinds in the graph: OR-logic parameters and AND-logic
/// merges. The distinguished source node is a `Parameter` with `level:
/// None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Parameter { level: Option<Level> },
    Merge,
}

impl NodeKind {
    pub fn is_merge(&self) -> bool {
        matches!(self, NodeKind::Merge)
    }

    pub fn is_source(&self) -> bool {
        matches!(self, NodeKind::Parameter { level: None })
    }

    pub fn level(&self) -> Option<Level> {
        match self {
            NodeKind::Parameter { level } => *level,
            NodeKind::Merge => None,
        }
    }
}

/// A node as returned from the public query API: a name plus its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
}
