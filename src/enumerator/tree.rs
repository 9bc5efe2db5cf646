// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::graph::{EdgeLabel, Graph, NodeId};
use std::rc::Rc;

/// A concrete derivation: one chosen incoming edge per parameter node
/// encountered, all incoming edges for every merge node encountered,
/// grounded at the source.
///
/// `node` is an opaque reference into the owning [`crate::graph::Graph`]
/// rather than an owned name, so trees stay cheap to build and compare even
/// though the graph itself may be large — this is why the field is
/// crate-private; callers resolve it back to a name via [`DerivationTree::node_name`].
/// Children share structure via `Rc`: a merge node's cartesian product can
/// reuse the same subtree across many sibling combinations without cloning
/// it.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivationTree {
    pub(crate) node: NodeId,
    pub(crate) children: Vec<(Rc<DerivationTree>, EdgeLabel)>,
}

impl DerivationTree {
    /// True for a tree with no children: either the source node, or (not
    /// expected in a well-formed graph) a parameter with no incoming edge.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The name of the node this (sub)tree is rooted at.
    pub fn node_name<'g>(&self, graph: &'g Graph) -> &'g str {
        graph.node_name(self.node)
    }

    /// The chosen `(child, edge_label)` pairs: length 0 or 1 for a
    /// parameter node, length equal to in-degree for a merge node.
    pub fn children(&self) -> &[(Rc<DerivationTree>, EdgeLabel)] {
        &self.children
    }
}
