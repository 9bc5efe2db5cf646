// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Backward derivation-tree enumeration.
//!
//! # Algorithm
//!
//! For a target node `t`, [`Enumerator::enumerate`] walks the graph
//! backward from `t` to the source, building every distinct
//! [`DerivationTree`]:
//!
//! ```text
//! enumerate(v):
//!     if v in memo: return memo[v]
//!     if v is source: return [Tree(v, [])]
//!     if v is Parameter:
//!         out = [ Tree(v, [(T, e.label)]) for (u -e-> v) in incoming(v), T in enumerate(u) ]
//!     else: # Merge
//!         lists = [ [(T, e.label) for T in enumerate(u)] for (u, e) in incoming(v) ]
//!         out = [ Tree(v, tuple) for tuple in cartesian_product(lists) ]
//!     memo[v] = out; return out
//! ```
//!
//! Recursive results are memoized per node (`raw_memo`) and shared via
//! `Rc` so merge-node cartesian products don't repeatedly clone subtrees.
//! Before returning the *top-level* answer for a requested target, the
//! output is deduplicated by [`fingerprint`]: the sorted list of
//! `(parameter, method_id)` pairs committed to by the tree. This dedup step
//! deliberately is not applied inside the recursive memo itself — only the
//! externally observable, per-target answer is collapsed — so intermediate
//! subtree reuse across different targets stays exact.
//!
//! # Complexity
//!
//! With memoization every node is visited once; the combinatorial cost
//! lives in the cartesian products at merge nodes, which is why the
//! fingerprint dedup exists at all (see Scenario D in the test suite).

mod tree;

pub use tree::DerivationTree;

use crate::graph::{EdgeLabel, Graph, NodeId, NodeKind};
use crate::observability::messages::enumerator::{EnumerationCompleted, EnumerationStarted};
use crate::observability::messages::StructuredLog;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Computes and caches derivation trees for a sealed [`Graph`].
///
/// Per the graph's "the enumeration memo may be computed eagerly ... or
/// lazily" open question, this implementation memoizes lazily on first
/// request per target (see `DESIGN.md`): cheaper to construct, identical
/// externally observable results.
pub struct Enumerator<'g> {
    graph: &'g Graph,
    raw_memo: RefCell<HashMap<NodeId, Rc<Vec<Rc<DerivationTree>>>>>,
    answer_memo: RefCell<HashMap<NodeId, Rc<Vec<Rc<DerivationTree>>>>>,
}

impl<'g> Enumerator<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            raw_memo: RefCell::new(HashMap::new()),
            answer_memo: RefCell::new(HashMap::new()),
        }
    }

    /// All distinct derivation trees rooted at `target`, deduplicated by
    /// method fingerprint. Trees are returned in the order they were first
    /// produced by the backward recursion (deterministic for a fixed
    /// graph).
    pub fn enumerate(&self, target: NodeId) -> Rc<Vec<Rc<DerivationTree>>> {
        if let Some(cached) = self.answer_memo.borrow().get(&target) {
            return cached.clone();
        }
        let target_name = self.graph.node_name(target).to_string();
        EnumerationStarted { target: &target_name }.log();

        let raw = self.enumerate_raw(target);
        let mut seen: HashSet<Vec<(String, String)>> = HashSet::new();
        let mut deduped = Vec::with_capacity(raw.len());
        for tree in raw.iter() {
            let fp = fingerprint(tree, self.graph);
            if seen.insert(fp) {
                deduped.push(tree.clone());
            }
        }
        EnumerationCompleted {
            target: &target_name,
            pathway_count: deduped.len(),
        }
        .log();

        let result = Rc::new(deduped);
        self.answer_memo
            .borrow_mut()
            .insert(target, result.clone());
        result
    }

    fn enumerate_raw(&self, node: NodeId) -> Rc<Vec<Rc<DerivationTree>>> {
        if let Some(cached) = self.raw_memo.borrow().get(&node) {
            return cached.clone();
        }

        let out = if Some(node) == self.graph.source_id() {
            vec![Rc::new(DerivationTree {
                node,
                children: Vec::new(),
            })]
        } else {
            match self.graph.node_kind(node) {
                NodeKind::Parameter { .. } => {
                    let mut out = Vec::new();
                    for edge in self.graph.incoming_by_id(node) {
                        let subtrees = self.enumerate_raw(edge.from);
                        for t in subtrees.iter() {
                            out.push(Rc::new(DerivationTree {
                                node,
                                children: vec![(t.clone(), edge.label.clone())],
                            }));
                        }
                    }
                    out
                }
                NodeKind::Merge => {
                    let lists: Vec<Vec<(Rc<DerivationTree>, EdgeLabel)>> = self
                        .graph
                        .incoming_by_id(node)
                        .map(|edge| {
                            self.enumerate_raw(edge.from)
                                .iter()
                                .map(|t| (t.clone(), edge.label.clone()))
                                .collect()
                        })
                        .collect();
                    cartesian_product(&lists)
                        .into_iter()
                        .map(|combo| Rc::new(DerivationTree { node, children: combo }))
                        .collect()
                }
            }
        };

        let out = Rc::new(out);
        self.raw_memo.borrow_mut().insert(node, out.clone());
        out
    }
}

fn cartesian_product<T: Clone>(lists: &[Vec<T>]) -> Vec<Vec<T>> {
    let mut acc: Vec<Vec<T>> = vec![Vec::new()];
    for list in lists {
        let mut next = Vec::with_capacity(acc.len() * list.len().max(1));
        for prefix in &acc {
            for item in list {
                let mut combo = prefix.clone();
                combo.push(item.clone());
                next.push(combo);
            }
        }
        acc = next;
    }
    if lists.is_empty() {
        Vec::new()
    } else {
        acc
    }
}

/// The sorted list of `(parameter_name, method_id)` pairs committed to by
/// `tree`: walk the tree, and at each parameter node record the method
/// identifier of its chosen incoming edge (skipping `DataFlow` edges and
/// merge nodes themselves).
pub fn fingerprint(tree: &DerivationTree, graph: &Graph) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    walk_fingerprint(tree, graph, &mut pairs);
    pairs.sort();
    pairs
}

fn walk_fingerprint(tree: &DerivationTree, graph: &Graph, pairs: &mut Vec<(String, String)>) {
    match graph.node_kind(tree.node) {
        NodeKind::Parameter { .. } => {
            if let Some((child, label)) = tree.children.first() {
                if let EdgeLabel::Method(method_id) = label {
                    pairs.push((graph.node_name(tree.node).to_string(), method_id.clone()));
                }
                walk_fingerprint(child, graph, pairs);
            }
        }
        NodeKind::Merge => {
            for (child, _label) in &tree.children {
                walk_fingerprint(child, graph, pairs);
            }
        }
    }
}
