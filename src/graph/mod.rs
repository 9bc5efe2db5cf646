// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The parameterization DAG.
//!
//! # Architecture
//!
//! A [`Graph`] is a set of [`Node`]s (`Parameter` or `Merge`) connected by
//! directed [`Edge`]s (`DataFlow` or `Method(id)`). It starts out as a
//! mutable builder; [`Graph::seal`] validates every structural invariant
//! from the top of this module's doc comment, computes the
//! `parameters_by_level` index, and freezes the graph. Mutating a sealed
//! graph returns [`GraphError::SealedGraph`] instead of panicking.
//!
//! # Invariants checked at seal time
//!
//! - Acyclic.
//! - Exactly one source node: a `Parameter` with `level: None`.
//! - Every node is backward-reachable from some leveled `Parameter` node.
//! - `Merge` nodes have in-degree ≥ 2, all incoming edges `DataFlow`.
//! - Non-source `Parameter` nodes have in-degree ≥ 1.
//! - A parameter's incoming method identifiers are pairwise distinct.
//!
//! # Algorithm
//!
//! Cycle detection and the backward-reachability sweep both run in
//! `O(V + E)`: a DFS with an explicit recursion stack finds and reports a
//! concrete cycle path when one exists (mirroring the two-pass
//! Kahn's-algorithm / DFS-with-recursion-stack split used elsewhere in this
//! codebase's dependency-graph validation), and a second backward BFS from
//! every leveled parameter node establishes full coverage.

mod edge;
mod node;

pub use crate::errors::GraphError;
pub use edge::{Edge, EdgeLabel};
pub use node::{Level, Node, NodeKind};
pub(crate) use node::NodeId;

use crate::observability::messages::graph::{GraphSealFailed, GraphSealed};
use crate::observability::messages::StructuredLog;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

struct NodeRecord {
    name: String,
    kind: NodeKind,
    cacheable: bool,
}

#[derive(Clone)]
pub(crate) struct EdgeRecord {
    pub(crate) from: NodeId,
    pub(crate) to: NodeId,
    pub(crate) label: EdgeLabel,
}

/// The parameterization DAG. See the module doc for the invariants it
/// enforces at [`Graph::seal`].
pub struct Graph {
    nodes: Vec<NodeRecord>,
    name_to_id: HashMap<String, NodeId>,
    edges: Vec<EdgeRecord>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
    sealed: bool,
    source: Option<NodeId>,
    parameters_by_level: HashMap<Level, BTreeSet<String>>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            name_to_id: HashMap::new(),
            edges: Vec::new(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
            sealed: false,
            source: None,
            parameters_by_level: HashMap::new(),
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    fn fresh_node(&mut self, name: String, kind: NodeKind) -> Result<NodeId, GraphError> {
        if self.sealed {
            return Err(GraphError::SealedGraph);
        }
        if self.name_to_id.contains_key(&name) {
            return Err(GraphError::DuplicateName { name });
        }
        let id = NodeId(self.nodes.len() as u32);
        self.name_to_id.insert(name.clone(), id);
        self.nodes.push(NodeRecord {
            name,
            kind,
            cacheable: false,
        });
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        Ok(id)
    }

    /// Add a parameter (OR-logic) node. A `level` of `None` marks it as a
    /// candidate source node; exactly one such node must exist at
    /// [`Graph::seal`] time.
    pub fn add_parameter_node(
        &mut self,
        name: impl Into<String>,
        level: Option<Level>,
    ) -> Result<NodeId, GraphError> {
        self.fresh_node(name.into(), NodeKind::Parameter { level })
    }

    /// Add a merge (AND-logic) node.
    pub fn add_merge_node(&mut self, name: impl Into<String>) -> Result<NodeId, GraphError> {
        self.fresh_node(name.into(), NodeKind::Merge)
    }

    fn resolve(&self, name: &str) -> Result<NodeId, GraphError> {
        self.name_to_id
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::MissingNode {
                name: name.to_string(),
            })
    }

    /// Add a directed edge. Validates the kind/label combination described
    /// in the module doc; both endpoints must already exist.
    pub fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        label: EdgeLabel,
    ) -> Result<(), GraphError> {
        if self.sealed {
            return Err(GraphError::SealedGraph);
        }
        let from = self.resolve(source)?;
        let to = self.resolve(target)?;
        let from_kind = &self.nodes[from.index()].kind;
        let to_kind = &self.nodes[to.index()].kind;

        let invalid = |reason: &str| GraphError::InvalidEdge {
            source: source.to_string(),
            target: target.to_string(),
            reason: reason.to_string(),
        };

        match (from_kind, to_kind, &label) {
            (_, NodeKind::Merge, EdgeLabel::Method(_)) => {
                return Err(invalid("edges into a merge node must be DataFlow"))
            }
            (_, NodeKind::Merge, EdgeLabel::DataFlow) => {}
            (NodeKind::Merge, NodeKind::Parameter { .. }, EdgeLabel::DataFlow) => {
                return Err(invalid(
                    "edges out of a merge node must carry a method identifier",
                ))
            }
            (NodeKind::Merge, NodeKind::Parameter { .. }, EdgeLabel::Method(_)) => {}
            (NodeKind::Merge, NodeKind::Merge, _) => {
                return Err(invalid("a merge node cannot feed another merge node directly"))
            }
            (NodeKind::Parameter { .. }, NodeKind::Parameter { .. }, _) => {}
        }

        let edge_idx = self.edges.len();
        self.edges.push(EdgeRecord { from, to, label });
        self.outgoing[from.index()].push(edge_idx);
        self.incoming[to.index()].push(edge_idx);
        Ok(())
    }

    /// Opt a parameter node into cache participation. See
    /// [`crate::cache::Cache`] for why this defaults to `false`.
    pub fn mark_cacheable(&mut self, parameter_name: &str) -> Result<(), GraphError> {
        if self.sealed {
            return Err(GraphError::SealedGraph);
        }
        let id = self.resolve(parameter_name)?;
        match self.nodes[id.index()].kind {
            NodeKind::Parameter { .. } => {
                self.nodes[id.index()].cacheable = true;
                Ok(())
            }
            NodeKind::Merge => Err(GraphError::Invalid {
                reason: format!("'{parameter_name}' is a merge node and cannot be cacheable"),
            }),
        }
    }

    pub fn is_cacheable(&self, id: NodeId) -> bool {
        self.nodes[id.index()].cacheable
    }

    /// Look up a node by name. Fails with [`GraphError::UnknownNode`] (not
    /// [`GraphError::MissingNode`], which is reserved for an edge endpoint
    /// that doesn't exist at construction time) per `spec.md` §4.1.
    pub fn get_node(&self, name: &str) -> Result<Node, GraphError> {
        let id = self
            .name_to_id
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::UnknownNode {
                name: name.to_string(),
            })?;
        let record = &self.nodes[id.index()];
        Ok(Node {
            name: record.name.clone(),
            kind: record.kind.clone(),
        })
    }

    pub(crate) fn node_id(&self, name: &str) -> Result<NodeId, GraphError> {
        self.resolve(name)
    }

    pub(crate) fn node_name(&self, id: NodeId) -> &str {
        &self.nodes[id.index()].name
    }

    pub(crate) fn node_kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub(crate) fn source_id(&self) -> Option<NodeId> {
        self.source
    }

    fn edges_of(&self, indices: &[usize]) -> Vec<Edge> {
        indices
            .iter()
            .map(|&i| {
                let e = &self.edges[i];
                Edge {
                    source: self.nodes[e.from.index()].name.clone(),
                    target: self.nodes[e.to.index()].name.clone(),
                    label: e.label.clone(),
                }
            })
            .collect()
    }

    pub fn incoming(&self, name: &str) -> Result<Vec<Edge>, GraphError> {
        let id = self.resolve(name)?;
        Ok(self.edges_of(&self.incoming[id.index()]))
    }

    pub fn outgoing(&self, name: &str) -> Result<Vec<Edge>, GraphError> {
        let id = self.resolve(name)?;
        Ok(self.edges_of(&self.outgoing[id.index()]))
    }

    pub(crate) fn incoming_by_id(&self, id: NodeId) -> impl Iterator<Item = &EdgeRecord> + '_ {
        self.incoming[id.index()].iter().map(move |&i| &self.edges[i])
    }

    /// The set of parameter node names at a given level, computed once at
    /// seal time. Errs with [`GraphError::Invalid`] if the graph isn't
    /// sealed yet.
    pub fn parameters_by_level(&self, level: Level) -> Result<&BTreeSet<String>, GraphError> {
        if !self.sealed {
            return Err(GraphError::Invalid {
                reason: "parameters_by_level is only available on a sealed graph".to_string(),
            });
        }
        Ok(self
            .parameters_by_level
            .get(&level)
            .unwrap_or_else(|| EMPTY_SET.get_or_init(BTreeSet::new)))
    }

    /// Finalize the graph: verify every structural invariant, precompute
    /// `parameters_by_level`, and freeze. Calling `seal` on an
    /// already-sealed graph is a no-op.
    pub fn seal(&mut self) -> Result<(), GraphError> {
        if self.sealed {
            return Ok(());
        }

        if let Err(e) = self.try_seal() {
            GraphSealFailed { reason: &e }.log();
            return Err(e);
        }

        GraphSealed {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
        }
        .log();
        Ok(())
    }

    fn try_seal(&mut self) -> Result<(), GraphError> {
        self.find_source()?;
        self.check_cycles()?;
        self.check_node_invariants()?;
        self.check_reachability()?;
        self.check_unique_method_ids()?;
        self.build_parameters_by_level();

        self.sealed = true;
        Ok(())
    }

    fn find_source(&mut self) -> Result<(), GraphError> {
        let sources: Vec<NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.kind.is_source())
            .map(|(i, _)| NodeId(i as u32))
            .collect();
        match sources.len() {
            1 => {
                self.source = Some(sources[0]);
                Ok(())
            }
            0 => Err(GraphError::Invalid {
                reason: "no source node (a Parameter node with level: None) was declared".into(),
            }),
            n => Err(GraphError::Invalid {
                reason: format!(
                    "expected exactly one source node, found {n}: {}",
                    sources
                        .iter()
                        .map(|id| self.nodes[id.index()].name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            }),
        }
    }

    fn check_cycles(&self) -> Result<(), GraphError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Color {
            White,
            Gray,
            Black,
        }
        let mut color = vec![Color::White; self.nodes.len()];
        let mut path: Vec<NodeId> = Vec::new();

        fn visit(
            graph: &Graph,
            id: NodeId,
            color: &mut Vec<Color>,
            path: &mut Vec<NodeId>,
        ) -> Result<(), GraphError> {
            color[id.index()] = Color::Gray;
            path.push(id);
            for &edge_idx in &graph.outgoing[id.index()] {
                let to = graph.edges[edge_idx].to;
                match color[to.index()] {
                    Color::White => visit(graph, to, color, path)?,
                    Color::Gray => {
                        let start = path.iter().position(|&n| n == to).unwrap_or(0);
                        let mut cycle: Vec<String> = path[start..]
                            .iter()
                            .map(|n| graph.nodes[n.index()].name.clone())
                            .collect();
                        cycle.push(graph.nodes[to.index()].name.clone());
                        return Err(GraphError::Cyclic { cycle });
                    }
                    Color::Black => {}
                }
            }
            path.pop();
            color[id.index()] = Color::Black;
            Ok(())
        }

        for i in 0..self.nodes.len() {
            let id = NodeId(i as u32);
            if color[id.index()] == Color::White {
                visit(self, id, &mut color, &mut path)?;
            }
        }
        Ok(())
    }

    fn check_node_invariants(&self) -> Result<(), GraphError> {
        for (i, record) in self.nodes.iter().enumerate() {
            let id = NodeId(i as u32);
            let indegree = self.incoming[id.index()].len();
            match &record.kind {
                NodeKind::Merge => {
                    if indegree < 2 {
                        return Err(GraphError::Invalid {
                            reason: format!(
                                "merge node '{}' has in-degree {indegree}, expected >= 2",
                                record.name
                            ),
                        });
                    }
                    for &edge_idx in &self.incoming[id.index()] {
                        if self.edges[edge_idx].label != EdgeLabel::DataFlow {
                            return Err(GraphError::Invalid {
                                reason: format!(
                                    "merge node '{}' has a non-DataFlow incoming edge",
                                    record.name
                                ),
                            });
                        }
                    }
                }
                NodeKind::Parameter { level } => {
                    if level.is_some() && indegree < 1 {
                        return Err(GraphError::Invalid {
                            reason: format!(
                                "non-source parameter node '{}' has no incoming edges",
                                record.name
                            ),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn check_reachability(&self) -> Result<(), GraphError> {
        let leveled: Vec<NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| matches!(&n.kind, NodeKind::Parameter { level: Some(_) }))
            .map(|(i, _)| NodeId(i as u32))
            .collect();

        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        for id in &leveled {
            if visited.insert(*id) {
                queue.push_back(*id);
            }
        }
        while let Some(id) = queue.pop_front() {
            for &edge_idx in &self.incoming[id.index()] {
                let from = self.edges[edge_idx].from;
                if visited.insert(from) {
                    queue.push_back(from);
                }
            }
        }

        let unreached: Vec<&str> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(i, _)| !visited.contains(&NodeId(*i as u32)))
            .map(|(_, n)| n.name.as_str())
            .collect();

        if !unreached.is_empty() {
            return Err(GraphError::Invalid {
                reason: format!(
                    "nodes not backward-reachable from any leveled parameter node: {}",
                    unreached.join(", ")
                ),
            });
        }
        Ok(())
    }

    fn check_unique_method_ids(&self) -> Result<(), GraphError> {
        for (i, record) in self.nodes.iter().enumerate() {
            if !matches!(record.kind, NodeKind::Parameter { .. }) {
                continue;
            }
            let id = NodeId(i as u32);
            let mut seen: HashSet<&str> = HashSet::new();
            for &edge_idx in &self.incoming[id.index()] {
                if let EdgeLabel::Method(method_id) = &self.edges[edge_idx].label {
                    if !seen.insert(method_id.as_str()) {
                        return Err(GraphError::Invalid {
                            reason: format!(
                                "parameter '{}' is reachable by method '{}' more than once",
                                record.name, method_id
                            ),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn build_parameters_by_level(&mut self) {
        let mut map: HashMap<Level, BTreeSet<String>> = HashMap::new();
        for record in &self.nodes {
            if let NodeKind::Parameter { level: Some(level) } = record.kind {
                map.entry(level).or_default().insert(record.name.clone());
            }
        }
        self.parameters_by_level = map;
    }
}

static EMPTY_SET: std::sync::OnceLock<BTreeSet<String>> = std::sync::OnceLock::new();

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_chain() -> Graph {
        let mut g = Graph::new();
        g.add_parameter_node("S", None).unwrap();
        g.add_parameter_node("p_out", Some(Level::Layer)).unwrap();
        g.add_edge("S", "p_out", EdgeLabel::Method("direct".into()))
            .unwrap();
        g
    }

    #[test]
    fn seals_a_simple_chain() {
        let mut g = simple_chain();
        g.seal().unwrap();
        assert!(g.is_sealed());
        assert!(g
            .parameters_by_level(Level::Layer)
            .unwrap()
            .contains("p_out"));
    }

    #[test]
    fn sealing_twice_is_a_noop() {
        let mut g = simple_chain();
        g.seal().unwrap();
        assert!(g.seal().is_ok());
        assert!(g.is_sealed());
    }

    #[test]
    fn mutation_after_seal_fails() {
        let mut g = simple_chain();
        g.seal().unwrap();
        let err = g.add_parameter_node("another", Some(Level::Layer)).unwrap_err();
        assert_eq!(err, GraphError::SealedGraph);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut g = Graph::new();
        g.add_parameter_node("S", None).unwrap();
        let err = g.add_parameter_node("S", None).unwrap_err();
        assert_eq!(err, GraphError::DuplicateName { name: "S".into() });
    }

    #[test]
    fn get_node_on_an_unknown_name_is_unknown_node_not_missing_node() {
        let g = Graph::new();
        let err = g.get_node("nope").unwrap_err();
        assert_eq!(err, GraphError::UnknownNode { name: "nope".into() });
    }

    #[test]
    fn missing_endpoint_rejected() {
        let mut g = Graph::new();
        g.add_parameter_node("S", None).unwrap();
        let err = g
            .add_edge("S", "nope", EdgeLabel::DataFlow)
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::MissingNode {
                name: "nope".into()
            }
        );
    }

    #[test]
    fn merge_requires_two_incoming_dataflow_edges() {
        let mut g = Graph::new();
        g.add_parameter_node("S", None).unwrap();
        g.add_parameter_node("A", Some(Level::Layer)).unwrap();
        g.add_merge_node("M").unwrap();
        g.add_edge("S", "A", EdgeLabel::Method("direct".into()))
            .unwrap();
        g.add_edge("A", "M", EdgeLabel::DataFlow).unwrap();
        // Only one incoming edge: seal should fail.
        let err = g.seal().unwrap_err();
        match err {
            GraphError::Invalid { reason } => assert!(reason.contains("in-degree")),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn merge_incoming_edges_must_be_dataflow() {
        let mut g = Graph::new();
        g.add_parameter_node("S", None).unwrap();
        g.add_merge_node("M").unwrap();
        let err = g
            .add_edge("S", "M", EdgeLabel::Method("x".into()))
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidEdge { .. }));
    }

    #[test]
    fn merge_outgoing_edges_must_carry_method() {
        let mut g = Graph::new();
        g.add_parameter_node("S", None).unwrap();
        g.add_parameter_node("A", Some(Level::Layer)).unwrap();
        g.add_parameter_node("B", Some(Level::Layer)).unwrap();
        g.add_merge_node("M").unwrap();
        g.add_parameter_node("T", Some(Level::Layer)).unwrap();
        g.add_edge("S", "A", EdgeLabel::Method("a".into())).unwrap();
        g.add_edge("S", "B", EdgeLabel::Method("b".into())).unwrap();
        g.add_edge("A", "M", EdgeLabel::DataFlow).unwrap();
        g.add_edge("B", "M", EdgeLabel::DataFlow).unwrap();
        let err = g.add_edge("M", "T", EdgeLabel::DataFlow).unwrap_err();
        assert!(matches!(err, GraphError::InvalidEdge { .. }));
    }

    #[test]
    fn detects_cycles_with_a_path() {
        let mut g = Graph::new();
        g.add_parameter_node("S", None).unwrap();
        g.add_parameter_node("A", Some(Level::Layer)).unwrap();
        g.add_parameter_node("B", Some(Level::Layer)).unwrap();
        g.add_edge("S", "A", EdgeLabel::Method("x".into())).unwrap();
        g.add_edge("A", "B", EdgeLabel::Method("y".into())).unwrap();
        g.add_edge("B", "A", EdgeLabel::Method("z".into())).unwrap();
        let err = g.seal().unwrap_err();
        assert!(matches!(err, GraphError::Cyclic { .. }));
    }

    #[test]
    fn requires_exactly_one_source() {
        let mut g = Graph::new();
        g.add_parameter_node("S1", None).unwrap();
        g.add_parameter_node("S2", None).unwrap();
        let err = g.seal().unwrap_err();
        match err {
            GraphError::Invalid { reason } => assert!(reason.contains("exactly one source")),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_method_id_into_same_parameter() {
        let mut g = Graph::new();
        g.add_parameter_node("S", None).unwrap();
        g.add_parameter_node("A", Some(Level::Layer)).unwrap();
        g.add_merge_node("M1").unwrap();
        g.add_merge_node("M2").unwrap();
        g.add_parameter_node("X", Some(Level::Layer)).unwrap();
        g.add_parameter_node("Y", Some(Level::Layer)).unwrap();
        g.add_edge("S", "A", EdgeLabel::Method("raw".into())).unwrap();
        g.add_edge("S", "X", EdgeLabel::Method("m".into())).unwrap();
        g.add_edge("S", "Y", EdgeLabel::Method("m2".into())).unwrap();
        g.add_edge("X", "M1", EdgeLabel::DataFlow).unwrap();
        g.add_edge("Y", "M1", EdgeLabel::DataFlow).unwrap();
        g.add_edge("X", "M2", EdgeLabel::DataFlow).unwrap();
        g.add_edge("Y", "M2", EdgeLabel::DataFlow).unwrap();
        g.add_parameter_node("T", Some(Level::Layer)).unwrap();
        g.add_edge("M1", "T", EdgeLabel::Method("shared".into()))
            .unwrap();
        g.add_edge("M2", "T", EdgeLabel::Method("shared".into()))
            .unwrap();
        let err = g.seal().unwrap_err();
        match err {
            GraphError::Invalid { reason } => assert!(reason.contains("more than once")),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }
}
