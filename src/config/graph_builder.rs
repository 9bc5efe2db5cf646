// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::loader::{EdgeConfig, GraphConfig, NodeConfig, NodeKindConfig};
use crate::errors::ConfigError;
use crate::graph::{EdgeLabel, Graph};

/// Build and seal a [`Graph`] from a [`GraphConfig`].
///
/// Every node, edge, and cacheable-marking failure is accumulated rather
/// than returned on the first error, same shape as the house's
/// `Vec<ValidationError>` — a config author sees every problem in the
/// file in one pass. Sealing only runs once every node and edge has
/// applied cleanly; a seal failure is reported on its own.
pub fn build_graph(cfg: &GraphConfig) -> Result<Graph, Vec<ConfigError>> {
    let mut graph = Graph::new();
    let mut errors = Vec::new();

    for node in &cfg.nodes {
        if let Err(e) = add_node(&mut graph, node) {
            errors.push(e.into());
        }
    }

    for edge in &cfg.edges {
        if let Err(e) = add_edge(&mut graph, edge) {
            errors.push(e.into());
        }
    }

    for node in &cfg.nodes {
        if node.cacheable {
            if let Err(e) = graph.mark_cacheable(&node.name) {
                errors.push(e.into());
            }
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    if let Err(e) = graph.seal() {
        return Err(vec![e.into()]);
    }

    Ok(graph)
}

fn add_node(
    graph: &mut Graph,
    node: &NodeConfig,
) -> Result<crate::graph::NodeId, crate::errors::GraphError> {
    match node.kind {
        NodeKindConfig::Parameter => {
            graph.add_parameter_node(node.name.clone(), node.level.map(Into::into))
        }
        NodeKindConfig::Merge => graph.add_merge_node(node.name.clone()),
    }
}

fn add_edge(graph: &mut Graph, edge: &EdgeConfig) -> Result<(), crate::errors::GraphError> {
    let label = match &edge.method {
        Some(method_id) => EdgeLabel::Method(method_id.clone()),
        None => EdgeLabel::DataFlow,
    };
    graph.add_edge(&edge.source, &edge.target, label)
}
