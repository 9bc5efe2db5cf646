// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Construction- and seal-time faults for [`crate::graph::Graph`]. All
/// variants are returned eagerly to the caller; none of them represent a
/// recoverable, trace-level execution failure (see [`crate::errors::Failure`]
/// for those).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("a node named '{name}' already exists")]
    DuplicateName { name: String },

    #[error("no node named '{name}' exists")]
    MissingNode { name: String },

    #[error("no node named '{name}' exists")]
    UnknownNode { name: String },

    #[error("invalid edge {source} -> {target}: {reason}")]
    InvalidEdge {
        source: String,
        target: String,
        reason: String,
    },

    #[error("the graph is sealed and can no longer be mutated")]
    SealedGraph,

    #[error("graph is not acyclic: cycle through {}", cycle.join(" -> "))]
    Cyclic { cycle: Vec<String> },

    #[error("graph fails to validate: {reason}")]
    Invalid { reason: String },
}
