// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for graph construction and seal events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A graph was sealed successfully: every structural invariant held.
///
/// # Log Level
/// `info!`
pub struct GraphSealed {
    pub node_count: usize,
    pub edge_count: usize,
}

impl Display for GraphSealed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "graph sealed: {} nodes, {} edges",
            self.node_count, self.edge_count
        )
    }
}

impl StructuredLog for GraphSealed {
    fn log(&self) {
        tracing::info!(
            node_count = self.node_count,
            edge_count = self.edge_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "graph_sealed",
            span_name = name,
            node_count = self.node_count,
            edge_count = self.edge_count,
        )
    }
}

/// Sealing failed: a structural invariant was violated.
///
/// # Log Level
/// `error!`
pub struct GraphSealFailed<'a> {
    pub reason: &'a dyn std::error::Error,
}

impl Display for GraphSealFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "graph seal failed: {}", self.reason)
    }
}

impl StructuredLog for GraphSealFailed<'_> {
    fn log(&self) {
        tracing::error!(reason = %self.reason, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("graph_seal_failed", span_name = name, reason = %self.reason)
    }
}
