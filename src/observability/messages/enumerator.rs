// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for derivation-tree enumeration lifecycle events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Enumeration was requested for a target parameter that hasn't been
/// answered before (a memo miss at the per-target level).
///
/// # Log Level
/// `debug!`
pub struct EnumerationStarted<'a> {
    pub target: &'a str,
}

impl Display for EnumerationStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "enumerating derivation trees for target '{}'", self.target)
    }
}

impl StructuredLog for EnumerationStarted<'_> {
    fn log(&self) {
        tracing::debug!(target_parameter = self.target, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("enumeration", span_name = name, target_parameter = self.target)
    }
}

/// Enumeration completed: `pathway_count` is the post-dedup count of
/// distinct derivation trees returned to the caller.
///
/// # Log Level
/// `info!`
pub struct EnumerationCompleted<'a> {
    pub target: &'a str,
    pub pathway_count: usize,
}

impl Display for EnumerationCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "enumeration for '{}' yielded {} distinct pathway(s)",
            self.target, self.pathway_count
        )
    }
}

impl StructuredLog for EnumerationCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            target_parameter = self.target,
            pathway_count = self.pathway_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "enumeration_completed",
            span_name = name,
            target_parameter = self.target,
            pathway_count = self.pathway_count,
        )
    }
}
