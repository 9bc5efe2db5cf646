// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for pathway and run completion events.

use crate::cache::CacheStats;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// One pathway finished executing.
///
/// # Log Level
/// `debug!`
pub struct PathwayCompleted<'a> {
    pub description: &'a str,
    pub success: bool,
    pub trace_count: usize,
}

impl Display for PathwayCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "pathway '{}' completed: success={}, {} trace(s)",
            self.description, self.success, self.trace_count
        )
    }
}

impl StructuredLog for PathwayCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            description = self.description,
            success = self.success,
            trace_count = self.trace_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "pathway_completed",
            span_name = name,
            description = self.description,
            success = self.success,
            trace_count = self.trace_count,
        )
    }
}

/// A full `execute_all` run finished: every pathway has been executed
/// and the run-scoped cache's final statistics are available.
///
/// # Log Level
/// `info!`
pub struct RunCompleted<'a> {
    pub target: &'a str,
    pub total: u32,
    pub successful: u32,
    pub failed: u32,
    pub cache_stats: CacheStats,
}

impl Display for RunCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "execute_all('{}') completed: {}/{} pathways succeeded, cache hit rate {:.2}",
            self.target, self.successful, self.total, self.cache_stats.hit_rate
        )
    }
}

impl StructuredLog for RunCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            target_parameter = self.target,
            total = self.total,
            successful = self.successful,
            failed = self.failed,
            cache_hits = self.cache_stats.hits,
            cache_misses = self.cache_stats.misses,
            cache_hit_rate = self.cache_stats.hit_rate,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "run_completed",
            span_name = name,
            target_parameter = self.target,
            total = self.total,
            successful = self.successful,
            failed = self.failed,
            cache_hit_rate = self.cache_stats.hit_rate,
        )
    }
}
