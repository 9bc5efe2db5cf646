// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for per-run cache hit/miss events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A cacheable parameter's value was found in the run-scoped cache.
///
/// # Log Level
/// `trace!` - high-volume, one per cacheable lookup.
pub struct CacheHit<'a> {
    pub sub_record_index: usize,
    pub parameter: &'a str,
    pub method_id: &'a str,
}

impl Display for CacheHit<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "cache hit: sub-record {} parameter '{}' method '{}'",
            self.sub_record_index, self.parameter, self.method_id
        )
    }
}

impl StructuredLog for CacheHit<'_> {
    fn log(&self) {
        tracing::trace!(
            sub_record_index = self.sub_record_index,
            parameter = self.parameter,
            method_id = self.method_id,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "cache_hit",
            span_name = name,
            sub_record_index = self.sub_record_index,
            parameter = self.parameter,
            method_id = self.method_id,
        )
    }
}

/// A cacheable parameter's value was absent and was computed fresh.
///
/// # Log Level
/// `trace!`
pub struct CacheMiss<'a> {
    pub sub_record_index: usize,
    pub parameter: &'a str,
    pub method_id: &'a str,
}

impl Display for CacheMiss<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "cache miss: sub-record {} parameter '{}' method '{}'",
            self.sub_record_index, self.parameter, self.method_id
        )
    }
}

impl StructuredLog for CacheMiss<'_> {
    fn log(&self) {
        tracing::trace!(
            sub_record_index = self.sub_record_index,
            parameter = self.parameter,
            method_id = self.method_id,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "cache_miss",
            span_name = name,
            sub_record_index = self.sub_record_index,
            parameter = self.parameter,
            method_id = self.method_id,
        )
    }
}
