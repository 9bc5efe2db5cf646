// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging, organized by
//! subsystem:
//!
//! * `graph` - graph construction and seal events
//! * `enumerator` - derivation-tree enumeration lifecycle
//! * `registry` - method resolution and domain-fallback events
//! * `cache` - per-run cache hit/miss events
//! * `orchestrator` - pathway and run completion events

pub mod cache;
pub mod enumerator;
pub mod graph;
pub mod orchestrator;
pub mod registry;

use tracing::Span;

/// A message type that can emit both a human-readable log line (via
/// `Display`) and a structured, queryable event with the same fields as
/// attributes.
pub trait StructuredLog {
    /// Emit a log event with structured fields plus the `Display` message.
    fn log(&self);

    /// Create a span carrying this message's fields as attributes.
    fn span(&self, name: &str) -> Span;
}
