// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structured logging for the graph/enumerator/registry/cache/orchestrator
//! pipeline.
//!
//! Message types follow the same struct + `Display` + [`messages::StructuredLog`]
//! pattern used throughout this codebase: every phase of `execute_all`
//! emits a typed event instead of an ad hoc `println!`/string log, so
//! downstream consumers can filter and alert on structured fields
//! (`target`, `pathway_count`, `cache_hit_rate`, ...) rather than parsing
//! messages.

pub mod messages;
