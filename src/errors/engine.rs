// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Immediate, non-recoverable faults raised directly to the caller of
/// [`crate::orchestrator::Engine`]. Trace-level failures
/// ([`crate::errors::Failure`]) never surface here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("unknown target parameter '{name}'")]
    UnknownTarget { name: String },

    #[error("the graph must be sealed before it can be used to build an Engine")]
    GraphNotSealed,

    #[error("no pathway to '{target}' matches the given method mapping")]
    NoSuchPathway { target: String },
}
