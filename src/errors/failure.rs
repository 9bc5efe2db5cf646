// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// A trace-level execution failure. Never fatal to sibling pathways or
/// sibling sub-records: a `Failure` is a value stored on a
/// [`crate::orchestrator::ComputationTrace`], never an `Err` propagated up
/// out of `execute_all`/`execute_pathway`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Failure {
    #[error("missing input '{name}'")]
    MissingInput { name: String },

    #[error("unsupported domain value '{value}' for input '{name}'")]
    UnsupportedDomain { name: String, value: String },

    #[error("method failed: {reason}")]
    MethodFailed { reason: String },

    #[error("numerical failure (NaN result)")]
    NumericalFailure,

    #[error("missing prerequisite '{name}' on sub-record {sub_record_index}")]
    MissingPrerequisite {
        name: String,
        sub_record_index: usize,
    },
}
