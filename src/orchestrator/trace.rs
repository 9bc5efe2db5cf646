// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::registry::Failure;
use crate::value::UncertainValue;
use indexmap::IndexMap;

/// A record of one registry call site within a pathway's execution.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputationTrace {
    pub parameter: String,
    pub method_id: String,
    pub sub_record_index: Option<usize>,
    pub success: bool,
    pub cached: bool,
    pub output: Option<UncertainValue>,
    pub failure_reason: Option<Failure>,
    pub input_summary: IndexMap<String, String>,
}
