// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::cache::CacheStats;
use crate::orchestrator::trace::ComputationTrace;
use crate::record::Record;
use indexmap::IndexMap;

/// One derivation pathway's outcome.
#[derive(Debug, Clone)]
pub struct PathwayResult {
    pub id: String,
    pub description: String,
    pub methods: IndexMap<String, String>,
    pub record: Record,
    pub traces: Vec<ComputationTrace>,
    pub success: bool,
    pub warnings: Vec<String>,
}

/// The aggregate of every pathway's outcome for one `execute_all` call.
#[derive(Debug, Clone)]
pub struct ExecutionResults {
    pub target_parameter: String,
    pub source_record: Record,
    pub pathways: IndexMap<String, PathwayResult>,
    pub total: u32,
    pub successful: u32,
    pub failed: u32,
    pub cache_stats: CacheStats,
}
