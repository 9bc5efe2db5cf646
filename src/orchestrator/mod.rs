// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Drives a single enumeration against a single record.
//!
//! [`Engine::execute_all`] asks the [`crate::enumerator::Enumerator`] for
//! every derivation tree to a target, then walks each one with
//! [`Engine::execute_pathway`]: resolve a `parameter -> method_id` mapping
//! from the tree, order the mapping's layer-level parameters so every
//! parameter is preceded by what it requires, walk each sub-record in that
//! order consulting the run-scoped [`crate::cache::Cache`], and finally
//! compute the record-level (`Slab`) target if there is one. Traces
//! accumulate in execution order; a pathway's `success` is the target
//! parameter's trace outcome alone, never its siblings'.
//!
//! The cache is created once per `execute_all` call and shared across every
//! pathway in that call, per `spec.md` §4.4/§5 — this is the only state any
//! two pathway executions share.

pub mod result;
pub mod trace;

pub use crate::errors::EngineError;
pub use result::{ExecutionResults, PathwayResult};
pub use trace::ComputationTrace;

use crate::cache::Cache;
use crate::enumerator::{fingerprint, Enumerator};
use crate::graph::{Graph, Level};
use crate::observability::messages::orchestrator::{PathwayCompleted, RunCompleted};
use crate::observability::messages::StructuredLog;
use crate::record::{Record, SubRecord};
use crate::registry::{ExecutionContext, Failure, MethodRegistry};
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Flags threaded through every registry call in a pathway.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionConfig {
    pub include_method_uncertainty: bool,
    pub verbose: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            include_method_uncertainty: true,
            verbose: false,
        }
    }
}

/// One entry of [`Engine::list_pathways`]: a derivation tree's fingerprint,
/// pre-formatted as a stable id and a human-readable description.
#[derive(Debug, Clone)]
pub struct PathwayInfo {
    pub id: String,
    pub description: String,
    pub methods: IndexMap<String, String>,
}

/// Binds a sealed [`Graph`] and a [`MethodRegistry`] and drives executions
/// against them. Borrows both for its lifetime; building one against an
/// unsealed graph fails immediately rather than producing an engine that
/// would behave inconsistently.
pub struct Engine<'g> {
    graph: &'g Graph,
    registry: &'g MethodRegistry,
    enumerator: Enumerator<'g>,
}

impl<'g> Engine<'g> {
    pub fn new(graph: &'g Graph, registry: &'g MethodRegistry) -> Result<Self, EngineError> {
        if !graph.is_sealed() {
            return Err(EngineError::GraphNotSealed);
        }
        Ok(Self {
            graph,
            registry,
            enumerator: Enumerator::new(graph),
        })
    }

    fn target_id(&self, target: &str) -> Result<crate::graph::NodeId, EngineError> {
        self.graph
            .node_id(target)
            .map_err(|_| EngineError::UnknownTarget {
                name: target.to_string(),
            })
    }

    /// Every distinct pathway to `target`, with their id/description
    /// pre-formatted. Does not execute anything.
    pub fn list_pathways(&self, target: &str) -> Result<Vec<PathwayInfo>, EngineError> {
        let target_id = self.target_id(target)?;
        let trees = self.enumerator.enumerate(target_id);
        Ok(trees
            .iter()
            .map(|tree| {
                let methods = extract_mapping(tree, self.graph);
                let (id, description) = format_pathway(&methods);
                PathwayInfo {
                    id,
                    description,
                    methods,
                }
            })
            .collect())
    }

    /// Enumerate every pathway to `target` and execute each one against
    /// `record`, sharing one cache across the whole run.
    pub fn execute_all(
        &self,
        record: &Record,
        target: &str,
        config: Option<ExecutionConfig>,
    ) -> Result<ExecutionResults, EngineError> {
        let config = config.unwrap_or_default();
        let target_id = self.target_id(target)?;
        let trees = self.enumerator.enumerate(target_id);

        let mut cache = Cache::new();
        cache.clear();

        let mut pathways = IndexMap::new();
        let mut successful = 0u32;
        let mut failed = 0u32;

        for tree in trees.iter() {
            let mapping = extract_mapping(tree, self.graph);
            let pathway = self.execute_pathway(record, &mapping, target, &config, &mut cache);
            if pathway.success {
                successful += 1;
            } else {
                failed += 1;
            }
            pathways.insert(pathway.description.clone(), pathway);
        }

        let total = pathways.len() as u32;
        RunCompleted {
            target,
            total,
            successful,
            failed,
            cache_stats: cache.stats(),
        }
        .log();

        Ok(ExecutionResults {
            target_parameter: target.to_string(),
            source_record: record.clone(),
            pathways,
            total,
            successful,
            failed,
            cache_stats: cache.stats(),
        })
    }

    /// Execute exactly the pathway whose method choices match `methods`.
    /// `methods` must be the fingerprint of one of `target`'s enumerated
    /// pathways, or this fails with [`EngineError::NoSuchPathway`] — the
    /// caller cannot invent an inconsistent combination of method choices.
    pub fn execute_single(
        &self,
        record: &Record,
        target: &str,
        methods: &IndexMap<String, String>,
        config: Option<ExecutionConfig>,
    ) -> Result<PathwayResult, EngineError> {
        let config = config.unwrap_or_default();
        let target_id = self.target_id(target)?;
        let trees = self.enumerator.enumerate(target_id);

        let wanted: Vec<(String, String)> = {
            let mut pairs: Vec<(String, String)> =
                methods.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            pairs.sort();
            pairs
        };
        let matches = trees
            .iter()
            .any(|tree| fingerprint(tree, self.graph) == wanted);
        if !matches {
            return Err(EngineError::NoSuchPathway {
                target: target.to_string(),
            });
        }

        let mut cache = Cache::new();
        Ok(self.execute_pathway(record, methods, target, &config, &mut cache))
    }

    fn execute_pathway(
        &self,
        record: &Record,
        mapping: &IndexMap<String, String>,
        target: &str,
        config: &ExecutionConfig,
        cache: &mut Cache,
    ) -> PathwayResult {
        let (id, description) = format_pathway(mapping);
        let mut traces = Vec::new();
        let mut warnings = Vec::new();
        let mut result = record.clone();

        let order = layer_order(self.graph, self.registry, mapping);

        for i in 0..result.sub_records.len() {
            let original = result.sub_records[i].clone();
            let mut working: SubRecord = (*original).clone();
            let mut wrote_anything = false;

            for parameter in &order {
                let method_id = &mapping[parameter];
                let node_id = self.graph.node_id(parameter).ok();
                let cacheable = node_id.map(|id| self.graph.is_cacheable(id)).unwrap_or(false);

                // Per spec.md §4.5: decide via the cache *before* touching the
                // registry. A cache hit must never invoke the callable — that's
                // the whole point of caching — so `registry.execute` (and any
                // domain-fallback warning it would emit) only runs on a miss.
                // `cache.get` is only ever called for a cacheable parameter: it
                // records a hit/miss, so calling it for a non-cacheable one
                // would pollute the run's cache statistics for free.
                let cache_hit = if cacheable {
                    cache.get(i, parameter, method_id)
                } else {
                    None
                };

                let (value, cached, input_summary) =
                    if let Some(cached_value) = cache_hit {
                        (Ok(cached_value), true, IndexMap::new())
                    } else {
                        let outcome = self.registry.execute(
                            parameter,
                            method_id,
                            &ExecutionContext::Layer(&working),
                            config.include_method_uncertainty,
                        );

                        for name in &outcome.fallback_inputs {
                            warnings.push(format!(
                                "pathway '{description}' resolved '{name}' for parameter '{parameter}' via the general-prefix domain fallback"
                            ));
                            crate::observability::messages::registry::DomainFallbackUsed {
                                parameter,
                                method_id,
                                input_name: name,
                            }
                            .log();
                        }

                        if cacheable {
                            if let Ok(v) = outcome.result {
                                cache.put(i, parameter, method_id, v);
                            }
                        }
                        (outcome.result, false, outcome.input_summary)
                    };

                let success = value.is_ok();
                let (output, failure_reason) = match value {
                    Ok(v) => {
                        working.set_parameter(parameter.clone(), v);
                        wrote_anything = true;
                        (Some(v), None)
                    }
                    Err(e) => (None, Some(e)),
                };

                traces.push(ComputationTrace {
                    parameter: parameter.clone(),
                    method_id: method_id.clone(),
                    sub_record_index: Some(i),
                    success,
                    cached,
                    output,
                    failure_reason,
                    input_summary,
                });
            }

            if wrote_anything {
                result.replace_sub_record(i, working);
            }
        }

        if let Some(Level::Slab) = self
            .graph
            .node_id(target)
            .ok()
            .and_then(|id| self.graph.node_kind(id).level())
        {
            self.execute_slab_step(target, mapping, config, &mut result, &mut traces, &mut warnings);
        }

        let success = traces
            .iter()
            .any(|t| t.parameter == target && t.success);

        PathwayCompleted {
            description: &description,
            success,
            trace_count: traces.len(),
        }
        .log();

        PathwayResult {
            id,
            description,
            methods: mapping.clone(),
            record: result,
            traces,
            success,
            warnings,
        }
    }

    fn execute_slab_step(
        &self,
        target: &str,
        mapping: &IndexMap<String, String>,
        config: &ExecutionConfig,
        result: &mut Record,
        traces: &mut Vec<ComputationTrace>,
        warnings: &mut Vec<String>,
    ) {
        let method_id = match mapping.get(target) {
            Some(m) => m.clone(),
            None => return,
        };
        let spec = self.registry.get(target, &method_id);

        if let Some(spec) = spec {
            for required in &spec.required_inputs {
                let is_layer_param = self
                    .graph
                    .node_id(required)
                    .ok()
                    .and_then(|id| self.graph.node_kind(id).level())
                    == Some(Level::Layer);
                if !is_layer_param {
                    continue;
                }
                if let Some(missing_index) = result
                    .sub_records
                    .iter()
                    .position(|sr| sr.get_parameter(required).is_none())
                {
                    traces.push(ComputationTrace {
                        parameter: target.to_string(),
                        method_id: method_id.clone(),
                        sub_record_index: None,
                        success: false,
                        cached: false,
                        output: None,
                        failure_reason: Some(Failure::MissingPrerequisite {
                            name: required.clone(),
                            sub_record_index: missing_index,
                        }),
                        input_summary: IndexMap::new(),
                    });
                    return;
                }
            }
        }

        let outcome = self.registry.execute(
            target,
            &method_id,
            &ExecutionContext::Slab(result),
            config.include_method_uncertainty,
        );
        for name in &outcome.fallback_inputs {
            warnings.push(format!(
                "record-level parameter '{target}' resolved '{name}' via the general-prefix domain fallback"
            ));
        }
        let success = outcome.result.is_ok();
        let (output, failure_reason) = match outcome.result {
            Ok(v) => {
                result.set_parameter(target.to_string(), v);
                (Some(v), None)
            }
            Err(e) => (None, Some(e)),
        };
        traces.push(ComputationTrace {
            parameter: target.to_string(),
            method_id,
            sub_record_index: None,
            success,
            cached: false,
            output,
            failure_reason,
            input_summary: outcome.input_summary,
        });
    }
}

fn extract_mapping(
    tree: &crate::enumerator::DerivationTree,
    graph: &Graph,
) -> IndexMap<String, String> {
    fingerprint(tree, graph).into_iter().collect()
}

fn format_pathway(mapping: &IndexMap<String, String>) -> (String, String) {
    let mut pairs: Vec<(&String, &String)> = mapping.iter().collect();
    pairs.sort();
    let id = pairs
        .iter()
        .map(|(p, m)| format!("{p}:{m}"))
        .collect::<Vec<_>>()
        .join("->");
    let description = pairs
        .iter()
        .map(|(p, m)| format!("{p} via {m}"))
        .collect::<Vec<_>>()
        .join(", ");
    (id, description)
}

/// Topological order over the layer-level parameters in `mapping`,
/// dependency edges drawn from each chosen method's `required_inputs`
/// intersected with `mapping`'s other parameters, ties broken by name.
/// Record-level (`Slab`) parameters are excluded — they're handled
/// separately after every sub-record has been walked.
fn layer_order(graph: &Graph, registry: &MethodRegistry, mapping: &IndexMap<String, String>) -> Vec<String> {
    let layer_params: BTreeSet<String> = mapping
        .keys()
        .filter(|p| {
            graph
                .node_id(p)
                .ok()
                .and_then(|id| graph.node_kind(id).level())
                == Some(Level::Layer)
        })
        .cloned()
        .collect();

    let mut deps: IndexMap<String, BTreeSet<String>> = layer_params
        .iter()
        .map(|p| {
            let method_id = &mapping[p];
            let required: BTreeSet<String> = registry
                .get(p, method_id)
                .map(|spec| {
                    spec.required_inputs
                        .iter()
                        .filter(|r| layer_params.contains(*r))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            (p.clone(), required)
        })
        .collect();

    let mut order = Vec::with_capacity(layer_params.len());
    while !deps.is_empty() {
        let mut ready: Vec<String> = deps
            .iter()
            .filter(|(_, required)| required.iter().all(|r| order.contains(r)))
            .map(|(p, _)| p.clone())
            .collect();
        ready.sort();
        let next = ready
            .into_iter()
            .next()
            .expect("layer dependency sub-DAG must be acyclic: the graph it was drawn from is sealed");
        deps.shift_remove(&next);
        order.push(next);
    }
    order
}
