// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The run-scoped computed-value cache.
//!
//! Deliberately narrow scope: only parameters the graph builder has
//! explicitly opted into caching (see [`crate::graph::Graph::mark_cacheable`])
//! are ever looked up or stored here. Reusing a cached value for, say, `E`
//! across two pathways that derive it differently would silently
//! correlate two `UncertainValue`s that the type can't track as
//! correlated — so every non-opted-in parameter is recomputed fresh, once
//! per pathway, even when two pathways happen to pick the same method.
//!
//! A `Cache` is created empty at the start of every `execute_all` call and
//! discarded at its end; it is never shared across calls.

use crate::observability::messages::cache::{CacheHit, CacheMiss};
use crate::observability::messages::StructuredLog;
use crate::value::UncertainValue;
use std::collections::HashMap;

type CacheKey = (usize, String, String);

/// Hit/miss counters for one `execute_all` run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

/// The keyed computed-value store: `(sub_record_index, parameter,
/// method_id) -> UncertainValue`, with the provenance of which method
/// populated each slot.
#[derive(Default)]
pub struct Cache {
    store: HashMap<CacheKey, UncertainValue>,
    provenance: HashMap<(usize, String), String>,
    hits: u64,
    misses: u64,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.store.clear();
        self.provenance.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Look up a cached value, recording a hit or a miss. Only call this
    /// for parameters the graph has marked cacheable.
    pub fn get(&mut self, sub_index: usize, parameter: &str, method_id: &str) -> Option<UncertainValue> {
        let key = (sub_index, parameter.to_string(), method_id.to_string());
        match self.store.get(&key) {
            Some(v) => {
                self.hits += 1;
                CacheHit {
                    sub_record_index: sub_index,
                    parameter,
                    method_id,
                }
                .log();
                Some(*v)
            }
            None => {
                self.misses += 1;
                CacheMiss {
                    sub_record_index: sub_index,
                    parameter,
                    method_id,
                }
                .log();
                None
            }
        }
    }

    pub fn put(&mut self, sub_index: usize, parameter: &str, method_id: &str, value: UncertainValue) {
        self.store.insert(
            (sub_index, parameter.to_string(), method_id.to_string()),
            value,
        );
        self.provenance
            .insert((sub_index, parameter.to_string()), method_id.to_string());
    }

    pub fn provenance(&self, sub_index: usize, parameter: &str) -> Option<&str> {
        self.provenance
            .get(&(sub_index, parameter.to_string()))
            .map(String::as_str)
    }

    pub fn stats(&self) -> CacheStats {
        let total = self.hits + self.misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        };
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            hit_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_then_hit() {
        let mut cache = Cache::new();
        assert!(cache.get(0, "density", "geldsetzer").is_none());
        cache.put(0, "density", "geldsetzer", UncertainValue::exact(400.0));
        let hit = cache.get(0, "density", "geldsetzer").unwrap();
        assert_eq!(hit.mean, 400.0);
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate - 0.5).abs() < 1e-9);
    }

    #[test]
    fn clear_resets_everything() {
        let mut cache = Cache::new();
        cache.put(0, "p", "m", UncertainValue::exact(1.0));
        cache.get(0, "p", "m");
        cache.clear();
        assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 0, hit_rate: 0.0 });
        assert!(cache.get(0, "p", "m").is_none());
    }

    #[test]
    fn distinct_sub_records_are_distinct_keys() {
        let mut cache = Cache::new();
        cache.put(0, "p", "m", UncertainValue::exact(1.0));
        assert!(cache.get(1, "p", "m").is_none());
    }

    #[test]
    fn provenance_records_populating_method() {
        let mut cache = Cache::new();
        cache.put(2, "density", "geldsetzer", UncertainValue::exact(300.0));
        assert_eq!(cache.provenance(2, "density"), Some("geldsetzer"));
    }
}
