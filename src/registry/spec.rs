// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::registry::error::MethodFailure;
use crate::value::UncertainValue;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::Arc;

/// A raw field or resolved input value: either a bare scalar/uncertain
/// value or a categorical code.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(UncertainValue),
    Text(String),
}

impl FieldValue {
    pub fn as_scalar(&self) -> Option<UncertainValue> {
        match self {
            FieldValue::Scalar(v) => Some(*v),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            FieldValue::Scalar(_) => None,
        }
    }

    pub fn display(&self) -> String {
        match self {
            FieldValue::Scalar(v) => v.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

/// A two-tier categorical domain resolution table: a set of specific codes
/// that resolve as-is, and a set of general (prefix) codes that resolve
/// the first `prefix_len` characters of an otherwise-unmatched code.
#[derive(Debug, Clone, Default)]
pub struct DomainTable {
    pub specific: HashSet<String>,
    pub general: HashSet<String>,
    pub prefix_len: usize,
}

/// The outcome of resolving a categorical code through a [`DomainTable`].
pub(crate) enum DomainResolution {
    Specific(String),
    General(String),
    Unresolved,
}

impl DomainTable {
    pub fn resolve(&self, code: &str) -> DomainResolution {
        if self.specific.contains(code) {
            return DomainResolution::Specific(code.to_string());
        }
        // Byte slicing would panic on a non-ASCII code whose prefix_len-th
        // byte isn't a char boundary; take the first prefix_len characters.
        let prefix = match code.char_indices().nth(self.prefix_len) {
            Some((byte_idx, _)) => &code[..byte_idx],
            None => code,
        };
        if self.general.contains(prefix) {
            return DomainResolution::General(prefix.to_string());
        }
        DomainResolution::Unresolved
    }
}

/// A resolved input handed to a [`MethodSpec`]'s callable: a single value,
/// or (for a `Slab`-level method whose required input names a layer-level
/// parameter) the ordered series of that parameter's value across every
/// sub-record. See Open Question 3 in `spec.md` §9 — a record-level
/// method's own inputs are layer-level values, not other record-level
/// parameters, so this is the only aggregation shape this engine supports.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedInput {
    Single(FieldValue),
    Series(Vec<FieldValue>),
}

impl ResolvedInput {
    pub fn display(&self) -> String {
        match self {
            ResolvedInput::Single(v) => v.display(),
            ResolvedInput::Series(values) => {
                let parts: Vec<String> = values.iter().map(FieldValue::display).collect();
                format!("[{}]", parts.join(", "))
            }
        }
    }
}

pub type MethodInputs = IndexMap<String, ResolvedInput>;

pub type Callable =
    Arc<dyn Fn(&MethodInputs, bool) -> Result<UncertainValue, MethodFailure> + Send + Sync>;

use crate::graph::Level;

/// The full binding for a `(parameter, method_id)` pair: what it needs,
/// how to resolve any categorical inputs, and the function that computes
/// it.
#[derive(Clone)]
pub struct MethodSpec {
    pub parameter: String,
    pub method_id: String,
    pub level: Level,
    pub required_inputs: Vec<String>,
    pub domain_tables: IndexMap<String, DomainTable>,
    pub supports_method_uncertainty: bool,
    pub callable: Callable,
}

impl std::fmt::Debug for MethodSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodSpec")
            .field("parameter", &self.parameter)
            .field("method_id", &self.method_id)
            .field("level", &self.level)
            .field("required_inputs", &self.required_inputs)
            .field("supports_method_uncertainty", &self.supports_method_uncertainty)
            .finish()
    }
}
