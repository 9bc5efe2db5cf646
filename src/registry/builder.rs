// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The method registry: binds `(parameter, method_id)` pairs to callables
//! and resolves their inputs against a sub-record or record.
//!
//! `execute` runs the five-step procedure from `spec.md` §4.3: resolve
//! each required input in order (short-circuiting on the first missing or
//! unresolved one), apply categorical domain resolution, invoke the
//! callable (guarded against panics), and check the result for NaN.

use crate::errors::{Failure, RegistryError};
use crate::observability::messages::StructuredLog;
use crate::record::{Record, SubRecord};
use crate::registry::error::MethodFailure;
use crate::registry::spec::{DomainResolution, FieldValue, MethodInputs, MethodSpec, ResolvedInput};
use indexmap::IndexMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// What a method's inputs are resolved against: one sub-record for a
/// `Layer`-level method, or the whole record for a `Slab`-level one.
pub enum ExecutionContext<'a> {
    Layer(&'a SubRecord),
    Slab(&'a Record),
}

/// The result of one `execute` call: either a value, or a typed failure,
/// plus a diagnostic summary of the resolved inputs and whether any
/// categorical input fell back to the general-prefix table.
pub struct RegistryOutcome {
    pub result: Result<crate::value::UncertainValue, Failure>,
    pub input_summary: IndexMap<String, String>,
    pub fallback_inputs: Vec<String>,
}

/// A sealed table of `(parameter, method_id) -> MethodSpec` bindings.
#[derive(Default)]
pub struct MethodRegistry {
    specs: IndexMap<(String, String), MethodSpec>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self {
            specs: IndexMap::new(),
        }
    }

    pub fn register(&mut self, spec: MethodSpec) -> Result<(), RegistryError> {
        let key = (spec.parameter.clone(), spec.method_id.clone());
        if self.specs.contains_key(&key) {
            return Err(RegistryError::DuplicateMethod {
                parameter: key.0,
                method_id: key.1,
            });
        }
        self.specs.insert(key, spec);
        Ok(())
    }

    pub fn get(&self, parameter: &str, method_id: &str) -> Option<&MethodSpec> {
        self.specs
            .get(&(parameter.to_string(), method_id.to_string()))
    }

    fn resolve_single(
        &self,
        name: &str,
        sub_record: &SubRecord,
    ) -> Option<FieldValue> {
        if let Some(v) = sub_record.get_parameter(name) {
            return Some(FieldValue::Scalar(v));
        }
        sub_record.get_raw(name).cloned()
    }

    fn resolve_slab(
        &self,
        name: &str,
        record: &Record,
    ) -> Option<ResolvedInput> {
        if let Some(v) = record.get_parameter(name) {
            return Some(ResolvedInput::Single(FieldValue::Scalar(v)));
        }
        if let Some(v) = record.get_raw(name) {
            return Some(ResolvedInput::Single(v.clone()));
        }
        // Fall back to a layer-level parameter's per-sub-record series.
        if record
            .sub_records
            .iter()
            .all(|sr| sr.get_parameter(name).is_some())
            && !record.sub_records.is_empty()
        {
            let series: Vec<FieldValue> = record
                .sub_records
                .iter()
                .map(|sr| FieldValue::Scalar(sr.get_parameter(name).unwrap()))
                .collect();
            return Some(ResolvedInput::Series(series));
        }
        None
    }

    pub fn execute(
        &self,
        parameter: &str,
        method_id: &str,
        context: &ExecutionContext<'_>,
        include_method_uncertainty: bool,
    ) -> RegistryOutcome {
        let mut input_summary = IndexMap::new();
        let mut fallback_inputs = Vec::new();

        let spec = match self.get(parameter, method_id) {
            Some(spec) => spec,
            None => {
                return RegistryOutcome {
                    result: Err(Failure::MissingInput {
                        name: format!("{parameter}:{method_id}"),
                    }),
                    input_summary,
                    fallback_inputs,
                }
            }
        };

        let mut inputs: MethodInputs = IndexMap::new();

        for name in &spec.required_inputs {
            let resolved: ResolvedInput = match context {
                ExecutionContext::Layer(sub_record) => {
                    match self.resolve_single(name, sub_record) {
                        Some(v) => ResolvedInput::Single(v),
                        None => {
                            return RegistryOutcome {
                                result: Err(Failure::MissingInput { name: name.clone() }),
                                input_summary,
                                fallback_inputs,
                            }
                        }
                    }
                }
                ExecutionContext::Slab(record) => match self.resolve_slab(name, record) {
                    Some(v) => v,
                    None => {
                        return RegistryOutcome {
                            result: Err(Failure::MissingInput { name: name.clone() }),
                            input_summary,
                            fallback_inputs,
                        }
                    }
                },
            };

            let resolved = if let Some(table) = spec.domain_tables.get(name) {
                match resolved {
                    ResolvedInput::Single(FieldValue::Text(code)) => {
                        match table.resolve(&code) {
                            DomainResolution::Specific(value) => {
                                ResolvedInput::Single(FieldValue::Text(value))
                            }
                            DomainResolution::General(value) => {
                                fallback_inputs.push(name.clone());
                                ResolvedInput::Single(FieldValue::Text(value))
                            }
                            DomainResolution::Unresolved => {
                                return RegistryOutcome {
                                    result: Err(Failure::UnsupportedDomain {
                                        name: name.clone(),
                                        value: code,
                                    }),
                                    input_summary,
                                    fallback_inputs,
                                }
                            }
                        }
                    }
                    other => other,
                }
            } else {
                resolved
            };

            input_summary.insert(name.clone(), resolved.display());
            inputs.insert(name.clone(), resolved);
        }

        let callable = spec.callable.clone();
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            callable(&inputs, include_method_uncertainty)
        }));

        let value = match outcome {
            Ok(Ok(value)) => value,
            Ok(Err(MethodFailure { reason })) => {
                let failure = Failure::MethodFailed { reason };
                crate::observability::messages::registry::MethodExecutionFailed {
                    parameter,
                    method_id,
                    reason: &failure,
                }
                .log();
                return RegistryOutcome {
                    result: Err(failure),
                    input_summary,
                    fallback_inputs,
                }
            }
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "method panicked".to_string());
                return RegistryOutcome {
                    result: Err(Failure::MethodFailed { reason }),
                    input_summary,
                    fallback_inputs,
                };
            }
        };

        if value.is_nan() {
            return RegistryOutcome {
                result: Err(Failure::NumericalFailure),
                input_summary,
                fallback_inputs,
            };
        }

        RegistryOutcome {
            result: Ok(value),
            input_summary,
            fallback_inputs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SubRecord;
    use crate::registry::spec::DomainTable;
    use crate::value::UncertainValue;
    use std::sync::Arc;

    fn make_spec(
        parameter: &str,
        method_id: &str,
        required_inputs: Vec<&str>,
        domain_tables: IndexMap<String, DomainTable>,
    ) -> MethodSpec {
        MethodSpec {
            parameter: parameter.to_string(),
            method_id: method_id.to_string(),
            level: crate::graph::Level::Layer,
            required_inputs: required_inputs.into_iter().map(String::from).collect(),
            domain_tables,
            supports_method_uncertainty: true,
            callable: Arc::new(|inputs, _flags| {
                let mut sum = UncertainValue::exact(0.0);
                for (_, v) in inputs {
                    if let ResolvedInput::Single(FieldValue::Scalar(x)) = v {
                        sum = sum + *x;
                    }
                }
                Ok(sum)
            }),
        }
    }

    struct TestCase {
        name: &'static str,
        sub_record: SubRecord,
        expect_success: bool,
    }

    #[test]
    fn execute_resolves_raw_fields_table_driven() {
        let mut registry = MethodRegistry::new();
        registry
            .register(make_spec("p", "sum", vec!["a", "b"], IndexMap::new()))
            .unwrap();

        let cases = vec![
            TestCase {
                name: "both fields present",
                sub_record: {
                    let mut sr = SubRecord::new();
                    sr.set_raw("a", FieldValue::Scalar(UncertainValue::exact(1.0)));
                    sr.set_raw("b", FieldValue::Scalar(UncertainValue::exact(2.0)));
                    sr
                },
                expect_success: true,
            },
            TestCase {
                name: "missing field b",
                sub_record: {
                    let mut sr = SubRecord::new();
                    sr.set_raw("a", FieldValue::Scalar(UncertainValue::exact(1.0)));
                    sr
                },
                expect_success: false,
            },
        ];

        for case in cases {
            let outcome = registry.execute(
                "p",
                "sum",
                &ExecutionContext::Layer(&case.sub_record),
                true,
            );
            assert_eq!(
                outcome.result.is_ok(),
                case.expect_success,
                "case '{}' result mismatch: {:?}",
                case.name,
                outcome.result
            );
        }
    }

    #[test]
    fn domain_fallback_is_reported() {
        let mut domain_tables = IndexMap::new();
        domain_tables.insert(
            "code".to_string(),
            DomainTable {
                specific: ["ABc".to_string()].into_iter().collect(),
                general: ["AB".to_string()].into_iter().collect(),
                prefix_len: 2,
            },
        );
        let mut registry = MethodRegistry::new();
        registry
            .register(MethodSpec {
                parameter: "p".into(),
                method_id: "m".into(),
                level: crate::graph::Level::Layer,
                required_inputs: vec!["code".into()],
                domain_tables,
                supports_method_uncertainty: false,
                callable: Arc::new(|_inputs, _flags| Ok(UncertainValue::exact(1.0))),
            })
            .unwrap();

        let mut sr = SubRecord::new();
        sr.set_raw("code", FieldValue::Text("ABx".to_string()));
        let outcome = registry.execute("p", "m", &ExecutionContext::Layer(&sr), true);
        assert!(outcome.result.is_ok());
        assert_eq!(outcome.fallback_inputs, vec!["code".to_string()]);

        let mut sr2 = SubRecord::new();
        sr2.set_raw("code", FieldValue::Text("XY".to_string()));
        let outcome2 = registry.execute("p", "m", &ExecutionContext::Layer(&sr2), true);
        assert!(matches!(
            outcome2.result,
            Err(Failure::UnsupportedDomain { .. })
        ));
        assert!(outcome2.fallback_inputs.is_empty());
    }

    #[test]
    fn nan_result_is_numerical_failure() {
        let mut registry = MethodRegistry::new();
        registry
            .register(MethodSpec {
                parameter: "p".into(),
                method_id: "bad".into(),
                level: crate::graph::Level::Layer,
                required_inputs: vec![],
                domain_tables: IndexMap::new(),
                supports_method_uncertainty: false,
                callable: Arc::new(|_inputs, _flags| Ok(UncertainValue::nan())),
            })
            .unwrap();
        let sr = SubRecord::new();
        let outcome = registry.execute("p", "bad", &ExecutionContext::Layer(&sr), true);
        assert!(matches!(outcome.result, Err(Failure::NumericalFailure)));
    }

    #[test]
    fn duplicate_method_registration_fails() {
        let mut registry = MethodRegistry::new();
        registry
            .register(make_spec("p", "m", vec![], IndexMap::new()))
            .unwrap();
        let err = registry
            .register(make_spec("p", "m", vec![], IndexMap::new()))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateMethod {
                parameter: "p".into(),
                method_id: "m".into()
            }
        );
    }
}
