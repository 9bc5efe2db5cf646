// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::loader::{DomainTableConfig, MethodConfig, RegistryConfig};
use crate::errors::ConfigError;
use crate::registry::{Callable, DomainTable, MethodRegistry, MethodSpec};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Build a [`MethodRegistry`] from a [`RegistryConfig`] plus the callables
/// the config declares by `(parameter, method_id)`.
///
/// A `callable` can't be named in YAML, so the config only carries a
/// method's metadata; any method the config declares without a matching
/// entry in `callables` is reported as
/// [`crate::errors::ConfigError::UnboundMethod`] rather than silently
/// skipped or stubbed, so a misconfigured deployment fails at startup
/// instead of at first use.
pub fn build_registry(
    cfg: &RegistryConfig,
    callables: &HashMap<(String, String), Callable>,
) -> Result<MethodRegistry, Vec<ConfigError>> {
    let mut registry = MethodRegistry::new();
    let mut errors = Vec::new();

    for method in &cfg.methods {
        let key = (method.parameter.clone(), method.method_id.clone());
        let Some(callable) = callables.get(&key) else {
            errors.push(ConfigError::UnboundMethod {
                node: method.parameter.clone(),
                method_id: method.method_id.clone(),
            });
            continue;
        };

        let spec = MethodSpec {
            parameter: method.parameter.clone(),
            method_id: method.method_id.clone(),
            level: method.level.into(),
            required_inputs: method.required_inputs.clone(),
            domain_tables: domain_tables(method),
            supports_method_uncertainty: method.supports_method_uncertainty,
            callable: callable.clone(),
        };

        if let Err(e) = registry.register(spec) {
            errors.push(e.into());
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(registry)
}

fn domain_tables(method: &MethodConfig) -> IndexMap<String, DomainTable> {
    method
        .domain_tables
        .iter()
        .map(|(name, table)| (name.clone(), domain_table(table)))
        .collect()
}

fn domain_table(cfg: &DomainTableConfig) -> DomainTable {
    DomainTable {
        specific: cfg.specific.iter().cloned().collect(),
        general: cfg.general.iter().cloned().collect(),
        prefix_len: cfg.prefix_len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::LevelConfig;
    use crate::registry::ExecutionContext;
    use crate::registry::ResolvedInput;
    use crate::record::SubRecord;
    use crate::registry::FieldValue;
    use crate::value::UncertainValue;
    use std::sync::Arc;

    fn sum_callable() -> Callable {
        Arc::new(|inputs, _flags| {
            let mut sum = UncertainValue::exact(0.0);
            for (_, v) in inputs {
                if let ResolvedInput::Single(FieldValue::Scalar(x)) = v {
                    sum = sum + *x;
                }
            }
            Ok(sum)
        })
    }

    fn method_config(parameter: &str, method_id: &str, required_inputs: Vec<&str>) -> MethodConfig {
        MethodConfig {
            parameter: parameter.to_string(),
            method_id: method_id.to_string(),
            level: LevelConfig::Layer,
            required_inputs: required_inputs.into_iter().map(String::from).collect(),
            domain_tables: HashMap::new(),
            supports_method_uncertainty: false,
        }
    }

    #[test]
    fn builds_a_registry_when_every_method_has_a_callable() {
        let cfg = RegistryConfig {
            methods: vec![method_config("p", "sum", vec!["a", "b"])],
        };
        let mut callables = HashMap::new();
        callables.insert(("p".to_string(), "sum".to_string()), sum_callable());

        let registry = build_registry(&cfg, &callables).unwrap();

        let mut sr = SubRecord::new();
        sr.set_raw("a", FieldValue::Scalar(UncertainValue::exact(1.0)));
        sr.set_raw("b", FieldValue::Scalar(UncertainValue::exact(2.0)));
        let outcome = registry.execute("p", "sum", &ExecutionContext::Layer(&sr), false);
        assert_eq!(outcome.result.unwrap().mean, 3.0);
    }

    #[test]
    fn missing_callable_is_reported_as_unbound_method() {
        let cfg = RegistryConfig {
            methods: vec![method_config("p", "sum", vec!["a"])],
        };
        let errors = build_registry(&cfg, &HashMap::new()).unwrap_err();
        assert_eq!(
            errors,
            vec![ConfigError::UnboundMethod {
                node: "p".to_string(),
                method_id: "sum".to_string(),
            }]
        );
    }

    #[test]
    fn duplicate_method_declaration_is_reported() {
        let cfg = RegistryConfig {
            methods: vec![
                method_config("p", "sum", vec!["a"]),
                method_config("p", "sum", vec!["a"]),
            ],
        };
        let mut callables = HashMap::new();
        callables.insert(("p".to_string(), "sum".to_string()), sum_callable());
        let errors = build_registry(&cfg, &callables).unwrap_err();
        assert_eq!(errors.len(), 1);
    }
}
