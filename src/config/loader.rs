// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ConfigError;
use crate::graph::Level;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// The declarative topology for a [`crate::graph::Graph`]: every node and
/// edge the builder API would otherwise be called with directly.
///
/// # Example
/// ```yaml
/// nodes:
///   - name: S
///     kind: parameter
///   - name: density
///     kind: parameter
///     level: layer
///     cacheable: true
/// edges:
///   - source: S
///     target: density
///     method: geldsetzer
/// ```
#[derive(Debug, Deserialize)]
pub struct GraphConfig {
    pub nodes: Vec<NodeConfig>,
    pub edges: Vec<EdgeConfig>,
}

/// One node declaration. `level` is only meaningful (and required) for
/// `kind: parameter`; the node with no `level` at all is the graph's
/// source. `kind: merge` never takes a `level`.
#[derive(Debug, Deserialize)]
pub struct NodeConfig {
    pub name: String,
    pub kind: NodeKindConfig,
    #[serde(default)]
    pub level: Option<LevelConfig>,
    #[serde(default)]
    pub cacheable: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeKindConfig {
    Parameter,
    Merge,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LevelConfig {
    Layer,
    Slab,
}

impl From<LevelConfig> for Level {
    fn from(level: LevelConfig) -> Self {
        match level {
            LevelConfig::Layer => Level::Layer,
            LevelConfig::Slab => Level::Slab,
        }
    }
}

/// One edge declaration. A `method` names the method id and makes this a
/// `Method` edge; omitting it declares a `DataFlow` edge into a merge node.
#[derive(Debug, Deserialize)]
pub struct EdgeConfig {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub method: Option<String>,
}

/// The declarative method metadata for a [`crate::registry::MethodRegistry`].
/// Does not carry the callables themselves — see [`crate::config::build_registry`].
///
/// # Example
/// ```yaml
/// methods:
///   - parameter: density
///     method_id: geldsetzer
///     level: layer
///     required_inputs: [porosity, depth]
///     supports_method_uncertainty: true
/// ```
#[derive(Debug, Deserialize)]
pub struct RegistryConfig {
    pub methods: Vec<MethodConfig>,
}

#[derive(Debug, Deserialize)]
pub struct MethodConfig {
    pub parameter: String,
    pub method_id: String,
    pub level: LevelConfig,
    #[serde(default)]
    pub required_inputs: Vec<String>,
    #[serde(default)]
    pub domain_tables: std::collections::HashMap<String, DomainTableConfig>,
    #[serde(default)]
    pub supports_method_uncertainty: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct DomainTableConfig {
    #[serde(default)]
    pub specific: Vec<String>,
    #[serde(default)]
    pub general: Vec<String>,
    #[serde(default)]
    pub prefix_len: usize,
}

/// Load a [`GraphConfig`] from a YAML file.
pub fn load_graph_config<P: AsRef<Path>>(path: P) -> Result<GraphConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        reason: e.to_string(),
    })?;
    serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
        reason: e.to_string(),
    })
}

/// Load a [`RegistryConfig`] from a YAML file.
pub fn load_registry_config<P: AsRef<Path>>(path: P) -> Result<RegistryConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        reason: e.to_string(),
    })?;
    serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_yaml(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        write!(file, "{content}").expect("write temp file");
        file
    }

    #[test]
    fn loads_a_valid_graph_config_from_disk() {
        let file = write_yaml(
            r#"
nodes:
  - name: S
    kind: parameter
  - name: density
    kind: parameter
    level: layer
    cacheable: true
edges:
  - source: S
    target: density
    method: geldsetzer
"#,
        );
        let cfg = load_graph_config(file.path()).unwrap();
        assert_eq!(cfg.nodes.len(), 2);
        assert_eq!(cfg.edges.len(), 1);
        assert!(cfg.nodes[1].cacheable);
    }

    #[test]
    fn missing_graph_config_file_is_an_io_error() {
        let err = load_graph_config("/nonexistent/path/graph.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_graph_config_is_a_parse_error() {
        let file = write_yaml("not: [valid, - yaml: structure");
        let err = load_graph_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn loads_a_valid_registry_config_from_disk() {
        let file = write_yaml(
            r#"
methods:
  - parameter: density
    method_id: geldsetzer
    level: layer
    required_inputs: [porosity, depth]
    supports_method_uncertainty: true
"#,
        );
        let cfg = load_registry_config(file.path()).unwrap();
        assert_eq!(cfg.methods.len(), 1);
        assert_eq!(cfg.methods[0].required_inputs, vec!["porosity", "depth"]);
    }

    #[test]
    fn missing_registry_config_file_is_an_io_error() {
        let err = load_registry_config("/nonexistent/path/registry.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
