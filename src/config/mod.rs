// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Declarative construction of a [`crate::graph::Graph`] and
//! [`crate::registry::MethodRegistry`] from YAML, for callers who'd rather
//! describe the DAG's topology in a config file than call the builder API
//! directly.
//!
//! Node/edge topology and method metadata (required inputs, domain tables,
//! level) are entirely data and so are deserialized straight off the YAML.
//! The callables themselves are not: a `Fn(&MethodInputs, bool) -> ...`
//! can't be named in a config file, so [`build_registry`] takes a map of
//! them keyed by `(parameter, method_id)` supplied by the embedding
//! application, and reports any method the config declares that the map
//! doesn't cover as [`crate::errors::ConfigError::UnboundMethod`].

mod graph_builder;
mod loader;
mod registry_builder;

pub use graph_builder::build_graph;
pub use loader::{
    DomainTableConfig, EdgeConfig, GraphConfig, LevelConfig, MethodConfig, NodeConfig,
    NodeKindConfig, RegistryConfig, load_graph_config, load_registry_config,
};
pub use registry_builder::build_registry;
