// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Faults raised while turning a declarative [`crate::config::GraphConfig`]
/// / [`crate::config::RegistryConfig`] into a sealed [`crate::graph::Graph`]
/// and a [`crate::registry::MethodRegistry`].
///
/// Unlike [`crate::errors::GraphError`] (one fault, stop immediately),
/// `build_graph` accumulates every `ConfigError` it finds and returns them
/// all at once — same shape as the house's `Vec<ValidationError>` from
/// `config::validate_dependency_graph`, so a config author sees every
/// problem in one pass instead of fixing issues one at a time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("failed to read config file: {reason}")]
    Io { reason: String },

    #[error("failed to parse config: {reason}")]
    Parse { reason: String },

    #[error(transparent)]
    Graph(#[from] crate::errors::GraphError),

    #[error(transparent)]
    Registry(#[from] crate::errors::RegistryError),

    #[error("node '{node}' references undeclared method callable '{method_id}'")]
    UnboundMethod { node: String, method_id: String },
}
