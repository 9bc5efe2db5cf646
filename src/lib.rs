// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! A parameterization graph, pathway enumerator, and execution engine.
//!
//! A sealed [`graph::Graph`] describes how a target parameter can be
//! derived from raw fields through alternative methods. [`enumerator`]
//! walks that graph backward to enumerate every distinct derivation
//! pathway to a target. [`orchestrator::Engine`] then executes each
//! pathway against a [`record::Record`] through a [`registry::MethodRegistry`]
//! of registered callables, producing [`value::UncertainValue`] results
//! with quadrature-propagated uncertainty.
//!
//! [`config`] builds a `Graph`/`MethodRegistry` pair from a declarative
//! description instead of the builder API directly.

pub mod cache;
pub mod config;
pub mod enumerator;
pub mod errors;
pub mod graph;
pub mod observability;
pub mod orchestrator;
pub mod record;
pub mod registry;
pub mod value;
