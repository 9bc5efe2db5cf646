// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The error taxonomy for this crate, mirrored one-to-one on the kinds
//! enumerated in the construction-time-fault / trace-level-failure table:
//! every "immediate fault" kind gets a `thiserror`-derived enum variant
//! here; every trace-level failure kind lives in [`failure::Failure`]
//! instead, since those are values stored on a [`crate::orchestrator::ComputationTrace`]
//! rather than ever returned as an `Err`.
//!
//! Organized by subsystem, same as the rest of this crate:
//! * `graph` - construction- and seal-time faults for [`crate::graph::Graph`]
//! * `registry` - construction-time faults for [`crate::registry::MethodRegistry`]
//! * `engine` - immediate faults for [`crate::orchestrator::Engine`]
//! * `failure` - trace-level, non-fatal failure kinds
//! * `config` - declarative graph/registry construction faults

mod config;
mod engine;
mod failure;
mod graph;
mod registry;

pub use config::ConfigError;
pub use engine::EngineError;
pub use failure::Failure;
pub use graph::GraphError;
pub use registry::RegistryError;
