// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The method registry: `(parameter, method_id) -> MethodSpec` bindings
//! and the `execute` procedure that resolves inputs and invokes callables.
//! See `builder` for the execution algorithm's doc comment.

mod builder;
mod error;
mod spec;

pub use crate::errors::{Failure, RegistryError};
pub use builder::{ExecutionContext, MethodRegistry, RegistryOutcome};
pub use error::MethodFailure;
pub use spec::{Callable, DomainTable, FieldValue, MethodInputs, MethodSpec, ResolvedInput};
