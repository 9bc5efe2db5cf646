// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Construction-time faults for [`crate::registry::MethodRegistry`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("method '{method_id}' is already registered for parameter '{parameter}'")]
    DuplicateMethod { parameter: String, method_id: String },
}
