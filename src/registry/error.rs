// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! [`MethodFailure`], the type a registered callable returns on a
//! domain/calculation failure. Distinct from [`crate::errors::Failure`],
//! the richer, orchestrator-facing failure taxonomy that wraps (among
//! other things) a caught `MethodFailure`'s reason string.

/// What a user-supplied callable returns on a domain/calculation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodFailure {
    pub reason: String,
}

impl MethodFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for MethodFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}
