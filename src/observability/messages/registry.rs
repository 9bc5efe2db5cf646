// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for method resolution and domain-fallback events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A categorical input resolved via the general-prefix fallback table
/// rather than an exact specific-code match.
///
/// # Log Level
/// `warn!`
pub struct DomainFallbackUsed<'a> {
    pub parameter: &'a str,
    pub method_id: &'a str,
    pub input_name: &'a str,
}

impl Display for DomainFallbackUsed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "'{}' resolved input '{}' for method '{}' via the general-prefix domain fallback",
            self.parameter, self.input_name, self.method_id
        )
    }
}

impl StructuredLog for DomainFallbackUsed<'_> {
    fn log(&self) {
        tracing::warn!(
            parameter = self.parameter,
            method_id = self.method_id,
            input_name = self.input_name,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "domain_fallback_used",
            span_name = name,
            parameter = self.parameter,
            method_id = self.method_id,
            input_name = self.input_name,
        )
    }
}

/// A method call failed with a trace-level, non-fatal failure.
///
/// # Log Level
/// `warn!`
pub struct MethodExecutionFailed<'a> {
    pub parameter: &'a str,
    pub method_id: &'a str,
    pub reason: &'a dyn std::error::Error,
}

impl Display for MethodExecutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "method '{}' for parameter '{}' failed: {}",
            self.method_id, self.parameter, self.reason
        )
    }
}

impl StructuredLog for MethodExecutionFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            parameter = self.parameter,
            method_id = self.method_id,
            reason = %self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "method_execution_failed",
            span_name = name,
            parameter = self.parameter,
            method_id = self.method_id,
            reason = %self.reason,
        )
    }
}
