// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// The label carried by a directed edge: either a pass-through marker or a
/// method identifier. Two edges between the same `(source, target)` pair
/// with different method identifiers are distinct edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdgeLabel {
    DataFlow,
    Method(String),
}

impl EdgeLabel {
    pub fn method_id(&self) -> Option<&str> {
        match self {
            EdgeLabel::DataFlow => None,
            EdgeLabel::Method(id) => Some(id.as_str()),
        }
    }
}

impl fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeLabel::DataFlow => write!(f, "DataFlow"),
            EdgeLabel::Method(id) => write!(f, "Method({id})"),
        }
    }
}

/// An edge as returned from the public query API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub label: EdgeLabel,
}
