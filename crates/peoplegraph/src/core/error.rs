//! Core error types for graph loading and layout
//!
//! Fetch and parse failures are terminal for one load attempt. Integrity
//! problems are recorded and the offending element is dropped. Cycles are
//! warnings and never fail a layout.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A data-integrity problem found while ingesting a graph document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityIssue {
    /// An edge endpoint references a node id that does not exist
    DanglingEdge {
        edge_id: String,
        missing_node: String,
    },
    /// A second node was declared with an id already in use
    DuplicateNode { node_id: String },
    /// A second edge was declared with an id already in use
    DuplicateEdge { edge_id: String },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::DanglingEdge {
                edge_id,
                missing_node,
            } => write!(
                f,
                "edge '{}' references missing node '{}'",
                edge_id, missing_node
            ),
            IntegrityIssue::DuplicateNode { node_id } => {
                write!(f, "duplicate node id '{}'", node_id)
            }
            IntegrityIssue::DuplicateEdge { edge_id } => {
                write!(f, "duplicate edge id '{}'", edge_id)
            }
        }
    }
}

/// A back edge found while ranking a cluster
///
/// The edge is ignored for rank assignment; layout carries on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleWarning {
    /// Anchor of the cluster the cycle was found in
    pub cluster: String,
    /// Source of the back edge
    pub source: String,
    /// Target of the back edge
    pub target: String,
}

impl fmt::Display for CycleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cycle in cluster '{}': back edge {} -> {} ignored for ranking",
            self.cluster, self.source, self.target
        )
    }
}

/// Errors raised while loading a graph
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Fetch error from {source_name}: {message}")]
    Fetch {
        source_name: String,
        message: String,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        /// Raw document body, kept for diagnostics
        body: String,
    },

    #[error("Integrity error: {issue}")]
    Integrity { issue: IntegrityIssue },

    #[error("Config error: {message}")]
    Config { message: String },
}

impl GraphError {
    /// Create a new fetch error
    pub fn fetch_error(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create a new parse error, keeping the offending body
    pub fn parse_error(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: body.into(),
        }
    }

    /// Create a new config error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns true for failures to retrieve the document at all
    pub fn is_fetch(&self) -> bool {
        matches!(self, GraphError::Fetch { .. })
    }

    /// Returns true for documents that arrived but could not be understood
    pub fn is_parse(&self) -> bool {
        matches!(self, GraphError::Parse { .. })
    }

    /// The raw body of a document that failed to parse
    pub fn body(&self) -> Option<&str> {
        match self {
            GraphError::Parse { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl From<IntegrityIssue> for GraphError {
    fn from(issue: IntegrityIssue) -> Self {
        GraphError::Integrity { issue }
    }
}
