//! Core type definitions for graph layout
//!
//! This module contains the fundamental types used throughout peoplegraph:
//! entity types, attachment sides, and the node/edge records loaded from a
//! graph document.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of entity a node represents
///
/// The type only drives presentation (color, icon). Layout never looks at it.
/// Any string that is not a known kind maps to [`NodeType::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    /// A natural person
    Person,
    /// An email address
    Email,
    /// An internet domain
    Domain,
    /// A company or organization
    Company,
    /// A social media handle
    Social,
    /// A risk indicator attached to another entity
    Risk,
    /// Anything not covered above
    #[default]
    Unknown,
}

impl NodeType {
    /// Resolve a loosely typed string into a node type
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "person" => NodeType::Person,
            "email" => NodeType::Email,
            "domain" => NodeType::Domain,
            "company" => NodeType::Company,
            "social" => NodeType::Social,
            "risk" => NodeType::Risk,
            _ => NodeType::Unknown,
        }
    }

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Person => "person",
            NodeType::Email => "email",
            NodeType::Domain => "domain",
            NodeType::Company => "company",
            NodeType::Social => "social",
            NodeType::Risk => "risk",
            NodeType::Unknown => "unknown",
        }
    }
}

impl From<String> for NodeType {
    fn from(value: String) -> Self {
        NodeType::parse(&value)
    }
}

impl From<NodeType> for String {
    fn from(value: NodeType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Side of a node box where edges attach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Top => write!(f, "top"),
            Side::Bottom => write!(f, "bottom"),
        }
    }
}

/// An entity in the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for the node
    pub id: String,
    /// Display label
    pub label: String,
    /// Entity kind, used for styling only
    #[serde(rename = "type", default)]
    pub node_type: NodeType,
}

impl Node {
    /// Create a new node
    pub fn new(id: impl Into<String>, label: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            node_type,
        }
    }
}

/// A directed relationship between two entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier for the edge
    pub id: String,
    /// Source node ID
    pub source: String,
    /// Target node ID
    pub target: String,
    /// Relationship label, e.g. "owns"
    #[serde(default)]
    pub label: String,
}

impl Edge {
    /// Create a new edge
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: label.into(),
        }
    }

    /// Returns true if the edge points back at its own source
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// A point on the global canvas
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
