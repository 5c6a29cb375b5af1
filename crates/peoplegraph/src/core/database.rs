//! Core database trait for graph data storage
//!
//! This trait defines the interface for storing the nodes and edges of a
//! loaded graph document.

use super::GraphError;

/// Core trait for graph databases
///
/// A database owns the nodes and edges of exactly one loaded document and
/// keeps them in insertion order so that everything derived from it is
/// deterministic. Implementations reject elements that would break
/// referential integrity instead of storing them.
pub trait Database: Send + Sync {
    /// The node data type for this database
    type Node: Clone + Send + Sync;

    /// The edge data type for this database
    type Edge: Clone + Send + Sync;

    /// Add a node to the database
    fn add_node(&mut self, node: Self::Node) -> Result<(), GraphError>;

    /// Add an edge to the database
    fn add_edge(&mut self, edge: Self::Edge) -> Result<(), GraphError>;

    /// Get a node by ID
    fn get_node(&self, id: &str) -> Option<&Self::Node>;

    /// Iterate over all nodes in insertion order
    fn nodes(&self) -> impl Iterator<Item = &Self::Node>;

    /// Iterate over all edges in insertion order
    fn edges(&self) -> impl Iterator<Item = &Self::Edge>;

    /// Clear all data from the database
    fn clear(&mut self);

    /// Get the number of nodes
    fn node_count(&self) -> usize;

    /// Get the number of edges
    fn edge_count(&self) -> usize;
}
