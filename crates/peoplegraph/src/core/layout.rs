//! Core layout trait for graph positioning
//!
//! This trait defines the interface for arranging graph elements in a
//! coordinate system, in the spirit of Dagre-style layered layouts.

use anyhow::Result;

use super::Database;

/// Core trait for layout algorithms
///
/// A layout algorithm reads a database and produces positioned output. The
/// output type is left to the implementation so that alternative layouts can
/// expose their own metadata.
///
/// # Example
/// ```
/// use peoplegraph::core::{Database, LayoutAlgorithm};
/// use peoplegraph::graph::{GraphDatabase, GraphLayoutEngine};
///
/// let db = GraphDatabase::new();
/// let engine = GraphLayoutEngine::new();
/// let layout = engine.layout(&db).unwrap();
/// assert!(layout.nodes.is_empty());
/// ```
pub trait LayoutAlgorithm<D: Database>: Send + Sync {
    /// The output type of this layout algorithm
    type Output;

    /// Arrange elements in the database using this layout algorithm
    fn layout(&self, database: &D) -> Result<Self::Output>;

    /// Get the name of this layout algorithm
    fn name(&self) -> &'static str;

    /// Get the version of this layout algorithm
    fn version(&self) -> &'static str;

    /// Get the layout direction (TB, LR, etc.)
    fn direction(&self) -> &'static str;
}
