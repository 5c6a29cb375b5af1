//! Peoplegraph - Lay out entity relationship graphs
//!
//! A library for arranging investigation graphs (people, emails, domains,
//! companies, social handles, risks) as clustered top-to-bottom hierarchies
//! on one shared canvas.
//!
//! # Quick Start
//!
//! ```rust
//! use peoplegraph::layout_json;
//!
//! let input = r#"{
//!     "nodes": [{"id": "p1", "label": "Alice", "type": "person"},
//!               {"id": "e1", "label": "alice@example.com", "type": "email"}],
//!     "edges": [{"id": "r1", "source": "p1", "target": "e1", "label": "owns"}]
//! }"#;
//! let layout = layout_json(input).unwrap();
//! assert_eq!(layout.nodes.len(), 2);
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use the individual components:
//!
//! ```rust
//! use peoplegraph::prelude::*;
//!
//! let mut database = GraphDatabase::new();
//! database.add_simple_node("p1", "Alice", NodeType::Person).unwrap();
//! database.add_simple_node("c1", "Acme", NodeType::Company).unwrap();
//! database.add_simple_edge("r1", "p1", "c1", "works_at").unwrap();
//!
//! let engine = GraphLayoutEngine::with_config(LayoutConfig {
//!     partition: PartitionStrategy::Single,
//!     ..LayoutConfig::default()
//! });
//! let layout = engine.layout(&database).unwrap();
//! assert_eq!(layout.clusters.len(), 1);
//! ```

pub mod core;
pub mod graph;

pub use crate::core::*;
pub use crate::graph::{layout, GraphDocument, GraphLayout, GraphLayoutEngine, LayoutConfig};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        CycleWarning, Database, Edge, GraphError, IntegrityIssue, LayoutAlgorithm, Node,
        NodeType, Point, Side,
    };
    pub use crate::graph::{
        CanvasComposer, Cluster, ClusterBounds, DocumentSource, FileSource, GraphDatabase,
        GraphDocument, GraphLayout, GraphLayoutEngine, GraphView, HierarchicalLayout, Interest,
        LayoutConfig, LayoutReport, LoadOutcome, Membership, PartitionKey, PartitionStrategy,
        PositionedEdge, PositionedNode, StaticSource, StdinSource,
    };
}

/// Lay out a JSON graph document with the default configuration
///
/// # Example
/// ```rust
/// use peoplegraph::layout_json;
///
/// let layout = layout_json(r#"{"nodes": [], "edges": []}"#).unwrap();
/// assert!(layout.is_empty());
/// ```
pub fn layout_json(input: &str) -> Result<GraphLayout, GraphError> {
    layout_json_with_config(input, &LayoutConfig::default())
}

/// Lay out a JSON graph document with a specific configuration
pub fn layout_json_with_config(
    input: &str,
    config: &LayoutConfig,
) -> Result<GraphLayout, GraphError> {
    let document = GraphDocument::from_json(input)?;
    Ok(layout(&document.nodes, &document.edges, config))
}

/// Parse a JSON graph document into a database without laying it out
///
/// Dropped elements are returned alongside the database.
///
/// # Example
/// ```rust
/// use peoplegraph::parse;
/// use peoplegraph::prelude::Database;
///
/// let (db, issues) = parse(r#"{"nodes": [{"id": "a", "label": "A", "type": "person"}],
///                              "edges": [{"id": "r", "source": "a", "target": "b"}]}"#).unwrap();
/// assert_eq!(db.node_count(), 1);
/// assert_eq!(db.edge_count(), 0);
/// assert_eq!(issues.len(), 1);
/// ```
pub fn parse(input: &str) -> Result<(graph::GraphDatabase, Vec<IntegrityIssue>), GraphError> {
    let document = GraphDocument::from_json(input)?;
    Ok(graph::GraphDatabase::from_document(document))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_json() {
        let input = r#"{
            "nodes": [{"id": "a", "label": "A", "type": "person"},
                      {"id": "b", "label": "B", "type": "email"}],
            "edges": [{"id": "r", "source": "a", "target": "b", "label": "owns"}]
        }"#;
        let layout = layout_json(input).unwrap();
        assert_eq!(layout.nodes.len(), 2);
        assert_eq!(layout.edges.len(), 1);
    }

    #[test]
    fn test_layout_json_rejects_garbage() {
        let err = layout_json("<html>").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_layout_json_with_config() {
        let config = LayoutConfig {
            node_width: 100.0,
            ..LayoutConfig::default()
        };
        let input = r#"{"nodes": [{"id": "a", "label": "A", "type": "person"}],
                        "edges": [{"id": "r", "source": "a", "target": "a"}]}"#;
        let layout = layout_json_with_config(input, &config).unwrap();
        assert_eq!(layout.nodes[0].width, 100.0);
    }

    #[test]
    fn test_parse_reports_issues() {
        let (db, issues) = parse(
            r#"{"nodes": [{"id": "a", "label": "A", "type": "person"},
                          {"id": "a", "label": "A again", "type": "person"}],
                "edges": []}"#,
        )
        .unwrap();
        assert_eq!(db.node_count(), 1);
        assert_eq!(issues.len(), 1);
    }
}
