//! Graph database implementation
//!
//! Stores the entities and relationships of one loaded document. Insertion
//! order is preserved for deterministic layout, and referential integrity is
//! enforced on every insert.

use std::collections::{HashMap, HashSet};
use tracing::{debug, trace, warn};

use super::GraphDocument;
use crate::core::{Database, Edge, GraphError, IntegrityIssue, Node};

/// Graph database implementation
///
/// Holds nodes indexed by id plus their insertion order, and edges in
/// insertion order. An edge is only accepted when both endpoints exist.
#[derive(Debug, Default, Clone)]
pub struct GraphDatabase {
    /// Nodes indexed by ID
    nodes: HashMap<String, Node>,
    /// Node IDs in insertion order (for deterministic iteration)
    node_order: Vec<String>,
    /// Edges in insertion order
    edges: Vec<Edge>,
    /// Edge IDs seen so far
    edge_ids: HashSet<String>,
}

impl GraphDatabase {
    /// Create a new empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a database from a parsed document
    ///
    /// Nodes are inserted before edges so that edge order in the document
    /// does not matter. Elements that break integrity are dropped, logged,
    /// and returned alongside the database.
    pub fn from_document(document: GraphDocument) -> (Self, Vec<IntegrityIssue>) {
        Self::from_parts(document.nodes, document.edges)
    }

    /// Build a database from loose node and edge lists
    pub fn from_parts(
        nodes: impl IntoIterator<Item = Node>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> (Self, Vec<IntegrityIssue>) {
        let mut db = Self::new();
        let mut issues = Vec::new();

        for node in nodes {
            if let Err(GraphError::Integrity { issue }) = db.add_node(node) {
                warn!(%issue, "Dropping node");
                issues.push(issue);
            }
        }
        for edge in edges {
            if let Err(GraphError::Integrity { issue }) = db.add_edge(edge) {
                warn!(%issue, "Dropping edge");
                issues.push(issue);
            }
        }

        debug!(
            node_count = db.node_count(),
            edge_count = db.edge_count(),
            dropped = issues.len(),
            "Database built"
        );
        (db, issues)
    }

    /// Check if a node exists
    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// IDs of nodes no edge refers to, in insertion order
    pub fn orphan_ids(&self) -> Vec<&str> {
        let referenced: HashSet<&str> = self
            .edges
            .iter()
            .flat_map(|e| [e.source.as_str(), e.target.as_str()])
            .collect();
        self.node_order
            .iter()
            .map(|id| id.as_str())
            .filter(|id| !referenced.contains(id))
            .collect()
    }

    /// Add a node built from its parts
    pub fn add_simple_node(
        &mut self,
        id: &str,
        label: &str,
        node_type: crate::core::NodeType,
    ) -> Result<(), GraphError> {
        self.add_node(Node::new(id, label, node_type))
    }

    /// Add an edge built from its parts
    pub fn add_simple_edge(
        &mut self,
        id: &str,
        source: &str,
        target: &str,
        label: &str,
    ) -> Result<(), GraphError> {
        self.add_edge(Edge::new(id, source, target, label))
    }
}

impl Database for GraphDatabase {
    type Node = Node;
    type Edge = Edge;

    fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        trace!(node_id = %node.id, node_type = %node.node_type, "Adding node to database");
        if self.nodes.contains_key(&node.id) {
            return Err(IntegrityIssue::DuplicateNode { node_id: node.id }.into());
        }
        self.node_order.push(node.id.clone());
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        trace!(
            edge_id = %edge.id,
            source = %edge.source,
            target = %edge.target,
            label = %edge.label,
            "Adding edge to database"
        );
        if self.edge_ids.contains(&edge.id) {
            return Err(IntegrityIssue::DuplicateEdge { edge_id: edge.id }.into());
        }
        for endpoint in [&edge.source, &edge.target] {
            if !self.nodes.contains_key(endpoint) {
                return Err(IntegrityIssue::DanglingEdge {
                    edge_id: edge.id.clone(),
                    missing_node: endpoint.clone(),
                }
                .into());
            }
        }
        self.edge_ids.insert(edge.id.clone());
        self.edges.push(edge);
        Ok(())
    }

    fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.node_order.iter().filter_map(|id| self.nodes.get(id))
    }

    fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.node_order.clear();
        self.edges.clear();
        self.edge_ids.clear();
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NodeType;

    fn person(id: &str) -> Node {
        Node::new(id, id, NodeType::Person)
    }

    #[test]
    fn test_nodes_keep_insertion_order() {
        let mut db = GraphDatabase::new();
        db.add_node(person("z")).unwrap();
        db.add_node(person("a")).unwrap();
        db.add_node(person("m")).unwrap();

        let ids: Vec<&str> = db.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut db = GraphDatabase::new();
        db.add_node(person("a")).unwrap();
        let err = db.add_node(Node::new("a", "Other", NodeType::Email)).unwrap_err();
        assert!(matches!(
            err,
            GraphError::Integrity {
                issue: IntegrityIssue::DuplicateNode { .. }
            }
        ));
        assert_eq!(db.get_node("a").unwrap().node_type, NodeType::Person);
        assert_eq!(db.node_count(), 1);
    }

    #[test]
    fn test_dangling_edge_rejected() {
        let mut db = GraphDatabase::new();
        db.add_node(person("a")).unwrap();
        let err = db.add_simple_edge("r1", "a", "ghost", "knows").unwrap_err();
        match err {
            GraphError::Integrity {
                issue:
                    IntegrityIssue::DanglingEdge {
                        edge_id,
                        missing_node,
                    },
            } => {
                assert_eq!(edge_id, "r1");
                assert_eq!(missing_node, "ghost");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(db.edge_count(), 0);
    }

    #[test]
    fn test_duplicate_edge_rejected() {
        let mut db = GraphDatabase::new();
        db.add_node(person("a")).unwrap();
        db.add_node(person("b")).unwrap();
        db.add_simple_edge("r1", "a", "b", "knows").unwrap();
        assert!(db.add_simple_edge("r1", "b", "a", "knows").is_err());
        assert_eq!(db.edge_count(), 1);
    }

    #[test]
    fn test_from_parts_collects_issues() {
        let nodes = vec![person("a"), person("b"), person("a")];
        let edges = vec![
            Edge::new("r1", "a", "b", "knows"),
            Edge::new("r2", "a", "missing", "knows"),
        ];
        let (db, issues) = GraphDatabase::from_parts(nodes, edges);

        assert_eq!(db.node_count(), 2);
        assert_eq!(db.edge_count(), 1);
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_from_document_accepts_clean_graph() {
        let document = GraphDocument {
            nodes: vec![person("a"), person("b")],
            edges: vec![Edge::new("r1", "a", "b", "")],
        };
        let (db, issues) = GraphDatabase::from_document(document);
        assert!(issues.is_empty());
        assert_eq!(db.edge_count(), 1);
    }

    #[test]
    fn test_orphan_ids() {
        let mut db = GraphDatabase::new();
        db.add_node(person("a")).unwrap();
        db.add_node(person("lonely")).unwrap();
        db.add_node(person("b")).unwrap();
        db.add_simple_edge("r1", "a", "b", "").unwrap();

        assert_eq!(db.orphan_ids(), vec!["lonely"]);
    }

    #[test]
    fn test_clear() {
        let mut db = GraphDatabase::new();
        db.add_node(person("a")).unwrap();
        db.add_simple_edge("r1", "a", "a", "").unwrap();
        db.clear();
        assert_eq!(db.node_count(), 0);
        assert_eq!(db.edge_count(), 0);
        db.add_simple_edge("r1", "a", "a", "").unwrap_err();
    }
}
