//! Index-based directed graph for one cluster
//!
//! Layout phases work on dense indices instead of string ids. Index `i`
//! always refers to `cluster.nodes[i]`.

use std::collections::HashMap;
use tracing::trace;

use super::Cluster;

/// Adjacency lists of a cluster, restricted to its member nodes
#[derive(Debug, Clone, Default)]
pub struct ClusterGraph {
    predecessors: Vec<Vec<usize>>,
    successors: Vec<Vec<usize>>,
}

impl ClusterGraph {
    /// Build the graph of a cluster
    ///
    /// Self-loops and edges leaving the cluster carry no ordering
    /// information and are left out.
    pub fn from_cluster(cluster: &Cluster) -> Self {
        let index: HashMap<&str, usize> = cluster
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), i))
            .collect();

        let mut graph = Self::with_nodes(cluster.nodes.len());
        for edge in &cluster.edges {
            match (index.get(edge.source.as_str()), index.get(edge.target.as_str())) {
                (Some(&s), Some(&t)) if s != t => graph.add_edge(s, t),
                (Some(_), Some(_)) => trace!(edge_id = %edge.id, "Skipping self-loop"),
                _ => trace!(edge_id = %edge.id, "Skipping edge leaving the cluster"),
            }
        }
        graph
    }

    /// A graph with `count` nodes and no edges
    pub fn with_nodes(count: usize) -> Self {
        Self {
            predecessors: vec![Vec::new(); count],
            successors: vec![Vec::new(); count],
        }
    }

    pub fn add_edge(&mut self, source: usize, target: usize) {
        self.successors[source].push(target);
        self.predecessors[target].push(source);
    }

    pub fn len(&self) -> usize {
        self.predecessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predecessors.is_empty()
    }

    pub fn predecessors(&self, node: usize) -> &[usize] {
        &self.predecessors[node]
    }

    pub fn successors(&self, node: usize) -> &[usize] {
        &self.successors[node]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Edge, Node, NodeType};

    #[test]
    fn test_from_cluster_skips_self_loops_and_outside_edges() {
        let cluster = Cluster {
            anchor: "a".to_string(),
            nodes: vec![
                Node::new("a", "A", NodeType::Person),
                Node::new("b", "B", NodeType::Email),
            ],
            edges: vec![
                Edge::new("r1", "a", "b", ""),
                Edge::new("r2", "a", "a", ""),
                Edge::new("r3", "a", "elsewhere", ""),
            ],
        };
        let graph = ClusterGraph::from_cluster(&cluster);

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.successors(0), &[1]);
        assert_eq!(graph.predecessors(1), &[0]);
        assert!(graph.predecessors(0).is_empty());
    }
}
