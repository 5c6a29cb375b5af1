//! Cluster partitioning
//!
//! Groups edges by an anchor key and gathers the nodes those edges touch.
//! Each resulting cluster is laid out on its own and later composed onto the
//! shared canvas.
//!
//! The default key is the edge source. Grouping by source does not produce a
//! disjoint partition of the node set: a node that is the target in one group
//! and the source of another appears in both. [`Membership`] decides whether
//! that duplication is kept.

use std::collections::{HashMap, HashSet};
use tracing::{debug, span, trace, Level};

use super::{GraphDatabase, Membership, PartitionStrategy};
use crate::core::{Database, Edge, Node};

/// Anchor used by [`PartitionStrategy::Single`]
pub const SINGLE_CLUSTER_ANCHOR: &str = "graph";

/// Chooses the cluster an edge belongs to
pub trait PartitionKey {
    /// The anchor key for this edge
    fn key(&self, edge: &Edge) -> String;
}

impl PartitionKey for PartitionStrategy {
    fn key(&self, edge: &Edge) -> String {
        match self {
            PartitionStrategy::Source => edge.source.clone(),
            PartitionStrategy::Target => edge.target.clone(),
            PartitionStrategy::Label => edge.label.clone(),
            PartitionStrategy::Single => SINGLE_CLUSTER_ANCHOR.to_string(),
        }
    }
}

impl<F> PartitionKey for F
where
    F: Fn(&Edge) -> String,
{
    fn key(&self, edge: &Edge) -> String {
        self(edge)
    }
}

/// A group of edges sharing an anchor, plus the nodes they reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// Key shared by every edge in the cluster
    pub anchor: String,
    /// Member nodes in document order
    pub nodes: Vec<Node>,
    /// Edges in document order
    pub edges: Vec<Edge>,
}

impl Cluster {
    fn new(anchor: String) -> Self {
        Self {
            anchor,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }
}

/// Split a database into clusters
///
/// Clusters come out in first-seen-edge order of their anchors. Nodes that no
/// edge references end up in no cluster.
pub fn partition(
    database: &GraphDatabase,
    key: &dyn PartitionKey,
    membership: Membership,
) -> Vec<Cluster> {
    let partition_span = span!(
        Level::DEBUG,
        "partition",
        node_count = database.node_count(),
        edge_count = database.edge_count(),
        membership = ?membership
    );
    let _enter = partition_span.enter();

    let mut clusters: Vec<Cluster> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for edge in database.edges() {
        let anchor = key.key(edge);
        let slot = *index.entry(anchor.clone()).or_insert_with(|| {
            trace!(anchor = %anchor, "New cluster");
            clusters.push(Cluster::new(anchor.clone()));
            clusters.len() - 1
        });
        clusters[slot].edges.push(edge.clone());
    }

    for cluster in &mut clusters {
        let referenced: HashSet<&str> = cluster
            .edges
            .iter()
            .flat_map(|e| [e.source.as_str(), e.target.as_str()])
            .collect();
        cluster.nodes = database
            .nodes()
            .filter(|n| referenced.contains(n.id.as_str()))
            .cloned()
            .collect();
    }

    if membership == Membership::FirstCluster {
        let mut placed: HashSet<String> = HashSet::new();
        for cluster in &mut clusters {
            cluster.nodes.retain(|n| placed.insert(n.id.clone()));
        }
    }

    debug!(cluster_count = clusters.len(), "Partitioned graph");
    clusters
}
