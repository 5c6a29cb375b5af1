//! Graph layout engine
//!
//! Runs the full pipeline: partition the database into clusters, lay each
//! cluster out hierarchically, then compose the clusters onto one canvas.

use anyhow::Result;
use tracing::{debug, info, span, Level};

use super::partition::{partition, PartitionKey};
use super::{CanvasComposer, GraphDatabase, GraphLayout, HierarchicalLayout, LayoutConfig};
use crate::core::{Database, Edge, LayoutAlgorithm, Node};

/// Clustered hierarchical layout
#[derive(Debug, Clone, Default)]
pub struct GraphLayoutEngine {
    config: LayoutConfig,
}

impl GraphLayoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out a database, grouping edges with a custom key
    ///
    /// The report carries orphans and cycle warnings. Integrity issues are
    /// only known to whoever built the database.
    pub fn layout_with_key(&self, database: &GraphDatabase, key: &dyn PartitionKey) -> GraphLayout {
        let layout_span = span!(
            Level::INFO,
            "layout_graph",
            node_count = database.node_count(),
            edge_count = database.edge_count()
        );
        let _enter = layout_span.enter();

        let clusters = partition(database, key, self.config.membership);

        let hierarchy = HierarchicalLayout::new(self.config.clone());
        let layouts: Vec<_> = clusters.iter().map(|c| hierarchy.layout_cluster(c)).collect();
        debug!(cluster_count = layouts.len(), "Laid out clusters");

        let mut layout = CanvasComposer::new(self.config.clone()).compose(&layouts);
        layout.report.cycle_warnings = layouts.into_iter().flat_map(|l| l.cycles).collect();
        layout.report.orphans = database.orphan_ids().into_iter().map(str::to_string).collect();

        info!(
            node_count = layout.nodes.len(),
            edge_count = layout.edges.len(),
            cluster_count = layout.clusters.len(),
            width = layout.width,
            height = layout.height,
            "Layout completed"
        );
        layout
    }
}

impl LayoutAlgorithm<GraphDatabase> for GraphLayoutEngine {
    type Output = GraphLayout;

    fn layout(&self, database: &GraphDatabase) -> Result<Self::Output> {
        self.config.validate()?;
        Ok(self.layout_with_key(database, &self.config.partition))
    }

    fn name(&self) -> &'static str {
        "hierarchical"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn direction(&self) -> &'static str {
        "TB"
    }
}

/// Lay out loose nodes and edges
///
/// Duplicate ids and dangling edges are dropped and listed in the report;
/// the rest of the graph still lays out.
pub fn layout(nodes: &[Node], edges: &[Edge], config: &LayoutConfig) -> GraphLayout {
    layout_with_key(nodes, edges, config, &config.partition)
}

/// Lay out loose nodes and edges, grouping edges with a custom key
pub fn layout_with_key(
    nodes: &[Node],
    edges: &[Edge],
    config: &LayoutConfig,
    key: &dyn PartitionKey,
) -> GraphLayout {
    let (database, issues) =
        GraphDatabase::from_parts(nodes.iter().cloned(), edges.iter().cloned());
    let mut layout = GraphLayoutEngine::with_config(config.clone()).layout_with_key(&database, key);
    layout.report.integrity_issues = issues;
    layout
}
