//! Canvas composition
//!
//! Places independently laid out clusters on one shared canvas. Each cluster
//! is shifted right by an advance that grows with its size and down by a
//! fixed stride, so bounding boxes never overlap.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, span, trace, warn, Level};

use super::{ClusterLayout, LayoutConfig, PositionedNode};
use crate::core::style::EDGE_COLOR;
use crate::core::{CycleWarning, Edge, IntegrityIssue, Point};

/// An edge with its attachment points on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
    /// Anchor of the cluster the edge belongs to
    pub cluster: String,
    pub color: String,
    /// Bottom center of the source box
    pub source_point: Point,
    /// Top center of the target box
    pub target_point: Point,
}

/// Where a cluster ended up on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterBounds {
    pub anchor: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rank_count: usize,
    pub max_rank_width: f64,
}

impl ClusterBounds {
    /// True if the two boxes share interior area
    pub fn intersects(&self, other: &ClusterBounds) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Diagnostics collected during one layout pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutReport {
    /// Elements dropped while building the database
    pub integrity_issues: Vec<IntegrityIssue>,
    /// Back edges ignored while ranking
    pub cycle_warnings: Vec<CycleWarning>,
    /// Nodes no edge refers to, left out of the layout
    pub orphans: Vec<String>,
}

impl LayoutReport {
    pub fn is_clean(&self) -> bool {
        self.integrity_issues.is_empty()
            && self.cycle_warnings.is_empty()
            && self.orphans.is_empty()
    }
}

/// A complete layout on the global canvas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphLayout {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<PositionedEdge>,
    pub clusters: Vec<ClusterBounds>,
    pub width: f64,
    pub height: f64,
    pub report: LayoutReport,
}

impl GraphLayout {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// All placements of a node id, one per cluster that laid it out
    pub fn placements<'a, 'b>(
        &'a self,
        id: &'b str,
    ) -> impl Iterator<Item = &'a PositionedNode> + 'b
    where
        'a: 'b,
    {
        self.nodes.iter().filter(move |n| n.id == id)
    }

    /// First placement of a node id
    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn cluster(&self, anchor: &str) -> Option<&ClusterBounds> {
        self.clusters.iter().find(|c| c.anchor == anchor)
    }
}

/// Running state of the composition fold
#[derive(Default)]
struct Canvas {
    offset_x: f64,
    offset_y: f64,
    nodes: Vec<PositionedNode>,
    clusters: Vec<ClusterBounds>,
    /// Start of each cluster's slice in `nodes`
    starts: Vec<usize>,
}

/// Places cluster layouts on one canvas
#[derive(Debug, Clone, Default)]
pub struct CanvasComposer {
    config: LayoutConfig,
}

impl CanvasComposer {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Horizontal advance after a cluster
    ///
    /// The size estimate alone can fall short of a wide cluster, so the
    /// cluster's own width plus the base gap is a lower bound.
    pub fn advance_x(&self, layout: &ClusterLayout) -> f64 {
        let estimate = self.config.cluster_advance_estimate(layout.nodes.len());
        estimate.max(layout.width + self.config.cluster_gap_base)
    }

    /// Translate every cluster onto the canvas and resolve edge endpoints
    pub fn compose(&self, layouts: &[ClusterLayout]) -> GraphLayout {
        let compose_span = span!(Level::DEBUG, "compose", cluster_count = layouts.len());
        let _enter = compose_span.enter();

        let canvas = layouts.iter().fold(Canvas::default(), |mut canvas, layout| {
            trace!(
                anchor = %layout.anchor,
                offset_x = canvas.offset_x,
                offset_y = canvas.offset_y,
                "Placing cluster"
            );
            canvas.starts.push(canvas.nodes.len());
            canvas.nodes.extend(
                layout
                    .nodes
                    .iter()
                    .map(|n| n.translated(canvas.offset_x, canvas.offset_y)),
            );
            canvas.clusters.push(ClusterBounds {
                anchor: layout.anchor.clone(),
                x: canvas.offset_x,
                y: canvas.offset_y,
                width: layout.width,
                height: layout.height,
                rank_count: layout.rank_count,
                max_rank_width: layout.max_rank_width,
            });
            canvas.offset_x += self.advance_x(layout);
            canvas.offset_y += self.config.cluster_vertical_stride;
            canvas
        });

        let edges = resolve_edges(layouts, &canvas);

        let width = canvas
            .clusters
            .iter()
            .map(|c| c.x + c.width)
            .fold(0.0, f64::max);
        let height = canvas
            .clusters
            .iter()
            .map(|c| c.y + c.height)
            .fold(0.0, f64::max);

        debug!(
            node_count = canvas.nodes.len(),
            edge_count = edges.len(),
            width,
            height,
            "Composed canvas"
        );

        GraphLayout {
            nodes: canvas.nodes,
            edges,
            clusters: canvas.clusters,
            width,
            height,
            report: LayoutReport::default(),
        }
    }
}

/// Attach every edge to its endpoint boxes
///
/// An endpoint is looked up in the edge's own cluster first, then in the
/// first cluster that placed that id.
fn resolve_edges(layouts: &[ClusterLayout], canvas: &Canvas) -> Vec<PositionedEdge> {
    let mut first_placed: HashMap<&str, &PositionedNode> = HashMap::new();
    for node in &canvas.nodes {
        first_placed.entry(node.id.as_str()).or_insert(node);
    }

    let mut edges = Vec::new();
    for (i, layout) in layouts.iter().enumerate() {
        let end = canvas.starts.get(i + 1).copied().unwrap_or(canvas.nodes.len());
        let own: HashMap<&str, &PositionedNode> = canvas.nodes[canvas.starts[i]..end]
            .iter()
            .map(|n| (n.id.as_str(), n))
            .collect();
        let find = |id: &str| own.get(id).or_else(|| first_placed.get(id)).copied();

        for edge in &layout.edges {
            match (find(&edge.source), find(&edge.target)) {
                (Some(source), Some(target)) => {
                    edges.push(position_edge(edge, &layout.anchor, source, target))
                }
                _ => warn!(edge_id = %edge.id, "Edge endpoint was never placed, skipping"),
            }
        }
    }
    edges
}

fn position_edge(
    edge: &Edge,
    cluster: &str,
    source: &PositionedNode,
    target: &PositionedNode,
) -> PositionedEdge {
    PositionedEdge {
        id: edge.id.clone(),
        source: edge.source.clone(),
        target: edge.target.clone(),
        label: edge.label.clone(),
        cluster: cluster.to_string(),
        color: EDGE_COLOR.to_string(),
        source_point: source.attachment(source.source_side),
        target_point: target.attachment(target.target_side),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Node, NodeType};
    use crate::graph::{Cluster, HierarchicalLayout};

    fn laid_out(anchor: &str, nodes: &[&str], edges: &[(&str, &str)]) -> ClusterLayout {
        let cluster = Cluster {
            anchor: anchor.to_string(),
            nodes: nodes
                .iter()
                .map(|id| Node::new(*id, *id, NodeType::Person))
                .collect(),
            edges: edges
                .iter()
                .map(|(s, t)| Edge::new(format!("{}-{}", s, t), *s, *t, ""))
                .collect(),
        };
        HierarchicalLayout::default().layout_cluster(&cluster)
    }

    #[test]
    fn test_offsets_accumulate() {
        let a = laid_out("p1", &["p1", "e1"], &[("p1", "e1")]);
        let b = laid_out("p2", &["p2", "e2"], &[("p2", "e2")]);
        let layout = CanvasComposer::default().compose(&[a, b]);

        assert_eq!(layout.clusters[0].x, 0.0);
        assert_eq!(layout.clusters[0].y, 0.0);
        // 300 + 2 * 120 beats 180 + 300
        assert_eq!(layout.clusters[1].x, 540.0);
        assert_eq!(layout.clusters[1].y, 60.0);
        assert_eq!(layout.node("p2").unwrap().x, 540.0);
        assert!(!layout.clusters[0].intersects(&layout.clusters[1]));
    }

    #[test]
    fn test_wide_cluster_pushes_next_past_its_width() {
        let config = LayoutConfig {
            cluster_gap_base: 10.0,
            cluster_gap_per_node: 1.0,
            ..LayoutConfig::default()
        };
        let wide = laid_out("a", &["a", "b", "c", "d"], &[("a", "b"), ("a", "c"), ("a", "d")]);
        let width = wide.width;
        let next = laid_out("x", &["x", "y"], &[("x", "y")]);
        let layout = CanvasComposer::new(config).compose(&[wide, next]);

        assert_eq!(layout.clusters[1].x, width + 10.0);
        assert!(!layout.clusters[0].intersects(&layout.clusters[1]));
    }

    #[test]
    fn test_edge_points_attach_to_box_sides() {
        let single = laid_out("p1", &["p1", "e1"], &[("p1", "e1")]);
        let layout = CanvasComposer::default().compose(&[single]);
        let p1 = layout.node("p1").unwrap();
        let e1 = layout.node("e1").unwrap();
        let edge = &layout.edges[0];

        assert_eq!(edge.source_point, p1.bottom_center());
        assert_eq!(edge.target_point, e1.top_center());
        assert_eq!(edge.color, EDGE_COLOR);
        assert_eq!(edge.cluster, "p1");
    }

    #[test]
    fn test_edge_prefers_own_cluster_placement() {
        // b is laid out in both clusters
        let first = laid_out("a", &["a", "b"], &[("a", "b")]);
        let second = laid_out("b", &["b", "c"], &[("b", "c")]);
        let layout = CanvasComposer::default().compose(&[first, second]);

        let second_b = layout.placements("b").nth(1).unwrap();
        let edge = layout.edges.iter().find(|e| e.id == "b-c").unwrap();
        assert_eq!(edge.source_point, second_b.bottom_center());
    }

    #[test]
    fn test_lookups_outlive_the_queried_id() {
        let first = laid_out("a", &["a", "b"], &[("a", "b")]);
        let second = laid_out("b", &["b", "c"], &[("b", "c")]);
        let layout = CanvasComposer::default().compose(&[first, second]);

        let found = {
            let id = String::from("b");
            layout.node(&id)
        };
        let every: Vec<&PositionedNode> = {
            let id = "b".to_string();
            layout.placements(&id).collect()
        };

        assert_eq!(found.map(|n| n.cluster.as_str()), Some("a"));
        assert_eq!(every.len(), 2);
        assert_eq!(every[1].cluster, "b");
    }

    #[test]
    fn test_edge_falls_back_to_first_placement() {
        // Second cluster lost b to the first one
        let first = laid_out("a", &["a", "b"], &[("a", "b")]);
        let mut second = laid_out("b", &["c"], &[]);
        second.edges.push(Edge::new("b-c", "b", "c", ""));
        let layout = CanvasComposer::default().compose(&[first, second]);

        let b = layout.node("b").unwrap();
        let edge = layout.edges.iter().find(|e| e.id == "b-c").unwrap();
        assert_eq!(edge.source_point, b.bottom_center());
        assert_eq!(edge.cluster, "b");
    }

    #[test]
    fn test_canvas_size_covers_every_cluster() {
        let a = laid_out("p1", &["p1", "e1"], &[("p1", "e1")]);
        let b = laid_out("p2", &["p2", "e2"], &[("p2", "e2")]);
        let layout = CanvasComposer::default().compose(&[a, b]);
        for node in &layout.nodes {
            assert!(node.x + node.width <= layout.width);
            assert!(node.y + node.height <= layout.height);
        }
    }

    #[test]
    fn test_compose_nothing() {
        let layout = CanvasComposer::default().compose(&[]);
        assert!(layout.is_empty());
        assert!(layout.clusters.is_empty());
        assert_eq!(layout.width, 0.0);
        assert!(layout.report.is_clean());
    }
}
