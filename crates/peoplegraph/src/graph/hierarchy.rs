//! Hierarchical layout of a single cluster
//!
//! Ranks nodes by longest path, orders each rank by barycenter, then assigns
//! evenly spaced coordinates with every rank centered on the widest one.
//! Coordinates are local to the cluster: its bounding box starts at (0, 0).

use serde::{Deserialize, Serialize};
use tracing::{debug, span, trace, warn, Level};

use super::ordering::reduce_crossings;
use super::ranking::assign_ranks;
use super::{Cluster, ClusterGraph, LayoutConfig};
use crate::core::style::{display_label, node_color, node_icon};
use crate::core::{CycleWarning, Edge, Node, NodeType, Point, Side};

/// A node with its box on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Label prefixed with the type icon
    pub display_label: String,
    pub icon: Option<String>,
    pub color: String,
    /// Left edge of the box
    pub x: f64,
    /// Top edge of the box
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rank: usize,
    /// Anchor of the cluster the node was laid out in
    pub cluster: String,
    /// Where incoming edges attach
    pub target_side: Side,
    /// Where outgoing edges leave
    pub source_side: Side,
}

impl PositionedNode {
    fn place(
        node: &Node,
        cluster: &str,
        rank: usize,
        x: f64,
        y: f64,
        config: &LayoutConfig,
    ) -> Self {
        Self {
            id: node.id.clone(),
            label: node.label.clone(),
            node_type: node.node_type,
            display_label: display_label(node.node_type, &node.label),
            icon: node_icon(node.node_type, &node.label).map(str::to_string),
            color: node_color(node.node_type).to_string(),
            x,
            y,
            width: config.node_width,
            height: config.node_height,
            rank,
            cluster: cluster.to_string(),
            target_side: Side::Top,
            source_side: Side::Bottom,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Attachment point on the top side
    pub fn top_center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y)
    }

    /// Attachment point on the bottom side
    pub fn bottom_center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height)
    }

    /// Point where an edge attaches on the given side
    pub fn attachment(&self, side: Side) -> Point {
        match side {
            Side::Top => self.top_center(),
            Side::Bottom => self.bottom_center(),
        }
    }

    /// Copy of this node moved by `(dx, dy)`
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self.clone()
        }
    }
}

/// Layout of one cluster in local coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterLayout {
    pub anchor: String,
    /// Nodes in rank-major order, left to right within a rank
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<Edge>,
    pub width: f64,
    pub height: f64,
    pub rank_count: usize,
    /// Width of the widest rank in pixels
    pub max_rank_width: f64,
    pub cycles: Vec<CycleWarning>,
}

impl ClusterLayout {
    fn empty(cluster: &Cluster) -> Self {
        Self {
            anchor: cluster.anchor.clone(),
            nodes: Vec::new(),
            edges: cluster.edges.clone(),
            width: 0.0,
            height: 0.0,
            rank_count: 0,
            max_rank_width: 0.0,
            cycles: Vec::new(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Top-to-bottom layered layout of a cluster
#[derive(Debug, Clone, Default)]
pub struct HierarchicalLayout {
    config: LayoutConfig,
}

impl HierarchicalLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Width in pixels of a rank holding `count` nodes
    fn rank_width(&self, count: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }
        count as f64 * self.config.node_width + (count - 1) as f64 * self.config.node_gap
    }

    /// Position every node of a cluster
    pub fn layout_cluster(&self, cluster: &Cluster) -> ClusterLayout {
        let cluster_span = span!(
            Level::DEBUG,
            "layout_cluster",
            anchor = %cluster.anchor,
            node_count = cluster.node_count(),
            edge_count = cluster.edge_count()
        );
        let _enter = cluster_span.enter();

        if cluster.nodes.is_empty() {
            debug!("Empty cluster, returning empty layout");
            return ClusterLayout::empty(cluster);
        }

        let graph = ClusterGraph::from_cluster(cluster);
        let ranking = assign_ranks(&graph);

        let cycles: Vec<CycleWarning> = ranking
            .back_edges
            .iter()
            .map(|&(s, t)| CycleWarning {
                cluster: cluster.anchor.clone(),
                source: cluster.nodes[s].id.clone(),
                target: cluster.nodes[t].id.clone(),
            })
            .collect();
        for cycle in &cycles {
            warn!(%cycle, "Cycle detected, ignoring back edge for ranking");
        }

        let mut layers = ranking.layers();
        let crossings = reduce_crossings(&graph, &mut layers, self.config.ordering_iterations);
        debug!(rank_count = layers.len(), crossings, "Ordered ranks");

        let stride = self.config.node_width + self.config.node_gap;
        let rank_step = self.config.node_height + self.config.rank_gap(cluster.node_count());
        let max_rank_width = layers
            .iter()
            .map(|layer| self.rank_width(layer.len()))
            .fold(0.0, f64::max);

        let mut nodes = Vec::with_capacity(cluster.node_count());
        for (rank, layer) in layers.iter().enumerate() {
            let offset = (max_rank_width - self.rank_width(layer.len())) / 2.0;
            let y = rank as f64 * rank_step;
            for (slot, &index) in layer.iter().enumerate() {
                let x = offset + slot as f64 * stride;
                let node = &cluster.nodes[index];
                trace!(node_id = %node.id, rank, x, y, "Placed node");
                nodes.push(PositionedNode::place(node, &cluster.anchor, rank, x, y, &self.config));
            }
        }

        let rank_count = layers.len();
        let height = (rank_count - 1) as f64 * rank_step + self.config.node_height;

        ClusterLayout {
            anchor: cluster.anchor.clone(),
            nodes,
            edges: cluster.edges.clone(),
            width: max_rank_width,
            height,
            rank_count,
            max_rank_width,
            cycles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster(anchor: &str, nodes: &[&str], edges: &[(&str, &str)]) -> Cluster {
        Cluster {
            anchor: anchor.to_string(),
            nodes: nodes
                .iter()
                .map(|id| Node::new(*id, *id, NodeType::Person))
                .collect(),
            edges: edges
                .iter()
                .enumerate()
                .map(|(i, (s, t))| Edge::new(format!("r{}", i), *s, *t, ""))
                .collect(),
        }
    }

    #[test]
    fn test_single_edge() {
        let input = cluster("p1", &["p1", "e1"], &[("p1", "e1")]);
        let layout = HierarchicalLayout::default().layout_cluster(&input);

        let p1 = layout.node("p1").unwrap();
        let e1 = layout.node("e1").unwrap();
        assert_eq!(p1.rank, 0);
        assert_eq!(e1.rank, 1);
        assert!(e1.y > p1.y);
        assert_eq!(p1.x, 0.0);
        assert_eq!(p1.y, 0.0);
        assert_eq!(layout.width, 180.0);
        // rank_gap = max(120, 2 * 20)
        assert_eq!(e1.y, 170.0);
        assert_eq!(layout.height, 220.0);
    }

    #[test]
    fn test_ranks_are_centered_on_widest() {
        let layout = HierarchicalLayout::default()
            .layout_cluster(&cluster("a", &["a", "b", "c"], &[("a", "b"), ("a", "c")]));

        // Widest rank: two nodes, 180 + 100 + 180
        assert_eq!(layout.max_rank_width, 460.0);
        assert_eq!(layout.node("a").unwrap().x, 140.0);
        assert_eq!(layout.node("b").unwrap().x, 0.0);
        assert_eq!(layout.node("c").unwrap().x, 280.0);
        assert_eq!(layout.node("a").unwrap().center().x, 230.0);
    }

    #[test]
    fn test_rank_gap_grows_with_cluster_size() {
        let ids: Vec<String> = (0..10).map(|i| format!("n{}", i)).collect();
        let id_refs: Vec<&str> = ids.iter().map(|s| s.as_str()).collect();
        let edges: Vec<(&str, &str)> = id_refs[1..].iter().map(|t| (id_refs[0], *t)).collect();
        let layout = HierarchicalLayout::default().layout_cluster(&cluster("n0", &id_refs, &edges));

        // rank_gap = max(120, 10 * 20) = 200
        assert_eq!(layout.node("n1").unwrap().y, 250.0);
    }

    #[test]
    fn test_distinct_x_within_rank() {
        let input = cluster(
            "a",
            &["a", "b", "c", "d"],
            &[("a", "b"), ("a", "c"), ("a", "d")],
        );
        let layout = HierarchicalLayout::default().layout_cluster(&input);
        let mut xs: Vec<f64> = layout
            .nodes
            .iter()
            .filter(|n| n.rank == 1)
            .map(|n| n.x)
            .collect();
        xs.dedup();
        assert_eq!(xs.len(), 3);
    }

    #[test]
    fn test_cycle_completes_with_warning() {
        let input = cluster(
            "a",
            &["a", "b", "c"],
            &[("a", "b"), ("b", "c"), ("c", "a")],
        );
        let layout = HierarchicalLayout::default().layout_cluster(&input);

        let mut ranks: Vec<usize> = layout.nodes.iter().map(|n| n.rank).collect();
        ranks.sort();
        assert_eq!(ranks, vec![0, 1, 2]);
        assert_eq!(layout.cycles.len(), 1);
        assert_eq!(layout.cycles[0].source, "c");
        assert_eq!(layout.cycles[0].target, "a");
        assert_eq!(layout.cycles[0].cluster, "a");
    }

    #[test]
    fn test_self_loop_is_not_a_cycle() {
        let input = cluster("solo", &["solo"], &[("solo", "solo")]);
        let layout = HierarchicalLayout::default().layout_cluster(&input);
        assert_eq!(layout.nodes.len(), 1);
        assert!(layout.cycles.is_empty());
        assert_eq!(layout.rank_count, 1);
    }

    #[test]
    fn test_empty_cluster() {
        let layout = HierarchicalLayout::default().layout_cluster(&cluster("x", &[], &[]));
        assert!(layout.nodes.is_empty());
        assert_eq!(layout.width, 0.0);
        assert_eq!(layout.height, 0.0);
        assert_eq!(layout.rank_count, 0);
    }

    #[test]
    fn test_attachment_sides_and_styling() {
        let mut c = cluster("a", &["a", "b"], &[("a", "b")]);
        c.nodes[1].node_type = NodeType::Email;
        let layout = HierarchicalLayout::default().layout_cluster(&c);
        let b = layout.node("b").unwrap();

        assert_eq!(b.target_side, Side::Top);
        assert_eq!(b.source_side, Side::Bottom);
        assert_eq!(b.color, "#f59e0b");
        assert_eq!(b.display_label, "✉️ b");
        assert_eq!(b.attachment(Side::Top), b.top_center());
        assert_eq!(b.bottom_center().y, b.y + 50.0);
    }

    #[test]
    fn test_translated() {
        let input = cluster("a", &["a"], &[("a", "a")]);
        let layout = HierarchicalLayout::default().layout_cluster(&input);
        let moved = layout.nodes[0].translated(10.0, 20.0);
        assert_eq!(moved.x, 10.0);
        assert_eq!(moved.y, 20.0);
        assert_eq!(moved.id, "a");
    }

    #[test]
    fn test_positioned_node_serializes_type_field() {
        let input = cluster("a", &["a"], &[("a", "a")]);
        let layout = HierarchicalLayout::default().layout_cluster(&input);
        let json = serde_json::to_value(&layout.nodes[0]).unwrap();
        assert_eq!(json["type"], "person");
        assert_eq!(json["target_side"], "top");
        assert_eq!(json["cluster"], "a");
    }
}
