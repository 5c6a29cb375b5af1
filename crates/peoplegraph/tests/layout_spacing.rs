//! Spacing rules of the hierarchical layout and the canvas composer

use peoplegraph::layout;
use peoplegraph::prelude::*;

fn fan_out(hub: &str, leaves: usize) -> (Vec<Node>, Vec<Edge>) {
    let mut nodes = vec![Node::new(hub, hub, NodeType::Person)];
    let mut edges = Vec::new();
    for i in 0..leaves {
        let id = format!("{}-{}", hub, i);
        nodes.push(Node::new(id.clone(), id.clone(), NodeType::Email));
        edges.push(Edge::new(format!("{}-r{}", hub, i), hub, id, "owns"));
    }
    (nodes, edges)
}

#[test]
fn test_neighbours_in_rank_are_one_stride_apart() {
    let (nodes, edges) = fan_out("hub", 3);
    let result = layout(&nodes, &edges, &LayoutConfig::default());

    let mut xs: Vec<f64> = result
        .nodes
        .iter()
        .filter(|n| n.rank == 1)
        .map(|n| n.x)
        .collect();
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    for pair in xs.windows(2) {
        // node_width 180 + node_gap 100
        assert_eq!(pair[1] - pair[0], 280.0);
    }
}

#[test]
fn test_small_cluster_uses_minimum_rank_gap() {
    let (nodes, edges) = fan_out("hub", 1);
    let result = layout(&nodes, &edges, &LayoutConfig::default());

    let hub = result.node("hub").unwrap();
    let leaf = result.node("hub-0").unwrap();
    assert_eq!(leaf.y - hub.y, 50.0 + 120.0);
}

#[test]
fn test_large_cluster_gets_wider_rank_gap() {
    let (nodes, edges) = fan_out("hub", 11);
    let result = layout(&nodes, &edges, &LayoutConfig::default());

    let hub = result.node("hub").unwrap();
    let leaf = result.node("hub-0").unwrap();
    // 12 nodes * 20 = 240
    assert_eq!(leaf.y - hub.y, 50.0 + 240.0);
}

#[test]
fn test_single_node_rank_is_centered() {
    let (nodes, edges) = fan_out("hub", 4);
    let result = layout(&nodes, &edges, &LayoutConfig::default());

    let hub = result.node("hub").unwrap();
    let bounds = result.cluster("hub").unwrap();
    assert_eq!(hub.center().x, bounds.x + bounds.width / 2.0);
}

#[test]
fn test_cluster_advance_and_vertical_stride() {
    let (mut nodes, mut edges) = fan_out("a", 1);
    let (more_nodes, more_edges) = fan_out("b", 1);
    nodes.extend(more_nodes);
    edges.extend(more_edges);
    let result = layout(&nodes, &edges, &LayoutConfig::default());

    let second = result.cluster("b").unwrap();
    // 300 + 2 nodes * 120
    assert_eq!(second.x, 540.0);
    assert_eq!(second.y, 60.0);
}

#[test]
fn test_custom_dimensions() {
    let config = LayoutConfig {
        node_width: 100.0,
        node_height: 40.0,
        node_gap: 20.0,
        rank_gap_min: 60.0,
        ..LayoutConfig::default()
    };
    let (nodes, edges) = fan_out("hub", 2);
    let result = layout(&nodes, &edges, &config);

    let bounds = result.cluster("hub").unwrap();
    assert_eq!(bounds.max_rank_width, 220.0);
    assert_eq!(bounds.height, 40.0 + 60.0 + 40.0);
    assert!(result.nodes.iter().all(|n| n.width == 100.0 && n.height == 40.0));
}
