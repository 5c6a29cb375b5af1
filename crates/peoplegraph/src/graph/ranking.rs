//! Longest-path rank assignment
//!
//! A node's rank is the length of the longest path reaching it from a node
//! without predecessors. An iterative depth-first walk marks each node as
//! visiting while it is on the walk stack; an edge into a visiting node closes
//! a cycle and is set aside as a back edge. The remaining edges form a DAG
//! whose longest paths are computed in reverse postorder.

use std::collections::HashSet;
use tracing::{debug, trace};

use super::ClusterGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    Visiting,
    Finished,
}

/// Result of rank assignment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ranking {
    /// Rank per node index
    pub ranks: Vec<usize>,
    /// Edges ignored because they close a cycle, as `(source, target)`
    pub back_edges: Vec<(usize, usize)>,
}

impl Ranking {
    /// Number of distinct ranks (0 for an empty graph)
    pub fn rank_count(&self) -> usize {
        self.ranks.iter().max().map_or(0, |&r| r + 1)
    }

    /// Node indices grouped by rank, each group in index order
    pub fn layers(&self) -> Vec<Vec<usize>> {
        let mut layers = vec![Vec::new(); self.rank_count()];
        for (node, &rank) in self.ranks.iter().enumerate() {
            layers[rank].push(node);
        }
        layers
    }
}

/// Assign a longest-path rank to every node
///
/// The walk starts from nodes without predecessors in index order, then from
/// any node still unvisited (members of a cycle with no entry point). Equal
/// paths therefore resolve in first-seen order.
pub fn assign_ranks(graph: &ClusterGraph) -> Ranking {
    let count = graph.len();
    let mut state = vec![VisitState::Unvisited; count];
    let mut postorder = Vec::with_capacity(count);
    let mut back_edges = Vec::new();
    // (node, next successor to inspect)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    let roots = (0..count)
        .filter(|&node| graph.predecessors(node).is_empty())
        .chain(0..count);

    for root in roots {
        if state[root] != VisitState::Unvisited {
            continue;
        }
        state[root] = VisitState::Visiting;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            if let Some(&succ) = graph.successors(node).get(cursor) {
                frame.1 += 1;
                match state[succ] {
                    VisitState::Unvisited => {
                        state[succ] = VisitState::Visiting;
                        stack.push((succ, 0));
                    }
                    VisitState::Visiting => {
                        trace!(source = node, target = succ, "Back edge");
                        back_edges.push((node, succ));
                    }
                    VisitState::Finished => {}
                }
            } else {
                stack.pop();
                state[node] = VisitState::Finished;
                postorder.push(node);
            }
        }
    }

    let skipped: HashSet<(usize, usize)> = back_edges.iter().copied().collect();
    let mut ranks = vec![0; count];
    for &node in postorder.iter().rev() {
        ranks[node] = graph
            .predecessors(node)
            .iter()
            .filter(|&&pred| !skipped.contains(&(pred, node)))
            .map(|&pred| ranks[pred] + 1)
            .max()
            .unwrap_or(0);
    }

    debug!(
        node_count = count,
        back_edge_count = back_edges.len(),
        "Assigned ranks"
    );
    Ranking { ranks, back_edges }
}
