//! Crossing reduction within ranks
//!
//! Each rank is sorted by the mean slot of its neighbours in the rank next to
//! it. Slots are evenly spaced, so the mean slot orders nodes the same way the
//! mean x-coordinate would.

use std::cmp::Ordering;

use super::ClusterGraph;

/// Which neighbouring rank a sweep reads positions from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sweep {
    /// Top to bottom, reading the rank above
    Down,
    /// Bottom to top, reading the rank below
    Up,
}

impl Sweep {
    fn neighbours(self, graph: &ClusterGraph, node: usize) -> &[usize] {
        match self {
            Sweep::Down => graph.predecessors(node),
            Sweep::Up => graph.successors(node),
        }
    }
}

/// Slot of every node in a rank, indexed by node
fn slots(rank: &[usize], node_count: usize) -> Vec<Option<usize>> {
    let mut slots = vec![None; node_count];
    for (slot, &node) in rank.iter().enumerate() {
        slots[node] = Some(slot);
    }
    slots
}

/// Total crossings between consecutive ranks
///
/// Edges that skip a rank are not counted.
pub fn crossings(ranks: &[Vec<usize>], graph: &ClusterGraph) -> usize {
    ranks
        .windows(2)
        .map(|pair| crossings_between(&pair[0], &pair[1], graph))
        .sum()
}

fn crossings_between(upper: &[usize], lower: &[usize], graph: &ClusterGraph) -> usize {
    let lower_slots = slots(lower, graph.len());

    // Upper slots are visited in order, so segments are sorted by their top end
    let mut segments: Vec<(usize, usize)> = Vec::new();
    for (slot, &node) in upper.iter().enumerate() {
        for &succ in graph.successors(node) {
            if let Some(low) = lower_slots[succ] {
                segments.push((slot, low));
            }
        }
    }

    segments
        .iter()
        .enumerate()
        .map(|(i, &(top_a, low_a))| {
            segments[i + 1..]
                .iter()
                .filter(|&&(top_b, low_b)| top_a < top_b && low_a > low_b)
                .count()
        })
        .sum()
}

/// Mean slot of each node's neighbours in `reference`
///
/// `None` for a node with no neighbour there.
pub fn barycenters(
    rank: &[usize],
    reference: &[usize],
    graph: &ClusterGraph,
    sweep: Sweep,
) -> Vec<Option<f64>> {
    let reference_slots = slots(reference, graph.len());

    rank.iter()
        .map(|&node| {
            let (sum, count) = sweep
                .neighbours(graph, node)
                .iter()
                .filter_map(|&n| reference_slots[n])
                .fold((0usize, 0usize), |(sum, count), slot| (sum + slot, count + 1));
            (count > 0).then(|| sum as f64 / count as f64)
        })
        .collect()
}

/// Reorder a rank by barycenter
///
/// Connected nodes come first in ascending barycenter. The sort is stable, so
/// ties and unconnected nodes keep their current relative order.
pub fn sort_by_barycenter(rank: &mut Vec<usize>, centers: &[Option<f64>]) {
    let mut keyed: Vec<(usize, Option<f64>)> = rank
        .iter()
        .enumerate()
        .map(|(i, &node)| (node, centers.get(i).copied().flatten()))
        .collect();
    keyed.sort_by(|(_, a), (_, b)| match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    *rank = keyed.into_iter().map(|(node, _)| node).collect();
}

/// Run alternating barycenter sweeps and keep the best ordering
///
/// Sweeps start downward. Returns the crossing count of the kept ordering.
pub fn reduce_crossings(
    graph: &ClusterGraph,
    ranks: &mut Vec<Vec<usize>>,
    sweeps: usize,
) -> usize {
    if ranks.len() < 2 {
        return 0;
    }

    let mut best = ranks.clone();
    let mut fewest = crossings(ranks, graph);

    for pass in 0..sweeps {
        if fewest == 0 {
            break;
        }

        let sweep = if pass % 2 == 0 { Sweep::Down } else { Sweep::Up };
        let order: Vec<usize> = match sweep {
            Sweep::Down => (1..ranks.len()).collect(),
            Sweep::Up => (0..ranks.len() - 1).rev().collect(),
        };

        for current in order {
            let reference = match sweep {
                Sweep::Down => current - 1,
                Sweep::Up => current + 1,
            };
            let centers = barycenters(&ranks[current], &ranks[reference], graph, sweep);
            sort_by_barycenter(&mut ranks[current], &centers);
        }

        let count = crossings(ranks, graph);
        if count < fewest {
            fewest = count;
            best = ranks.clone();
        }
    }

    *ranks = best;
    fewest
}
