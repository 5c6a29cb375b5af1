//! Layout configuration
//!
//! Every field has a default, so a config file only needs to name the values
//! it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::core::GraphError;

/// Built-in ways of choosing a cluster anchor for an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionStrategy {
    /// Group edges by their source node id
    #[default]
    Source,
    /// Group edges by their target node id
    Target,
    /// Group edges by relationship label
    Label,
    /// Put every edge in one cluster
    Single,
}

impl FromStr for PartitionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "source" => Ok(PartitionStrategy::Source),
            "target" => Ok(PartitionStrategy::Target),
            "label" => Ok(PartitionStrategy::Label),
            "single" => Ok(PartitionStrategy::Single),
            _ => Err(format!("Unknown partition strategy: {}", s)),
        }
    }
}

/// How a node referenced from several clusters is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Membership {
    /// The node is laid out in every cluster that references it
    #[default]
    Duplicate,
    /// The node is laid out only in the first cluster that references it
    FirstCluster,
}

impl FromStr for Membership {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "duplicate" => Ok(Membership::Duplicate),
            "first_cluster" => Ok(Membership::FirstCluster),
            _ => Err(format!("Unknown membership policy: {}", s)),
        }
    }
}

/// Layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width of every node box
    pub node_width: f64,
    /// Height of every node box
    pub node_height: f64,
    /// Horizontal gap between neighbours in the same rank
    pub node_gap: f64,
    /// Smallest vertical gap between ranks
    pub rank_gap_min: f64,
    /// Extra rank gap per node in the cluster
    pub rank_gap_per_node: f64,
    /// Base horizontal advance between clusters
    pub cluster_gap_base: f64,
    /// Extra horizontal advance per node in the cluster
    pub cluster_gap_per_node: f64,
    /// Vertical advance between consecutive clusters
    pub cluster_vertical_stride: f64,
    /// Barycenter sweeps used to reduce crossings
    pub ordering_iterations: usize,
    /// How edges are grouped into clusters
    pub partition: PartitionStrategy,
    /// How shared nodes are placed
    pub membership: Membership,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 180.0,
            node_height: 50.0,
            node_gap: 100.0,
            rank_gap_min: 120.0,
            rank_gap_per_node: 20.0,
            cluster_gap_base: 300.0,
            cluster_gap_per_node: 120.0,
            cluster_vertical_stride: 60.0,
            ordering_iterations: 2,
            partition: PartitionStrategy::Source,
            membership: Membership::Duplicate,
        }
    }
}

impl LayoutConfig {
    /// Vertical gap between ranks for a cluster of `node_count` nodes
    ///
    /// Dense clusters get proportionally more room.
    pub fn rank_gap(&self, node_count: usize) -> f64 {
        self.rank_gap_min
            .max(node_count as f64 * self.rank_gap_per_node)
    }

    /// Estimated horizontal advance after a cluster of `node_count` nodes
    pub fn cluster_advance_estimate(&self, node_count: usize) -> f64 {
        self.cluster_gap_base + node_count as f64 * self.cluster_gap_per_node
    }

    /// Check that every dimension is usable
    pub fn validate(&self) -> Result<(), GraphError> {
        let positive = [
            ("node_width", self.node_width),
            ("node_height", self.node_height),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(GraphError::config_error(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("node_gap", self.node_gap),
            ("rank_gap_min", self.rank_gap_min),
            ("rank_gap_per_node", self.rank_gap_per_node),
            ("cluster_gap_base", self.cluster_gap_base),
            ("cluster_gap_per_node", self.cluster_gap_per_node),
            ("cluster_vertical_stride", self.cluster_vertical_stride),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(GraphError::config_error(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Parse a config from JSON and validate it
    pub fn from_json(text: &str) -> Result<Self, GraphError> {
        let config: LayoutConfig = serde_json::from_str(text)
            .map_err(|e| GraphError::config_error(format!("invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, GraphError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            GraphError::config_error(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_gap_is_adaptive() {
        let config = LayoutConfig::default();
        assert_eq!(config.rank_gap(2), 120.0);
        assert_eq!(config.rank_gap(6), 120.0);
        assert_eq!(config.rank_gap(10), 200.0);
    }

    #[test]
    fn test_cluster_advance_estimate() {
        let config = LayoutConfig::default();
        assert_eq!(config.cluster_advance_estimate(0), 300.0);
        assert_eq!(config.cluster_advance_estimate(3), 660.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = LayoutConfig::from_json(r#"{"node_width": 200, "partition": "target"}"#)
            .unwrap();
        assert_eq!(config.node_width, 200.0);
        assert_eq!(config.node_height, 50.0);
        assert_eq!(config.partition, PartitionStrategy::Target);
        assert_eq!(config.membership, Membership::Duplicate);
    }

    #[test]
    fn test_membership_json_name() {
        let config = LayoutConfig::from_json(r#"{"membership": "first_cluster"}"#).unwrap();
        assert_eq!(config.membership, Membership::FirstCluster);
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        let err = LayoutConfig::from_json(r#"{"node_width": 0}"#).unwrap_err();
        assert!(err.to_string().contains("node_width"));

        let err = LayoutConfig::from_json(r#"{"rank_gap_min": -1}"#).unwrap_err();
        assert!(err.to_string().contains("rank_gap_min"));
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("Source".parse::<PartitionStrategy>(), Ok(PartitionStrategy::Source));
        assert_eq!("single".parse::<PartitionStrategy>(), Ok(PartitionStrategy::Single));
        assert!("random".parse::<PartitionStrategy>().is_err());
        assert_eq!("first-cluster".parse::<Membership>(), Ok(Membership::FirstCluster));
    }
}
