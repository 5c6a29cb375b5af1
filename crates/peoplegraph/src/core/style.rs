//! Presentation hints for the render adapter
//!
//! Layout never reads these. They are attached to positioned output so a
//! renderer can draw nodes without its own lookup tables.

use super::NodeType;

/// Fallback border color for nodes of unknown type
pub const UNKNOWN_COLOR: &str = "#9ca3af";

/// Stroke color for relationship edges
pub const EDGE_COLOR: &str = "#60a5fa";

/// Border color for a node type
pub fn node_color(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Person => "#60a5fa",
        NodeType::Email => "#f59e0b",
        NodeType::Domain => "#22c55e",
        NodeType::Company => "#8b5cf6",
        NodeType::Social => "#0ea5e9",
        NodeType::Risk => "#ef4444",
        NodeType::Unknown => UNKNOWN_COLOR,
    }
}

/// Icon shown in front of a node label
///
/// Social handles are refined by platform name found in the label.
pub fn node_icon(node_type: NodeType, label: &str) -> Option<&'static str> {
    match node_type {
        NodeType::Person => Some("👤"),
        NodeType::Email => Some("✉️"),
        NodeType::Domain => Some("🌐"),
        NodeType::Company => Some("🏢"),
        NodeType::Risk => Some("⚠️"),
        NodeType::Social => {
            let lower = label.to_lowercase();
            if lower.contains("twitter") {
                Some("🐦")
            } else if lower.contains("linkedin") {
                Some("💼")
            } else {
                None
            }
        }
        NodeType::Unknown => None,
    }
}

/// Label with its icon prefix, if the type has one
pub fn display_label(node_type: NodeType, label: &str) -> String {
    match node_icon(node_type, label) {
        Some(icon) => format!("{} {}", icon, label),
        None => label.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_a_color() {
        for ty in [
            NodeType::Person,
            NodeType::Email,
            NodeType::Domain,
            NodeType::Company,
            NodeType::Social,
            NodeType::Risk,
            NodeType::Unknown,
        ] {
            assert!(node_color(ty).starts_with('#'));
        }
        assert_eq!(node_color(NodeType::Unknown), UNKNOWN_COLOR);
    }

    #[test]
    fn test_social_icon_depends_on_label() {
        assert_eq!(node_icon(NodeType::Social, "Twitter: @alice"), Some("🐦"));
        assert_eq!(node_icon(NodeType::Social, "linkedin.com/in/alice"), Some("💼"));
        assert_eq!(node_icon(NodeType::Social, "mastodon"), None);
    }

    #[test]
    fn test_display_label() {
        assert_eq!(display_label(NodeType::Person, "Alice"), "👤 Alice");
        assert_eq!(display_label(NodeType::Unknown, "Thing"), "Thing");
    }
}
