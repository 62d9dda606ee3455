//! Decision tree node representation
//!
//! Nodes live in a flat per-tree array and reference children by index,
//! which keeps the artifact compact and tree traversal allocation-free.

use serde::{Deserialize, Serialize};

/// One node of a decision tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ForestNode {
    /// Internal node with a split condition
    Split {
        /// Feature index to split on
        feature: u8,
        /// Split threshold; `feature < threshold` goes left
        threshold: f32,
        /// Left child index in the tree's node array
        left: u16,
        /// Right child index in the tree's node array
        right: u16,
    },
    /// Leaf node carrying this tree's vote
    Leaf {
        /// Class ordinal the leaf votes for
        class: u8,
    },
}

impl ForestNode {
    /// Create an internal split node
    pub fn split(feature: u8, threshold: f32, left: u16, right: u16) -> Self {
        Self::Split {
            feature,
            threshold,
            left,
            right,
        }
    }

    /// Create a leaf node
    pub fn leaf(class: u8) -> Self {
        Self::Leaf { class }
    }

    /// Check if node is a leaf
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_constructors() {
        let split = ForestNode::split(0, 25.0, 1, 2);
        assert!(!split.is_leaf());

        let leaf = ForestNode::leaf(1);
        assert!(leaf.is_leaf());
    }

    #[test]
    fn node_kind_tag_round_trips() {
        let json = r#"{"kind":"split","feature":2,"threshold":6.8,"left":1,"right":2}"#;
        let node: ForestNode = serde_json::from_str(json).unwrap();
        assert_eq!(node, ForestNode::split(2, 6.8, 1, 2));

        let json = r#"{"kind":"leaf","class":0}"#;
        let node: ForestNode = serde_json::from_str(json).unwrap();
        assert_eq!(node, ForestNode::leaf(0));
    }
}
