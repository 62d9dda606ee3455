//! Decision tree traversal
//!
//! A tree is a flat node array with the root at index 0. Traversal is
//! iterative: compare the split feature against its threshold, follow
//! the left child on `<`, the right child otherwise, until a leaf
//! yields the tree's vote.

use serde::{Deserialize, Serialize};

use crate::node::ForestNode;
use crate::{ModelError, ModelResult, FEATURE_COUNT};

/// One decision tree of the forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Tree nodes in array representation, root at index 0
    pub nodes: Vec<ForestNode>,
}

impl DecisionTree {
    /// Create a tree from its node array
    pub fn new(nodes: Vec<ForestNode>) -> Self {
        Self { nodes }
    }

    /// Walk the tree for one sample and return the leaf's class vote
    ///
    /// The step count is bounded by the node count, so a cyclic node
    /// array (which load-time validation cannot fully rule out) fails
    /// the prediction instead of hanging it.
    pub fn decide(&self, tree_index: usize, features: &[f32; FEATURE_COUNT]) -> ModelResult<u8> {
        if self.nodes.is_empty() {
            return Err(ModelError::CorruptTree {
                tree: tree_index,
                reason: "empty node array",
            });
        }

        let mut current = 0usize;
        for _ in 0..self.nodes.len() {
            match self.nodes[current] {
                ForestNode::Leaf { class } => return Ok(class),
                ForestNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features
                        .get(feature as usize)
                        .copied()
                        .ok_or(ModelError::CorruptTree {
                            tree: tree_index,
                            reason: "feature index out of range",
                        })?;

                    let next = if value < threshold { left } else { right } as usize;
                    if next >= self.nodes.len() {
                        return Err(ModelError::CorruptTree {
                            tree: tree_index,
                            reason: "child index out of bounds",
                        });
                    }
                    current = next;
                }
            }
        }

        // Visited more nodes than exist without reaching a leaf
        Err(ModelError::CorruptTree {
            tree: tree_index,
            reason: "cycle in node array",
        })
    }

    /// Validate the node array against the declared feature count
    pub fn validate(&self, tree_index: usize, num_features: usize) -> ModelResult<()> {
        if self.nodes.is_empty() {
            return Err(ModelError::CorruptTree {
                tree: tree_index,
                reason: "empty node array",
            });
        }
        if self.nodes.len() > u16::MAX as usize {
            return Err(ModelError::CorruptTree {
                tree: tree_index,
                reason: "node array exceeds index width",
            });
        }

        for node in &self.nodes {
            if let ForestNode::Split {
                feature,
                threshold,
                left,
                right,
            } = *node
            {
                if feature as usize >= num_features {
                    return Err(ModelError::CorruptTree {
                        tree: tree_index,
                        reason: "split on undeclared feature",
                    });
                }
                if !threshold.is_finite() {
                    return Err(ModelError::CorruptTree {
                        tree: tree_index,
                        reason: "non-finite split threshold",
                    });
                }
                if left as usize >= self.nodes.len() || right as usize >= self.nodes.len() {
                    return Err(ModelError::CorruptTree {
                        tree: tree_index,
                        reason: "child index out of bounds",
                    });
                }
            }
        }

        Ok(())
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
