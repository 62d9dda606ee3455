//! Forest loading and majority-vote classification
//!
//! The forest aggregates per-tree votes into one class ordinal. Ties
//! break toward the lower ordinal - the classes are ordered best to
//! worst, so a deterministic tie-break toward the better label keeps
//! repeated classifications of the same row stable regardless of tree
//! order in the artifact.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::tree::DecisionTree;
use crate::{Classifier, ModelError, ModelResult, FEATURE_COUNT};

/// A frozen, pre-trained random forest for water-quality labels
///
/// Construct only through the loaders or [`QualityForest::from_trees`];
/// both validate the structure so prediction never re-checks it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityForest {
    num_features: usize,
    trees: Vec<DecisionTree>,
}

impl QualityForest {
    /// Build a forest from in-memory trees, validating the structure
    pub fn from_trees(trees: Vec<DecisionTree>) -> ModelResult<Self> {
        let forest = Self {
            num_features: FEATURE_COUNT,
            trees,
        };
        forest.validate()?;
        Ok(forest)
    }

    /// Parse and validate an artifact from a JSON string
    pub fn from_json(json: &str) -> ModelResult<Self> {
        let forest: Self = serde_json::from_str(json)?;
        forest.validate()?;
        Ok(forest)
    }

    /// Parse and validate an artifact from a reader
    pub fn from_reader<R: Read>(reader: R) -> ModelResult<Self> {
        let forest: Self = serde_json::from_reader(reader)?;
        forest.validate()?;
        Ok(forest)
    }

    /// Load and validate the artifact file
    ///
    /// Called once at process start; the forest is immutable afterwards.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ModelResult<Self> {
        let file = File::open(path.as_ref())?;
        let forest = Self::from_reader(BufReader::new(file))?;
        log::info!(
            "loaded quality model: {} trees, {} nodes",
            forest.trees.len(),
            forest.stats().total_nodes
        );
        Ok(forest)
    }

    fn validate(&self) -> ModelResult<()> {
        if self.num_features != FEATURE_COUNT {
            return Err(ModelError::FeatureMismatch {
                expected: FEATURE_COUNT,
                actual: self.num_features,
            });
        }
        if self.trees.is_empty() {
            return Err(ModelError::EmptyForest);
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(index, self.num_features)?;
        }
        Ok(())
    }

    /// Forest shape, for startup logging and diagnostics
    pub fn stats(&self) -> ForestStats {
        ForestStats {
            num_trees: self.trees.len(),
            total_nodes: self.trees.iter().map(DecisionTree::node_count).sum(),
        }
    }
}

impl Classifier for QualityForest {
    fn predict_one(&self, features: &[f32; FEATURE_COUNT]) -> ModelResult<u8> {
        // One counter per possible ordinal; the artifact's classes are
        // u8 so this covers every vote a tree can cast.
        let mut votes = [0u32; 256];
        for (index, tree) in self.trees.iter().enumerate() {
            let class = tree.decide(index, features)?;
            votes[class as usize] += 1;
        }

        let mut winner = 0usize;
        for (class, &count) in votes.iter().enumerate() {
            // Strict comparison keeps the lower ordinal on ties
            if count > votes[winner] {
                winner = class;
            }
        }
        Ok(winner as u8)
    }
}

/// Forest shape summary
#[derive(Debug, Clone, Copy)]
pub struct ForestStats {
    /// Number of trees
    pub num_trees: usize,
    /// Total nodes across all trees
    pub total_nodes: usize,
}
