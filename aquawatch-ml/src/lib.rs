//! Frozen Random-Forest Inference for Water-Quality Classification
//!
//! ## Overview
//!
//! The quality classifier is trained offline (an ensemble of decision
//! trees over the three sensor features) and shipped to the dashboard
//! as a JSON artifact. This crate only *evaluates* that artifact -
//! there is no training code, no randomness, and no mutation after
//! load. Evaluation of one sample is a handful of comparisons per
//! tree, so batch classification of a 100-row series is microseconds.
//!
//! ## Artifact Contract
//!
//! The artifact declares its feature count and carries one node array
//! per tree:
//!
//! ```text
//! {
//!   "num_features": 3,
//!   "trees": [
//!     { "nodes": [
//!       { "kind": "split", "feature": 2, "threshold": 6.8,
//!         "left": 1, "right": 2 },
//!       { "kind": "leaf", "class": 0 },
//!       { "kind": "leaf", "class": 2 }
//!     ]}
//!   ]
//! }
//! ```
//!
//! Feature order is fixed by training: `[temperature, turbidity, ph]`.
//! The structure is validated once at load - feature indices inside the
//! declared count, child indices inside the node array, no empty trees -
//! so the hot path can walk trees without re-checking the artifact on
//! every prediction.
//!
//! ## Failure Behavior
//!
//! A missing or corrupt artifact surfaces as a [`ModelError`] at load
//! time; the dashboard then runs with predictions disabled rather than
//! crashing. Per-sample failures (a cyclic tree that slipped past an
//! older validator) fail that one prediction only.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod forest;
pub mod node;
pub mod tree;

// Public API
pub use forest::{ForestStats, QualityForest};
pub use node::ForestNode;
pub use tree::DecisionTree;

use thiserror::Error;

/// Number of features the water-quality model consumes
///
/// Fixed by the training pipeline: `[temperature, turbidity, ph]`.
pub const FEATURE_COUNT: usize = 3;

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors loading or evaluating the classifier artifact
#[derive(Error, Debug)]
pub enum ModelError {
    /// Artifact file could not be read
    #[error("failed to read model artifact")]
    Io(#[from] std::io::Error),

    /// Artifact is not valid JSON for the expected schema
    #[error("malformed model artifact")]
    MalformedArtifact(#[from] serde_json::Error),

    /// Artifact parsed but holds no trees
    #[error("model artifact contains no trees")]
    EmptyForest,

    /// Artifact was trained on a different feature count
    #[error("model expects {actual} features, this system provides {expected}")]
    FeatureMismatch {
        /// Features this system provides
        expected: usize,
        /// Features the artifact declares
        actual: usize,
    },

    /// A tree's node array is structurally invalid
    #[error("tree {tree} is corrupt: {reason}")]
    CorruptTree {
        /// Index of the offending tree
        tree: usize,
        /// What the validator tripped on
        reason: &'static str,
    },
}

/// Seam between the pipeline and whatever produces quality ordinals
///
/// [`QualityForest`] is the production implementation; tests script
/// their own.
pub trait Classifier: Send + Sync {
    /// Classify one `[temperature, turbidity, ph]` sample into a raw
    /// class ordinal
    fn predict_one(&self, features: &[f32; FEATURE_COUNT]) -> ModelResult<u8>;

    /// Classify a batch, one ordinal per sample
    fn predict(&self, batch: &[[f32; FEATURE_COUNT]]) -> ModelResult<Vec<u8>> {
        batch.iter().map(|sample| self.predict_one(sample)).collect()
    }

    /// Classify a sensor reading directly
    fn predict_reading(&self, reading: &aquawatch_core::SensorReading) -> ModelResult<u8> {
        self.predict_one(&reading.features())
    }
}
