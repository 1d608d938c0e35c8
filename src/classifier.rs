//! Model abstraction sitting between the feature codec and the concrete
//! trained estimators.
//!
//! Concrete models (`forest`, `linear_model`) are deserialized from a single
//! tagged JSON artifact. Anything else implementing [`Classifier`] can be
//! handed to `Artifacts::from_parts`, which is how tests inject fixtures.

use crate::errors::ProfitResult;
use crate::forest::RandomForest;
use crate::linear_model::LinearModel;
use serde::{Deserialize, Serialize};

/// What the estimator was fitted to predict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTask {
    Classification,
    Regression,
}

/// Output of a single-row prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelOutput {
    /// Integer class index
    Class(i64),
    /// Continuous value
    Value(f64),
}

/// Single-vector-in, single-result-out estimator
pub trait Classifier: Send + Sync {
    /// Number of features the model was trained on
    fn n_features(&self) -> usize;

    fn task(&self) -> ModelTask;

    /// Number of classes, when the model knows it
    fn n_classes(&self) -> Option<usize> {
        None
    }

    /// Short identifier for logs and diagnostics
    fn name(&self) -> &str;

    /// Predict one row. Callers guarantee `features.len() == n_features()`.
    fn predict_one(&self, features: &[f64]) -> ProfitResult<ModelOutput>;
}

/// Classifier artifact as exported by the training run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    RandomForest(RandomForest),
    Linear(LinearModel),
}

impl ModelArtifact {
    /// Structural checks run once at load time
    pub fn validate(&self) -> ProfitResult<()> {
        match self {
            ModelArtifact::RandomForest(forest) => forest.validate(),
            ModelArtifact::Linear(model) => model.validate(),
        }
    }
}

impl Classifier for ModelArtifact {
    fn n_features(&self) -> usize {
        match self {
            ModelArtifact::RandomForest(forest) => forest.n_features(),
            ModelArtifact::Linear(model) => model.n_features(),
        }
    }

    fn task(&self) -> ModelTask {
        match self {
            ModelArtifact::RandomForest(forest) => forest.task(),
            ModelArtifact::Linear(model) => model.task(),
        }
    }

    fn n_classes(&self) -> Option<usize> {
        match self {
            ModelArtifact::RandomForest(forest) => forest.n_classes(),
            ModelArtifact::Linear(model) => model.n_classes(),
        }
    }

    fn name(&self) -> &str {
        match self {
            ModelArtifact::RandomForest(forest) => forest.name(),
            ModelArtifact::Linear(model) => model.name(),
        }
    }

    fn predict_one(&self, features: &[f64]) -> ProfitResult<ModelOutput> {
        match self {
            ModelArtifact::RandomForest(forest) => forest.predict_one(features),
            ModelArtifact::Linear(model) => model.predict_one(features),
        }
    }
}
