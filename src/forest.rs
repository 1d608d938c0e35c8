//! Random forest exported from the offline training run.
//!
//! Trees are flattened node arrays in pre-order: a split sends a row to
//! `left` when `x[feature] <= threshold`, otherwise to `right`. Leaves carry
//! per-class weights (classification) or a single value (regression).

use crate::classifier::{Classifier, ModelOutput, ModelTask};
use crate::errors::{ProfitError, ProfitResult};
use serde::{Deserialize, Serialize};

fn default_model_id() -> String {
    "random_forest_v1".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn validate(
        &self,
        tree_idx: usize,
        n_features: usize,
        task: ModelTask,
        leaf_width: usize,
    ) -> ProfitResult<()> {
        let corrupt = |reason: String| {
            ProfitError::artifact("classifier", format!("tree {tree_idx}: {reason}"))
        };

        if self.nodes.is_empty() {
            return Err(corrupt("no nodes".into()));
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(corrupt(format!(
                            "node {idx} splits on feature {feature}, model has {n_features}"
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(corrupt(format!("node {idx} has a non-finite threshold")));
                    }
                    // children always follow their parent, so traversal cannot loop
                    for child in [*left, *right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(corrupt(format!(
                                "node {idx} points to invalid child {child}"
                            )));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != leaf_width {
                        return Err(corrupt(format!(
                            "leaf {idx} has {} values, expected {leaf_width}",
                            value.len()
                        )));
                    }
                    if value.iter().any(|v| !v.is_finite()) {
                        return Err(corrupt(format!("leaf {idx} has non-finite values")));
                    }
                    if task == ModelTask::Classification
                        && (value.iter().any(|v| *v < 0.0) || value.iter().sum::<f64>() <= 0.0)
                    {
                        return Err(corrupt(format!(
                            "leaf {idx} class weights must be non-negative with a positive sum"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk from the root to the leaf responsible for `features`
    pub fn leaf(&self, features: &[f64]) -> ProfitResult<&[f64]> {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { value }) => return Ok(value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = features.get(*feature).ok_or_else(|| {
                        ProfitError::inference(format!("feature {feature} missing from row"))
                    })?;
                    idx = if *x <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(ProfitError::inference(format!(
                        "tree node {idx} out of range"
                    )))
                }
            }
        }
    }
}

/// Bagged ensemble of decision trees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    #[serde(default = "default_model_id")]
    pub model_id: String,
    pub n_features: usize,
    pub task: ModelTask,
    #[serde(default)]
    pub n_classes: Option<usize>,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn validate(&self) -> ProfitResult<()> {
        if self.n_features == 0 {
            return Err(ProfitError::artifact("classifier", "forest has no features"));
        }
        if self.trees.is_empty() {
            return Err(ProfitError::artifact("classifier", "forest has no trees"));
        }

        let leaf_width = match (self.task, self.n_classes) {
            (ModelTask::Classification, Some(n)) if n > 0 => n,
            (ModelTask::Classification, _) => {
                return Err(ProfitError::artifact(
                    "classifier",
                    "classification forest must declare n_classes",
                ))
            }
            (ModelTask::Regression, _) => 1,
        };

        for (tree_idx, tree) in self.trees.iter().enumerate() {
            tree.validate(tree_idx, self.n_features, self.task, leaf_width)?;
        }
        Ok(())
    }

    /// Mean of the per-tree class distributions
    pub fn predict_proba(&self, features: &[f64]) -> ProfitResult<Vec<f64>> {
        let n_classes = self.n_classes.unwrap_or(0);
        let mut proba = vec![0.0; n_classes];
        let mut voters = 0usize;

        for tree in &self.trees {
            let leaf = tree.leaf(features)?;
            let total: f64 = leaf.iter().sum();
            if total <= 0.0 {
                continue;
            }
            voters += 1;
            for (acc, weight) in proba.iter_mut().zip(leaf) {
                *acc += weight / total;
            }
        }

        if voters == 0 {
            return Err(ProfitError::inference(
                "no tree produced class weights for this row",
            ));
        }

        let n_trees = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n_trees);
        Ok(proba)
    }

    fn predict_class(&self, features: &[f64]) -> ProfitResult<i64> {
        let proba = self.predict_proba(features)?;
        let mut best: Option<(usize, f64)> = None;
        for (idx, p) in proba.iter().copied().enumerate() {
            // first class wins ties
            if best.map_or(true, |(_, top)| p > top) {
                best = Some((idx, p));
            }
        }

        best.map(|(idx, _)| idx as i64)
            .ok_or_else(|| ProfitError::inference("forest produced no class scores"))
    }

    fn predict_value(&self, features: &[f64]) -> ProfitResult<f64> {
        let mut sum = 0.0;
        for tree in &self.trees {
            let leaf = tree.leaf(features)?;
            sum += leaf.first().copied().unwrap_or(0.0);
        }
        Ok(sum / self.trees.len() as f64)
    }
}

impl Classifier for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn task(&self) -> ModelTask {
        self.task
    }

    fn n_classes(&self) -> Option<usize> {
        match self.task {
            ModelTask::Classification => self.n_classes,
            ModelTask::Regression => None,
        }
    }

    fn name(&self) -> &str {
        &self.model_id
    }

    fn predict_one(&self, features: &[f64]) -> ProfitResult<ModelOutput> {
        if features.len() != self.n_features {
            return Err(ProfitError::inference(format!(
                "forest expects {} features, got {}",
                self.n_features,
                features.len()
            )));
        }

        match self.task {
            ModelTask::Classification => self.predict_class(features).map(ModelOutput::Class),
            ModelTask::Regression => self.predict_value(features).map(ModelOutput::Value),
        }
    }
}
