use crate::classifier::{Classifier, ModelOutput, ModelTask};
use crate::errors::{ProfitError, ProfitResult};
use serde::{Deserialize, Serialize};

fn default_model_id() -> String {
    "linear_v1".to_string()
}

/// Linear regression exported as intercept + coefficients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    #[serde(default = "default_model_id")]
    pub model_id: String,
    pub n_features: usize,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            model_id: default_model_id(),
            n_features: coefficients.len(),
            intercept,
            coefficients,
        }
    }

    pub fn validate(&self) -> ProfitResult<()> {
        if self.n_features == 0 {
            return Err(ProfitError::artifact("classifier", "linear model has no features"));
        }
        if self.coefficients.len() != self.n_features {
            return Err(ProfitError::artifact(
                "classifier",
                format!(
                    "linear model declares {} features but has {} coefficients",
                    self.n_features,
                    self.coefficients.len()
                ),
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ProfitError::artifact("classifier", "non-finite linear weights"));
        }
        Ok(())
    }

    /// intercept + sum(coefficient_i * feature_i)
    pub fn evaluate(&self, features: &[f64]) -> f64 {
        self.intercept
            + features
                .iter()
                .zip(self.coefficients.iter())
                .map(|(f, w)| f * w)
                .sum::<f64>()
    }
}

impl Classifier for LinearModel {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn task(&self) -> ModelTask {
        ModelTask::Regression
    }

    fn name(&self) -> &str {
        &self.model_id
    }

    fn predict_one(&self, features: &[f64]) -> ProfitResult<ModelOutput> {
        if features.len() != self.n_features {
            return Err(ProfitError::inference(format!(
                "linear model expects {} features, got {}",
                self.n_features,
                features.len()
            )));
        }

        let value = self.evaluate(features);
        if !value.is_finite() {
            return Err(ProfitError::inference("linear model produced a non-finite value"));
        }
        Ok(ModelOutput::Value(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_weighted_sum() {
        let model = LinearModel::new(-120.0, vec![0.0, 4.0, 1.5]);
        model.validate().unwrap();
        // -120 + 4*25 + 1.5*80
        assert_eq!(
            model.predict_one(&[2.0, 25.0, 80.0]).unwrap(),
            ModelOutput::Value(100.0)
        );
    }

    #[test]
    fn coefficient_count_must_match_declared_width() {
        let mut model = LinearModel::new(0.0, vec![1.0, 2.0]);
        model.n_features = 3;
        assert!(matches!(
            model.validate(),
            Err(ProfitError::ArtifactUnavailable { .. })
        ));
    }

    #[test]
    fn wrong_row_width_is_an_inference_failure() {
        let model = LinearModel::new(0.0, vec![1.0, 2.0]);
        assert!(matches!(
            model.predict_one(&[1.0]),
            Err(ProfitError::InferenceFailure { .. })
        ));
    }
}
