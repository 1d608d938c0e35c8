//! Inference service: runs the loaded model on one feature vector and maps
//! the raw output back to a profitability label or an estimate.

use crate::artifacts::Artifacts;
use crate::classifier::ModelOutput;
use crate::codec::FeatureVector;
use crate::errors::{ProfitError, ProfitResult};
use crate::layout::ResultKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Categorical profitability estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfitabilityLabel {
    High,
    Medium,
    Low,
}

impl ProfitabilityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfitabilityLabel::High => "High",
            ProfitabilityLabel::Medium => "Medium",
            ProfitabilityLabel::Low => "Low",
        }
    }

    /// How a front end should present this label
    pub fn tone(&self) -> Tone {
        match self {
            ProfitabilityLabel::High => Tone::Success,
            ProfitabilityLabel::Medium => Tone::Info,
            ProfitabilityLabel::Low => Tone::Error,
        }
    }
}

impl FromStr for ProfitabilityLabel {
    type Err = ProfitError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "high" => Ok(ProfitabilityLabel::High),
            "medium" => Ok(ProfitabilityLabel::Medium),
            "low" => Ok(ProfitabilityLabel::Low),
            _ => Err(ProfitError::validation(
                "profitability_label",
                format!("unknown label {input:?}"),
            )),
        }
    }
}

impl fmt::Display for ProfitabilityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation hint for a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Success,
    Info,
    Error,
}

/// Result of one prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Prediction {
    /// Decoded categorical label
    Label(ProfitabilityLabel),
    /// Raw model output, returned when no label decoder is configured
    Estimate(f64),
}

impl Prediction {
    pub fn label(&self) -> Option<ProfitabilityLabel> {
        match self {
            Prediction::Label(label) => Some(*label),
            Prediction::Estimate(_) => None,
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Prediction::Label(label) => label.tone(),
            Prediction::Estimate(_) => Tone::Info,
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prediction::Label(label) => write!(f, "{label}"),
            Prediction::Estimate(value) => write!(f, "{value:.2}"),
        }
    }
}

/// Wraps the model's single-row predict call and the reverse label decode
#[derive(Clone)]
pub struct InferenceService {
    artifacts: Arc<Artifacts>,
}

impl InferenceService {
    pub fn new(artifacts: Arc<Artifacts>) -> Self {
        Self { artifacts }
    }

    pub fn predict(&self, vector: &FeatureVector) -> ProfitResult<Prediction> {
        let layout = self.artifacts.layout();
        if vector.layout() != layout {
            return Err(ProfitError::inference(format!(
                "vector built for layout {} but model uses {}",
                vector.layout(),
                layout
            )));
        }

        let classifier = self.artifacts.classifier();
        if vector.len() != classifier.n_features() {
            return Err(ProfitError::inference(format!(
                "model {} expects {} features, vector has {}",
                classifier.name(),
                classifier.n_features(),
                vector.len()
            )));
        }

        let output = classifier.predict_one(vector.as_slice())?;
        tracing::debug!(model = classifier.name(), ?output, "model output");

        match (layout.result_kind(), output) {
            (ResultKind::Categorical, ModelOutput::Class(class)) => {
                let decoder = self.artifacts.label_decoder().ok_or_else(|| {
                    ProfitError::inference("categorical layout without a label decoder")
                })?;
                decoder.decode(class).map(Prediction::Label)
            }
            (ResultKind::Categorical, ModelOutput::Value(value)) => Err(ProfitError::inference(
                format!("expected a class from {}, got value {value}", classifier.name()),
            )),
            (ResultKind::Continuous, ModelOutput::Value(value)) => Ok(Prediction::Estimate(value)),
            (ResultKind::Continuous, ModelOutput::Class(class)) => {
                Ok(Prediction::Estimate(class as f64))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!("High".parse::<ProfitabilityLabel>().unwrap(), ProfitabilityLabel::High);
        assert_eq!(" medium ".parse::<ProfitabilityLabel>().unwrap(), ProfitabilityLabel::Medium);
        assert!("Excellent".parse::<ProfitabilityLabel>().is_err());
    }

    #[test]
    fn tone_follows_label() {
        assert_eq!(ProfitabilityLabel::High.tone(), Tone::Success);
        assert_eq!(ProfitabilityLabel::Medium.tone(), Tone::Info);
        assert_eq!(ProfitabilityLabel::Low.tone(), Tone::Error);
        assert_eq!(Prediction::Estimate(12.0).tone(), Tone::Info);
    }

    #[test]
    fn prediction_serializes_with_kind_tag() {
        let json = serde_json::to_value(Prediction::Label(ProfitabilityLabel::Low)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "label", "value": "Low"}));

        let json = serde_json::to_value(Prediction::Estimate(1.5)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "estimate", "value": 1.5}));
    }
}
