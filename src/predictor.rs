// Purpose: One request through codec and inference, packaged for a front end

use crate::artifacts::Artifacts;
use crate::codec::{FeatureCodec, RawInput};
use crate::errors::ProfitResult;
use crate::inference::{InferenceService, Prediction, Tone};
use crate::layout::FeatureLayout;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Everything a front end needs to render one prediction
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub request_id: Uuid,
    pub category: String,
    pub layout: FeatureLayout,
    pub prediction: Prediction,
    pub tone: Tone,
    pub predicted_at: DateTime<Utc>,
}

/// Feature codec and inference service sharing one artifact set
#[derive(Clone)]
pub struct Predictor {
    artifacts: Arc<Artifacts>,
    codec: FeatureCodec,
    inference: InferenceService,
}

impl Predictor {
    pub fn new(artifacts: Arc<Artifacts>) -> Self {
        Self {
            codec: FeatureCodec::new(Arc::clone(&artifacts)),
            inference: InferenceService::new(Arc::clone(&artifacts)),
            artifacts,
        }
    }

    pub fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }

    pub fn codec(&self) -> &FeatureCodec {
        &self.codec
    }

    pub fn inference(&self) -> &InferenceService {
        &self.inference
    }

    pub fn predict(&self, input: &RawInput) -> ProfitResult<PredictionReport> {
        let request_id = Uuid::new_v4();

        let result = self
            .codec
            .encode(input)
            .and_then(|vector| self.inference.predict(&vector));

        let prediction = match result {
            Ok(prediction) => prediction,
            Err(err) => {
                if err.is_rejected_input() {
                    tracing::warn!(%request_id, category = %input.category, error = %err, "input rejected");
                } else {
                    tracing::error!(%request_id, category = %input.category, error = %err, "prediction failed");
                }
                return Err(err);
            }
        };

        tracing::info!(
            %request_id,
            category = %input.category,
            result = %prediction,
            "prediction served"
        );

        Ok(PredictionReport {
            request_id,
            category: input.category.clone(),
            layout: self.artifacts.layout(),
            tone: prediction.tone(),
            prediction,
            predicted_at: Utc::now(),
        })
    }
}
