// Purpose: Categorical encoders and the price scaler exported from the training run

use crate::errors::{ProfitError, ProfitResult};
use crate::inference::ProfitabilityLabel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// On-disk form shared by both label encoders: the fitted `classes` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderClasses {
    pub classes: Vec<String>,
}

/// Maps a category string to the integer code the model was trained with.
///
/// The code of a class is its position in `classes`.
#[derive(Debug, Clone)]
pub struct CategoryEncoder {
    classes: Vec<String>,
    index: HashMap<String, usize>,
}

impl CategoryEncoder {
    pub fn new(classes: Vec<String>) -> ProfitResult<Self> {
        if classes.is_empty() {
            return Err(ProfitError::artifact(
                "category_encoder",
                "vocabulary is empty",
            ));
        }

        let mut index = HashMap::with_capacity(classes.len());
        for (code, class) in classes.iter().enumerate() {
            if index.insert(class.clone(), code).is_some() {
                return Err(ProfitError::artifact(
                    "category_encoder",
                    format!("duplicate class {class:?}"),
                ));
            }
        }

        Ok(Self { classes, index })
    }

    /// Code for a known category; never falls back to a default
    pub fn encode(&self, category: &str) -> ProfitResult<usize> {
        self.index
            .get(category)
            .copied()
            .ok_or_else(|| ProfitError::unknown_category(category))
    }

    /// Known categories in code order
    pub fn vocabulary(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl TryFrom<EncoderClasses> for CategoryEncoder {
    type Error = ProfitError;

    fn try_from(raw: EncoderClasses) -> ProfitResult<Self> {
        Self::new(raw.classes)
    }
}

/// Maps a predicted class number back to a profitability label.
#[derive(Debug, Clone)]
pub struct LabelDecoder {
    labels: Vec<ProfitabilityLabel>,
}

impl LabelDecoder {
    pub fn new(labels: Vec<ProfitabilityLabel>) -> ProfitResult<Self> {
        if labels.is_empty() {
            return Err(ProfitError::artifact("label_decoder", "no classes"));
        }
        Ok(Self { labels })
    }

    pub fn decode(&self, class: i64) -> ProfitResult<ProfitabilityLabel> {
        usize::try_from(class)
            .ok()
            .and_then(|idx| self.labels.get(idx))
            .copied()
            .ok_or_else(|| ProfitError::unknown_class(class))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[ProfitabilityLabel] {
        &self.labels
    }
}

impl TryFrom<EncoderClasses> for LabelDecoder {
    type Error = ProfitError;

    fn try_from(raw: EncoderClasses) -> ProfitResult<Self> {
        let labels = raw
            .classes
            .iter()
            .map(|class| {
                ProfitabilityLabel::from_str(class).map_err(|_| {
                    ProfitError::artifact(
                        "label_decoder",
                        format!("unsupported profitability label {class:?}"),
                    )
                })
            })
            .collect::<ProfitResult<Vec<_>>>()?;
        Self::new(labels)
    }
}

/// Price normalization fitted at training time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PriceScaler {
    /// `(x - mean) / scale`
    Standard { mean: f64, scale: f64 },
    /// `(x - data_min) / (data_max - data_min)`
    MinMax { data_min: f64, data_max: f64 },
}

impl PriceScaler {
    /// Reject parameters that would divide by zero or produce NaN
    pub fn validate(&self) -> ProfitResult<()> {
        let ok = match *self {
            PriceScaler::Standard { mean, scale } => {
                mean.is_finite() && scale.is_finite() && scale > 0.0
            }
            PriceScaler::MinMax { data_min, data_max } => {
                data_min.is_finite() && data_max.is_finite() && data_max > data_min
            }
        };

        if ok {
            Ok(())
        } else {
            Err(ProfitError::artifact(
                "price_scaler",
                format!("degenerate scaler parameters: {self:?}"),
            ))
        }
    }

    pub fn normalize(&self, price: f64) -> f64 {
        match *self {
            PriceScaler::Standard { mean, scale } => (price - mean) / scale,
            PriceScaler::MinMax { data_min, data_max } => {
                (price - data_min) / (data_max - data_min)
            }
        }
    }
}
