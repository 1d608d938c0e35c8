//! Feature codec: raw user fields in, the exact feature vector the model was
//! trained on out.

use crate::artifacts::Artifacts;
use crate::errors::{ProfitError, ProfitResult};
use crate::layout::{FeatureField, FeatureLayout};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Non-negative, finite menu price in USD
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> ProfitResult<Self> {
        if !value.is_finite() {
            return Err(ProfitError::validation("price", "must be a finite number"));
        }
        if value < 0.0 {
            return Err(ProfitError::validation("price", "must not be negative"));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Raw field values supplied by a front end.
///
/// `category` is matched against the category encoder's vocabulary; for the
/// location/traffic layout that vocabulary holds location names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    pub category: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub customer_count: Option<u32>,
}

impl RawInput {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            price: None,
            customer_count: None,
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_customers(mut self, customer_count: u32) -> Self {
        self.customer_count = Some(customer_count);
        self
    }
}

/// Ordered model input, tagged with the layout that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    layout: FeatureLayout,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn layout(&self) -> FeatureLayout {
        self.layout
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Translates [`RawInput`] into a [`FeatureVector`] using the loaded encoders
#[derive(Clone)]
pub struct FeatureCodec {
    artifacts: Arc<Artifacts>,
}

impl FeatureCodec {
    pub fn new(artifacts: Arc<Artifacts>) -> Self {
        Self { artifacts }
    }

    pub fn layout(&self) -> FeatureLayout {
        self.artifacts.layout()
    }

    /// Categories accepted by `encode`, in code order
    pub fn vocabulary(&self) -> &[String] {
        self.artifacts.category_encoder().vocabulary()
    }

    pub fn encode(&self, input: &RawInput) -> ProfitResult<FeatureVector> {
        let layout = self.artifacts.layout();
        let code = self.artifacts.category_encoder().encode(&input.category)? as f64;

        let mut values = Vec::with_capacity(layout.width());
        for field in layout.fields() {
            let value = match field {
                FeatureField::CategoryCode | FeatureField::LocationCode => code,
                FeatureField::ScaledPrice | FeatureField::AvgPrice => {
                    self.encode_price(*field, input.price)?
                }
                FeatureField::CustomerCount => input
                    .customer_count
                    .map(f64::from)
                    .ok_or_else(|| ProfitError::missing_field(field.as_str()))?,
            };
            values.push(value);
        }

        Ok(FeatureVector { layout, values })
    }

    fn encode_price(&self, field: FeatureField, price: Option<f64>) -> ProfitResult<f64> {
        let raw = price.ok_or_else(|| ProfitError::missing_field(field.as_str()))?;
        let price = Price::new(raw)?;

        match (field, self.artifacts.price_scaler()) {
            (_, Some(scaler)) => Ok(scaler.normalize(price.value())),
            (FeatureField::AvgPrice, None) => Ok(price.value()),
            (_, None) => Err(ProfitError::inference(
                "scaled price requested without a price scaler",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_rejects_negative_and_non_finite() {
        assert!(Price::new(0.0).is_ok());
        assert!(Price::new(1e9).is_ok());
        assert!(matches!(Price::new(-0.01), Err(ProfitError::Validation { .. })));
        assert!(Price::new(f64::NAN).is_err());
        assert!(Price::new(f64::INFINITY).is_err());
    }

    #[test]
    fn raw_input_builder() {
        let input = RawInput::new("Downtown").with_price(18.0).with_customers(240);
        assert_eq!(input.category, "Downtown");
        assert_eq!(input.price, Some(18.0));
        assert_eq!(input.customer_count, Some(240));
    }

    #[test]
    fn raw_input_optional_fields_default_to_none() {
        let input: RawInput = serde_json::from_str(r#"{"category": "Dessert"}"#).unwrap();
        assert_eq!(input, RawInput::new("Dessert"));
    }
}
