//! Feature layouts the classifier can be trained against.
//!
//! A layout fixes the length and order of the feature vector as well as the
//! kind of result the model produces. The layout is picked once, when the
//! artifacts are loaded, and never changes for the lifetime of the process.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One slot of a feature vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureField {
    /// Encoder code of the menu category
    CategoryCode,
    /// Menu price passed through the price scaler
    ScaledPrice,
    /// Encoder code of the restaurant location
    LocationCode,
    /// Average price, scaled when a scaler is configured
    AvgPrice,
    /// Number of customers
    CustomerCount,
}

impl FeatureField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureField::CategoryCode => "category_code",
            FeatureField::ScaledPrice => "scaled_price",
            FeatureField::LocationCode => "location_code",
            FeatureField::AvgPrice => "avg_price",
            FeatureField::CustomerCount => "customer_count",
        }
    }
}

/// Shape of the value a model returns for a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    /// Integer class mapped through the label decoder
    Categorical,
    /// Raw numeric estimate, no decoder involved
    Continuous,
}

const CATEGORY_ONLY_FIELDS: &[FeatureField] = &[FeatureField::CategoryCode];

const CATEGORY_PRICE_FIELDS: &[FeatureField] =
    &[FeatureField::CategoryCode, FeatureField::ScaledPrice];

const LOCATION_TRAFFIC_FIELDS: &[FeatureField] = &[
    FeatureField::LocationCode,
    FeatureField::AvgPrice,
    FeatureField::CustomerCount,
];

/// Closed set of feature layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureLayout {
    /// `[category_code]`, categorical result
    CategoryOnly,
    /// `[category_code, scaled_price]`, categorical result
    CategoryPrice,
    /// `[location_code, avg_price, customer_count]`, continuous result
    LocationTraffic,
}

impl FeatureLayout {
    /// Pick the layout implied by which optional artifacts are present
    pub fn select(has_price_scaler: bool, has_label_decoder: bool) -> Self {
        match (has_label_decoder, has_price_scaler) {
            (true, true) => FeatureLayout::CategoryPrice,
            (true, false) => FeatureLayout::CategoryOnly,
            (false, _) => FeatureLayout::LocationTraffic,
        }
    }

    /// Field order the classifier was trained with
    pub const fn fields(&self) -> &'static [FeatureField] {
        match self {
            FeatureLayout::CategoryOnly => CATEGORY_ONLY_FIELDS,
            FeatureLayout::CategoryPrice => CATEGORY_PRICE_FIELDS,
            FeatureLayout::LocationTraffic => LOCATION_TRAFFIC_FIELDS,
        }
    }

    pub const fn width(&self) -> usize {
        self.fields().len()
    }

    pub const fn result_kind(&self) -> ResultKind {
        match self {
            FeatureLayout::CategoryOnly | FeatureLayout::CategoryPrice => ResultKind::Categorical,
            FeatureLayout::LocationTraffic => ResultKind::Continuous,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureLayout::CategoryOnly => "category_only",
            FeatureLayout::CategoryPrice => "category_price",
            FeatureLayout::LocationTraffic => "location_traffic",
        }
    }

    /// Field names in order, for diagnostics and the model endpoint
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields().iter().map(FeatureField::as_str).collect()
    }
}

impl fmt::Display for FeatureLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_follows_present_artifacts() {
        assert_eq!(FeatureLayout::select(true, true), FeatureLayout::CategoryPrice);
        assert_eq!(FeatureLayout::select(false, true), FeatureLayout::CategoryOnly);
        assert_eq!(FeatureLayout::select(true, false), FeatureLayout::LocationTraffic);
        assert_eq!(FeatureLayout::select(false, false), FeatureLayout::LocationTraffic);
    }

    #[test]
    fn category_comes_before_price() {
        assert_eq!(
            FeatureLayout::CategoryPrice.field_names(),
            vec!["category_code", "scaled_price"]
        );
        assert_eq!(FeatureLayout::CategoryOnly.width(), 1);
        assert_eq!(FeatureLayout::LocationTraffic.width(), 3);
    }

    #[test]
    fn only_traffic_layout_is_continuous() {
        assert_eq!(FeatureLayout::CategoryOnly.result_kind(), ResultKind::Categorical);
        assert_eq!(FeatureLayout::CategoryPrice.result_kind(), ResultKind::Categorical);
        assert_eq!(FeatureLayout::LocationTraffic.result_kind(), ResultKind::Continuous);
    }
}
