//! Library root for the `menu_profit` crate
//!
//! Loads a trained menu-profitability model with its encoders, turns raw menu
//! item fields into the model's feature vector and decodes the prediction.

// Core error handling
pub mod errors;

// Trained artifacts
pub mod artifacts;
pub mod classifier;
pub mod encoders;
pub mod forest;
pub mod linear_model;

// Feature layout, encoding and inference
pub mod codec;
pub mod inference;
pub mod layout;
pub mod predictor;

// Configuration & CLI
pub mod cli;
pub mod config_loader;

// Web server interface
pub mod web;


pub use artifacts::{ArtifactPaths, Artifacts};
pub use codec::{FeatureCodec, FeatureVector, Price, RawInput};
pub use errors::{ProfitError, ProfitResult};
pub use inference::{InferenceService, Prediction, ProfitabilityLabel};
pub use layout::{FeatureLayout, ResultKind};
pub use predictor::{PredictionReport, Predictor};
