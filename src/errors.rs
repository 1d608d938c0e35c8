//! Error handling for the menu profitability predictor
//!
//! Every failure in the load → encode → predict pipeline is one variant of
//! [`ProfitError`]. Nothing here is retried: each error reflects either bad
//! input or a static mismatch between the trained artifacts.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use thiserror::Error;

/// Main error type for artifact loading, feature encoding and inference
#[derive(Error, Debug)]
pub enum ProfitError {
    #[error("Artifact unavailable: {artifact} - {reason}")]
    ArtifactUnavailable { artifact: String, reason: String },

    #[error("Unknown category: {category:?} is not in the encoder vocabulary")]
    UnknownCategory { category: String },

    #[error("Unknown class: model produced {class}, outside the label decoder range")]
    UnknownClass { class: i64 },

    #[error("Inference failed: {message}")]
    InferenceFailure { message: String },

    #[error("Missing field: {field} is required by the active feature layout")]
    MissingField { field: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Malformed {context}: {message}")]
    Serialization { context: String, message: String },
}

/// Result alias used across the crate
pub type ProfitResult<T> = Result<T, ProfitError>;

impl ProfitError {
    /// Create an artifact-unavailable error
    pub fn artifact(artifact: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ArtifactUnavailable {
            artifact: artifact.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown-category error
    pub fn unknown_category(category: impl Into<String>) -> Self {
        Self::UnknownCategory {
            category: category.into(),
        }
    }

    /// Create an unknown-class error
    pub fn unknown_class(class: i64) -> Self {
        Self::UnknownClass { class }
    }

    /// Create an inference failure
    pub fn inference(message: impl Into<String>) -> Self {
        Self::InferenceFailure {
            message: message.into(),
        }
    }

    /// Create a missing-field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an error for a body that could not be decoded
    pub fn serialization(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialization {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ProfitError::ArtifactUnavailable { .. } => "artifact_unavailable",
            ProfitError::UnknownCategory { .. } => "unknown_category",
            ProfitError::UnknownClass { .. } => "unknown_class",
            ProfitError::InferenceFailure { .. } => "inference_failure",
            ProfitError::MissingField { .. } => "missing_field",
            ProfitError::Validation { .. } => "validation",
            ProfitError::Config { .. } => "config",
            ProfitError::Serialization { .. } => "serialization",
        }
    }

    /// True when the caller can fix the request and try again
    pub fn is_rejected_input(&self) -> bool {
        matches!(
            self,
            ProfitError::UnknownCategory { .. }
                | ProfitError::MissingField { .. }
                | ProfitError::Validation { .. }
                | ProfitError::Serialization { .. }
        )
    }

    /// HTTP status used when the error crosses the API boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProfitError::UnknownCategory { .. }
            | ProfitError::MissingField { .. }
            | ProfitError::Validation { .. }
            | ProfitError::Serialization { .. } => StatusCode::BAD_REQUEST,
            ProfitError::ArtifactUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ProfitError::UnknownClass { .. }
            | ProfitError::InferenceFailure { .. }
            | ProfitError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProfitError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "error": self.to_string(),
            "kind": self.kind(),
        });

        (status, Json(body)).into_response()
    }
}

/// Convert from figment errors
impl From<figment::Error> for ProfitError {
    fn from(err: figment::Error) -> Self {
        ProfitError::config(err.to_string())
    }
}
