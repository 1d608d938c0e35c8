use crate::artifacts::ArtifactSummary;
use crate::codec::RawInput;
use crate::errors::{ProfitError, ProfitResult};
use crate::predictor::{PredictionReport, Predictor};
use axum::{
    extract::{rejection::JsonRejection, Extension},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// Router exposing prediction, vocabulary, model metadata and health checks
pub fn build_router(predictor: Arc<Predictor>) -> Router {
    Router::new()
        .route("/api/predict", post(predict))
        .route("/api/categories", get(categories))
        .route("/api/model", get(model))
        // versioned aliases
        .route("/v1/predict", post(predict))
        .route("/v1/categories", get(categories))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .layer(Extension(predictor))
}

/// Same router with a permissive CORS layer for browser front ends
pub fn build_public_router(predictor: Arc<Predictor>) -> Router {
    build_router(predictor).layer(CorsLayer::permissive())
}

async fn predict(
    Extension(predictor): Extension<Arc<Predictor>>,
    body: Result<Json<RawInput>, JsonRejection>,
) -> ProfitResult<Json<PredictionReport>> {
    let Json(input) = body.map_err(|rejection| {
        ProfitError::serialization("request body", rejection.body_text())
    })?;
    predictor.predict(&input).map(Json)
}

async fn categories(Extension(predictor): Extension<Arc<Predictor>>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: predictor.codec().vocabulary().to_vec(),
    })
}

async fn model(Extension(predictor): Extension<Arc<Predictor>>) -> Json<ArtifactSummary> {
    Json(predictor.artifacts().summary())
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn readyz(Extension(predictor): Extension<Arc<Predictor>>) -> Json<serde_json::Value> {
    let summary = predictor.artifacts().summary();
    Json(serde_json::json!({
        "ready": true,
        "model": summary.model,
        "layout": summary.layout,
    }))
}
