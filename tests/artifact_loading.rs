//! Loading artifacts from disk: the shipped demo models, missing files,
//! corrupt blobs and optional artifacts that are absent.

use menu_profit::{
    ArtifactPaths, Artifacts, FeatureLayout, Prediction, Predictor, ProfitError, RawInput,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn models_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("models")
}

fn demo_paths() -> ArtifactPaths {
    let dir = models_dir();
    ArtifactPaths {
        classifier: dir.join("best_random_forest_model.json"),
        category_encoder: dir.join("menu_category_encoder.json"),
        price_scaler: Some(dir.join("price_scaler.json")),
        label_decoder: Some(dir.join("profitability_encoder.json")),
    }
}

/// Copy the demo artifacts into a scratch directory so tests can break them
fn scratch_copy() -> (TempDir, ArtifactPaths) {
    let temp_dir = TempDir::new().expect("temp dir should be created");
    let src = demo_paths();
    let copy = |from: &Path| {
        let to = temp_dir.path().join(from.file_name().unwrap());
        fs::copy(from, &to).expect("copy artifact");
        to
    };

    let paths = ArtifactPaths {
        classifier: copy(&src.classifier),
        category_encoder: copy(&src.category_encoder),
        price_scaler: src.price_scaler.as_deref().map(copy),
        label_decoder: src.label_decoder.as_deref().map(copy),
    };
    (temp_dir, paths)
}

#[test]
fn demo_artifacts_load_with_category_price_layout() {
    let artifacts = Artifacts::load(&demo_paths()).expect("demo artifacts load");

    assert_eq!(artifacts.layout(), FeatureLayout::CategoryPrice);
    assert_eq!(artifacts.category_encoder().len(), 4);
    assert_eq!(artifacts.fingerprints().len(), 4);
    for fp in artifacts.fingerprints() {
        assert_eq!(fp.sha256.len(), 64);
    }

    let summary = artifacts.summary();
    assert_eq!(summary.model, "menu_profitability_rf_v1");
    assert_eq!(summary.fields, vec!["category_code", "scaled_price"]);
    assert_eq!(summary.labels, vec!["High", "Low", "Medium"]);
}

#[test]
fn loaded_demo_predicts_beverages() {
    let artifacts = Artifacts::load(&demo_paths()).unwrap();
    let predictor = Predictor::new(Arc::new(artifacts));

    let report = predictor
        .predict(&RawInput::new("Beverages").with_price(2.50))
        .unwrap();
    let label = report.prediction.label().expect("categorical result");
    assert!(["High", "Medium", "Low"].contains(&label.as_str()));
}

#[test]
fn missing_classifier_file_is_artifact_unavailable() {
    let (_dir, mut paths) = scratch_copy();
    fs::remove_file(&paths.classifier).unwrap();
    paths.classifier = paths.classifier.with_file_name("gone.json");

    let err = Artifacts::load(&paths).unwrap_err();
    match err {
        ProfitError::ArtifactUnavailable { artifact, .. } => assert_eq!(artifact, "classifier"),
        other => panic!("expected ArtifactUnavailable, got {other:?}"),
    }
}

#[test]
fn corrupt_encoder_is_artifact_unavailable() {
    let (_dir, paths) = scratch_copy();
    fs::write(&paths.category_encoder, b"{ not json").unwrap();

    let err = Artifacts::load(&paths).unwrap_err();
    assert!(matches!(err, ProfitError::ArtifactUnavailable { ref artifact, .. } if artifact == "category_encoder"));
    assert!(err.to_string().contains("corrupt"));
}

#[test]
fn corrupt_optional_artifact_still_fails() {
    let (_dir, paths) = scratch_copy();
    let scaler = paths.price_scaler.clone().unwrap();
    fs::write(&scaler, br#"{"kind": "standard", "mean": 1.0, "scale": 0.0}"#).unwrap();

    let err = Artifacts::load(&paths).unwrap_err();
    assert!(matches!(err, ProfitError::ArtifactUnavailable { ref artifact, .. } if artifact == "price_scaler"));
}

#[test]
fn absent_scaler_with_two_feature_model_is_rejected() {
    let (_dir, paths) = scratch_copy();
    fs::remove_file(paths.price_scaler.as_ref().unwrap()).unwrap();

    // the forest was trained on [code, price]; a one-field layout cannot feed it
    let err = Artifacts::load(&paths).unwrap_err();
    assert!(matches!(err, ProfitError::ArtifactUnavailable { ref artifact, .. } if artifact == "classifier"));
}

#[test]
fn category_only_model_loads_without_scaler() {
    let (dir, mut paths) = scratch_copy();
    fs::remove_file(paths.price_scaler.as_ref().unwrap()).unwrap();

    let model = r#"{
        "kind": "random_forest",
        "n_features": 1,
        "task": "classification",
        "n_classes": 3,
        "trees": [{"nodes": [
            {"feature": 0, "threshold": 1.5, "left": 1, "right": 2},
            {"value": [1.0, 0.0, 3.0]},
            {"value": [4.0, 1.0, 0.0]}
        ]}]
    }"#;
    paths.classifier = dir.path().join("category_only.json");
    fs::write(&paths.classifier, model).unwrap();

    let artifacts = Artifacts::load(&paths).unwrap();
    assert_eq!(artifacts.layout(), FeatureLayout::CategoryOnly);
    assert_eq!(artifacts.fingerprints().len(), 3);

    let predictor = Predictor::new(Arc::new(artifacts));
    let vector = predictor
        .codec()
        .encode(&RawInput::new("Dessert"))
        .unwrap();
    assert_eq!(vector.as_slice(), &[2.0]);

    let report = predictor.predict(&RawInput::new("Dessert")).unwrap();
    assert_eq!(report.prediction.to_string(), "High");
}

#[test]
fn traffic_models_produce_estimates() {
    let dir = models_dir().join("traffic");
    let paths = ArtifactPaths {
        classifier: dir.join("traffic_model.json"),
        category_encoder: dir.join("location_encoder.json"),
        price_scaler: None,
        label_decoder: None,
    };

    let artifacts = Artifacts::load(&paths).unwrap();
    assert_eq!(artifacts.layout(), FeatureLayout::LocationTraffic);

    let report = Predictor::new(Arc::new(artifacts))
        .predict(&RawInput::new("Downtown").with_price(20.0).with_customers(150))
        .unwrap();
    match report.prediction {
        Prediction::Estimate(value) => assert!((value - 520.0).abs() < 1e-6),
        other => panic!("expected an estimate, got {other:?}"),
    }
}
