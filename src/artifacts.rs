//! Artifact store: the trained model plus its encoders, loaded once and
//! shared read-only for the rest of the process.
//!
//! The feature layout is decided here, from which optional artifacts exist,
//! and checked against the model's declared input width. A mismatch is a
//! load failure rather than a silently wrong prediction later on.

use crate::classifier::{Classifier, ModelArtifact, ModelTask};
use crate::config_loader::ArtifactConfig;
use crate::encoders::{CategoryEncoder, EncoderClasses, LabelDecoder, PriceScaler};
use crate::errors::{ProfitError, ProfitResult};
use crate::layout::{FeatureLayout, ResultKind};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where each artifact lives on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub classifier: PathBuf,
    pub category_encoder: PathBuf,
    pub price_scaler: Option<PathBuf>,
    pub label_decoder: Option<PathBuf>,
}

impl ArtifactPaths {
    /// Resolve configured file names against the artifact directory
    pub fn from_config(cfg: &ArtifactConfig) -> Self {
        let dir = Path::new(&cfg.dir);
        let optional = |name: &Option<String>| {
            name.as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(|n| dir.join(n))
        };

        Self {
            classifier: dir.join(&cfg.classifier),
            category_encoder: dir.join(&cfg.category_encoder),
            price_scaler: optional(&cfg.price_scaler),
            label_decoder: optional(&cfg.label_decoder),
        }
    }
}

/// SHA-256 digest of an artifact file as it was read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactFingerprint {
    pub artifact: String,
    pub path: String,
    pub sha256: String,
}

/// Read-only view of what was loaded, for `inspect` and the model endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactSummary {
    pub model: String,
    pub task: ModelTask,
    pub layout: FeatureLayout,
    pub fields: Vec<&'static str>,
    pub result_kind: ResultKind,
    pub categories: usize,
    pub price_scaler: Option<PriceScaler>,
    pub labels: Vec<String>,
    pub fingerprints: Vec<ArtifactFingerprint>,
}

/// Immutable set of trained artifacts
pub struct Artifacts {
    classifier: Box<dyn Classifier>,
    category_encoder: CategoryEncoder,
    price_scaler: Option<PriceScaler>,
    label_decoder: Option<LabelDecoder>,
    layout: FeatureLayout,
    fingerprints: Vec<ArtifactFingerprint>,
}

impl Artifacts {
    /// Load every artifact from disk. Any failure is fatal to the caller.
    pub fn load(paths: &ArtifactPaths) -> ProfitResult<Self> {
        let mut fingerprints = Vec::new();

        let (model, fp) = read_artifact::<ModelArtifact>("classifier", &paths.classifier)?;
        model.validate()?;
        fingerprints.push(fp);

        let (classes, fp) =
            read_artifact::<EncoderClasses>("category_encoder", &paths.category_encoder)?;
        let category_encoder = CategoryEncoder::try_from(classes)?;
        fingerprints.push(fp);

        let price_scaler = match present(&paths.price_scaler) {
            Some(path) => {
                let (scaler, fp) = read_artifact::<PriceScaler>("price_scaler", path)?;
                fingerprints.push(fp);
                Some(scaler)
            }
            None => None,
        };

        let label_decoder = match present(&paths.label_decoder) {
            Some(path) => {
                let (classes, fp) = read_artifact::<EncoderClasses>("label_decoder", path)?;
                fingerprints.push(fp);
                Some(LabelDecoder::try_from(classes)?)
            }
            None => None,
        };

        let mut artifacts =
            Self::from_parts(Box::new(model), category_encoder, price_scaler, label_decoder)?;
        artifacts.fingerprints = fingerprints;

        info!(
            model = artifacts.classifier.name(),
            layout = %artifacts.layout,
            categories = artifacts.category_encoder.len(),
            "artifacts loaded"
        );
        Ok(artifacts)
    }

    /// Assemble artifacts already in memory, selecting and checking the layout
    pub fn from_parts(
        classifier: Box<dyn Classifier>,
        category_encoder: CategoryEncoder,
        price_scaler: Option<PriceScaler>,
        label_decoder: Option<LabelDecoder>,
    ) -> ProfitResult<Self> {
        if let Some(scaler) = &price_scaler {
            scaler.validate()?;
        }

        let layout = FeatureLayout::select(price_scaler.is_some(), label_decoder.is_some());

        if classifier.n_features() != layout.width() {
            return Err(ProfitError::artifact(
                "classifier",
                format!(
                    "model {} expects {} features but layout {} provides {}",
                    classifier.name(),
                    classifier.n_features(),
                    layout,
                    layout.width()
                ),
            ));
        }

        if layout.result_kind() == ResultKind::Categorical {
            if classifier.task() != ModelTask::Classification {
                return Err(ProfitError::artifact(
                    "classifier",
                    format!(
                        "layout {layout} needs a classification model, {} is a regressor",
                        classifier.name()
                    ),
                ));
            }

            if let (Some(n_classes), Some(decoder)) = (classifier.n_classes(), &label_decoder) {
                if n_classes > decoder.len() {
                    return Err(ProfitError::artifact(
                        "label_decoder",
                        format!(
                            "model has {n_classes} classes, decoder knows {}",
                            decoder.len()
                        ),
                    ));
                }
            }
        }

        debug!(%layout, fields = ?layout.field_names(), "feature layout selected");

        Ok(Self {
            classifier,
            category_encoder,
            price_scaler,
            label_decoder,
            layout,
            fingerprints: Vec::new(),
        })
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn category_encoder(&self) -> &CategoryEncoder {
        &self.category_encoder
    }

    pub fn price_scaler(&self) -> Option<&PriceScaler> {
        self.price_scaler.as_ref()
    }

    pub fn label_decoder(&self) -> Option<&LabelDecoder> {
        self.label_decoder.as_ref()
    }

    pub fn layout(&self) -> FeatureLayout {
        self.layout
    }

    pub fn fingerprints(&self) -> &[ArtifactFingerprint] {
        &self.fingerprints
    }

    pub fn summary(&self) -> ArtifactSummary {
        ArtifactSummary {
            model: self.classifier.name().to_string(),
            task: self.classifier.task(),
            layout: self.layout,
            fields: self.layout.field_names(),
            result_kind: self.layout.result_kind(),
            categories: self.category_encoder.len(),
            price_scaler: self.price_scaler,
            labels: self
                .label_decoder
                .iter()
                .flat_map(|d| d.labels())
                .map(|label| label.to_string())
                .collect(),
            fingerprints: self.fingerprints.clone(),
        }
    }
}

impl fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifacts")
            .field("classifier", &self.classifier.name())
            .field("category_encoder", &self.category_encoder)
            .field("price_scaler", &self.price_scaler)
            .field("label_decoder", &self.label_decoder)
            .field("layout", &self.layout)
            .finish()
    }
}

/// Optional artifacts count as absent when their file does not exist
fn present(path: &Option<PathBuf>) -> Option<&Path> {
    match path.as_deref() {
        Some(p) if p.exists() => Some(p),
        Some(p) => {
            debug!(path = %p.display(), "optional artifact not found, treating as absent");
            None
        }
        None => None,
    }
}

fn read_artifact<T: DeserializeOwned>(
    artifact: &str,
    path: &Path,
) -> ProfitResult<(T, ArtifactFingerprint)> {
    let bytes = fs::read(path)
        .map_err(|e| ProfitError::artifact(artifact, format!("{}: {e}", path.display())))?;

    let value = serde_json::from_slice(&bytes).map_err(|e| {
        ProfitError::artifact(artifact, format!("{} is corrupt: {e}", path.display()))
    })?;

    let fingerprint = ArtifactFingerprint {
        artifact: artifact.to_string(),
        path: path.display().to_string(),
        sha256: format!("{:x}", Sha256::digest(&bytes)),
    };

    Ok((value, fingerprint))
}
