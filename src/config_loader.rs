use crate::errors::{ProfitError, ProfitResult};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file, looked up from the working directory
pub const CONFIG_FILE: &str = "menu_profit.toml";

/// Prefix for environment overrides; nested keys are split on `__`
pub const ENV_PREFIX: &str = "MENU_PROFIT_";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub artifacts: ArtifactConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Artifact directory and file names. An empty optional name disables it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArtifactConfig {
    pub dir: String,
    pub classifier: String,
    pub category_encoder: String,
    #[serde(default)]
    pub price_scaler: Option<String>,
    #[serde(default)]
    pub label_decoder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            log_level: default_log_level(),
            artifacts: ArtifactConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        ArtifactConfig {
            dir: "models".into(),
            classifier: "best_random_forest_model.json".into(),
            category_encoder: "menu_category_encoder.json".into(),
            price_scaler: Some("price_scaler.json".into()),
            label_decoder: Some("profitability_encoder.json".into()),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> ProfitResult<()> {
        if self.artifacts.classifier.trim().is_empty() {
            return Err(ProfitError::config("artifacts.classifier must be set"));
        }
        if self.artifacts.category_encoder.trim().is_empty() {
            return Err(ProfitError::config("artifacts.category_encoder must be set"));
        }
        self.tracing_level()?;
        Ok(())
    }

    pub fn tracing_level(&self) -> ProfitResult<tracing::Level> {
        self.log_level
            .parse()
            .map_err(|_| ProfitError::config(format!("invalid log_level {:?}", self.log_level)))
    }
}

/// Defaults, then the TOML file, then `MENU_PROFIT_*` environment variables
pub fn load_config(path: Option<&Path>) -> ProfitResult<AppConfig> {
    let file = path.unwrap_or_else(|| Path::new(CONFIG_FILE));

    let figment = Figment::from(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file(file))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: AppConfig = figment.extract()?;
    config.validate()?;

    Ok(config)
}
