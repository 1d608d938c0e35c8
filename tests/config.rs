// tests/config.rs
use figment::Jail;
use menu_profit::config_loader::{load_config, AppConfig};
use menu_profit::ArtifactPaths;
use std::path::{Path, PathBuf};

#[test]
fn defaults_apply_without_file_or_env() {
    Jail::expect_with(|_jail| {
        let cfg = load_config(None).map_err(|e| e.to_string())?;
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.artifacts.dir, "models");
        assert_eq!(cfg.artifacts.classifier, "best_random_forest_model.json");
        assert_eq!(cfg.server.port, 8080);
        Ok(())
    });
}

#[test]
fn toml_file_overrides_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "menu_profit.toml",
            r#"
                log_level = "debug"

                [artifacts]
                dir = "/srv/models"
                classifier = "rf.json"
                category_encoder = "categories.json"
                price_scaler = ""
            "#,
        )?;

        let cfg = load_config(None).map_err(|e| e.to_string())?;
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.artifacts.dir, "/srv/models");
        assert_eq!(cfg.artifacts.label_decoder.as_deref(), Some("profitability_encoder.json"));

        let paths = ArtifactPaths::from_config(&cfg.artifacts);
        assert_eq!(paths.classifier, PathBuf::from("/srv/models/rf.json"));
        assert_eq!(paths.price_scaler, None);
        Ok(())
    });
}

#[test]
fn env_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file("custom.toml", "[server]\nhost = \"0.0.0.0\"\nport = 9000\n")?;
        jail.set_env("MENU_PROFIT_SERVER__PORT", "9100");
        jail.set_env("MENU_PROFIT_ARTIFACTS__DIR", "/opt/models");

        let cfg = load_config(Some(Path::new("custom.toml"))).map_err(|e| e.to_string())?;
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.artifacts.dir, "/opt/models");
        Ok(())
    });
}

#[test]
fn invalid_log_level_fails_validation() {
    Jail::expect_with(|jail| {
        jail.set_env("MENU_PROFIT_LOG_LEVEL", "chatty");

        let err = load_config(None).unwrap_err();
        assert!(err.to_string().contains("log_level"));
        Ok(())
    });
}

#[test]
fn empty_classifier_name_fails_validation() {
    let mut cfg = AppConfig::default();
    cfg.artifacts.classifier = "  ".into();
    assert!(cfg.validate().is_err());
}
