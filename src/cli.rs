use crate::artifacts::{ArtifactPaths, Artifacts};
use crate::codec::RawInput;
use crate::config_loader::AppConfig;
use crate::inference::{Prediction, Tone};
use crate::predictor::{PredictionReport, Predictor};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level CLI interface
#[derive(Parser, Debug)]
#[command(
    name = "menu-profit",
    version,
    about = "Restaurant menu profitability predictor"
)]
pub struct Cli {
    /// TOML configuration file (defaults to ./menu_profit.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict the profitability of one menu item
    Predict {
        /// Menu category (or location, for the traffic model)
        #[arg(short, long)]
        category: String,
        /// Menu price in USD
        #[arg(short, long)]
        price: Option<f64>,
        /// Customer count, used by the traffic model
        #[arg(long)]
        customers: Option<u32>,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the categories the encoder knows
    Categories,

    /// Show the loaded model, feature layout and artifact fingerprints
    Inspect,

    /// Serve the HTTP API
    Serve {
        /// Host/IP to bind (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
}

/// Load artifacts once; failure here is fatal for every command
pub fn load_predictor(cfg: &AppConfig) -> anyhow::Result<Predictor> {
    let paths = ArtifactPaths::from_config(&cfg.artifacts);
    let artifacts = Artifacts::load(&paths)
        .with_context(|| format!("failed to load artifacts from {}", cfg.artifacts.dir))?;
    Ok(Predictor::new(Arc::new(artifacts)))
}

pub fn dispatch(cli: Cli, cfg: AppConfig) -> anyhow::Result<()> {
    let predictor = load_predictor(&cfg)?;

    match cli.command {
        Commands::Predict {
            category,
            price,
            customers,
            json,
        } => {
            let input = RawInput {
                category,
                price,
                customer_count: customers,
            };
            let report = predictor.predict(&input)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", render_report(&report));
            }
        }
        Commands::Categories => {
            for (code, category) in predictor.codec().vocabulary().iter().enumerate() {
                println!("{code:>3}  {category}");
            }
        }
        Commands::Inspect => {
            let summary = predictor.artifacts().summary();
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(cfg.server.host);
            let port = port.unwrap_or(cfg.server.port);
            serve(Arc::new(predictor), &host, port)?;
        }
    }

    Ok(())
}

fn serve(predictor: Arc<Predictor>, host: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{host}:{port}");
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .with_context(|| format!("invalid bind address {addr}"))?;

    let app = crate::web::build_public_router(predictor);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build Tokio runtime")?;

    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(socket_addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        tracing::info!("HTTP server listening on http://{addr}");
        axum::serve(listener, app).await.context("server error")?;
        Ok::<_, anyhow::Error>(())
    })
}

/// Plain-text rendering of a report for the terminal
pub fn render_report(report: &PredictionReport) -> String {
    let marker = match report.tone {
        Tone::Success => "[+]",
        Tone::Info => "[i]",
        Tone::Error => "[!]",
    };

    let headline = match report.prediction {
        Prediction::Label(label) => format!("{marker} Profitability: {label}"),
        Prediction::Estimate(value) => format!("{marker} Estimated profit: {value:.2}"),
    };

    format!("{headline}\nCategory: {}", report.category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::ProfitabilityLabel;
    use crate::layout::FeatureLayout;

    fn report(prediction: Prediction) -> PredictionReport {
        PredictionReport {
            request_id: uuid::Uuid::nil(),
            category: "Beverages".into(),
            layout: FeatureLayout::CategoryPrice,
            tone: prediction.tone(),
            prediction,
            predicted_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn renders_label_with_tone_marker() {
        let text = render_report(&report(Prediction::Label(ProfitabilityLabel::High)));
        assert_eq!(text, "[+] Profitability: High\nCategory: Beverages");

        let text = render_report(&report(Prediction::Label(ProfitabilityLabel::Low)));
        assert!(text.starts_with("[!] Profitability: Low"));
    }

    #[test]
    fn renders_estimate_with_two_decimals() {
        let text = render_report(&report(Prediction::Estimate(1234.5)));
        assert!(text.starts_with("[i] Estimated profit: 1234.50"));
    }

    #[test]
    fn parses_predict_arguments() {
        let cli = Cli::try_parse_from([
            "menu-profit",
            "--config",
            "custom.toml",
            "predict",
            "--category",
            "Main Course",
            "--price",
            "14.5",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        match cli.command {
            Commands::Predict {
                category, price, ..
            } => {
                assert_eq!(category, "Main Course");
                assert_eq!(price, Some(14.5));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
