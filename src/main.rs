//! CLI entry point for the air-quality forecaster.
//!
//! Runs the HTTP backend, or performs a single scrape, training run, or
//! prediction from the command line.

use anyhow::{Context, Result};
use aq_forecaster::config::AppConfig;
use aq_forecaster::forecast::predictor::Predictor;
use aq_forecaster::forecast::trainer::Trainer;
use aq_forecaster::output::{append_readings, load_measurements, print_json};
use aq_forecaster::services::scraper::{StationsPayload, scrape};
use aq_forecaster::web::{AppState, run_http_server};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "aq_forecaster")]
#[command(about = "Scrape air-quality readings and forecast pollutants", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the scrape, train and predict endpoints over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8000")]
        bind: SocketAddr,
    },
    /// Scrape stations once and append the readings to a CSV file
    Scrape {
        /// JSON file with {"Stations": [...], "NumberOfHours": n}
        #[arg(short, long)]
        stations: PathBuf,

        /// Override the lookback window, in hours
        #[arg(long)]
        hours: Option<i64>,

        /// CSV file to append readings to
        #[arg(short, long, default_value = "readings.csv")]
        output: PathBuf,
    },
    /// Train all pollutant models from a CSV or JSON file of measurements
    Train {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Forecast the next hour from a CSV or JSON file of measurements
    Predict {
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing()?;

    let cli = Cli::parse();
    cli.config.validate()?;
    let config = cli.config;

    match cli.command {
        Commands::Serve { bind } => {
            let api = config.openweather_client()?;
            let state = AppState {
                api: Arc::new(api),
                store: Arc::new(config.model_store()),
                ridge_alpha: config.ridge_alpha,
            };
            info!(model_dir = %config.model_dir.display(), "Starting server");
            run_http_server(state, bind).await?;
        }
        Commands::Scrape {
            stations,
            hours,
            output,
        } => {
            let content = std::fs::read_to_string(&stations)
                .with_context(|| format!("failed to read {}", stations.display()))?;
            let mut payload: StationsPayload = serde_json::from_str(&content)?;
            if hours.is_some() {
                payload.number_of_hours = hours;
            }

            let api = config.openweather_client()?;
            let response = scrape(&api, Some(payload), Utc::now()).await;
            if response.error == Some(true) {
                anyhow::bail!(response.message.unwrap_or_default());
            }

            let mut written = 0;
            for result in &response.result {
                if result.error {
                    warn!(message = %result.message, "Skipping failed station");
                    continue;
                }
                append_readings(&output, result.readings())?;
                written += result.readings().len();
            }
            info!(written, output = %output.display(), "Readings saved");
        }
        Commands::Train { input } => {
            let rows = load_measurements(&input)?;
            let store = config.model_store();
            let reports = Trainer::new(&store, config.ridge_alpha).train(&rows)?;
            print_json(&reports)?;
        }
        Commands::Predict { input } => {
            let rows = load_measurements(&input)?;
            let store = config.model_store();
            let predictions = Predictor::new(&store).predict(&rows)?;
            print_json(&predictions)?;
        }
    }

    Ok(())
}

/// Logging setup: colored stderr + JSON rolling log file.
fn init_tracing() -> Result<WorkerGuard> {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/aq_forecaster.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("aq_forecaster.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}
