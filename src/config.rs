//! Process-wide settings, read once at start and passed down explicitly.

use anyhow::{Context, Result};
use clap::Args;
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;

use crate::fetch::BasicClient;
use crate::fetch::auth::UrlParam;
use crate::infra::openweather::OpenWeatherClient;
use crate::infra::store::FileModelStore;

pub const DEFAULT_API_URL: &str = "http://api.openweathermap.org/data/2.5/air_pollution/history";

/// Settings shared by every subcommand. Each one can come from a flag or an
/// environment variable (a `.env` file is honored).
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// Air-pollution history endpoint
    #[arg(long, env = "OPENWEATHERMAP_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// OpenWeatherMap API key, sent as `appid`
    #[arg(long, env = "OPENWEATHERMAP_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Total timeout for one upstream request, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub request_timeout_secs: u64,

    /// Connect timeout for upstream requests, in seconds
    #[arg(long, env = "CONNECT_TIMEOUT_SECS", default_value_t = 10, global = true)]
    pub connect_timeout_secs: u64,

    /// Directory holding one model file per pollutant
    #[arg(long, env = "MODEL_DIR", default_value = "models", global = true)]
    pub model_dir: PathBuf,

    /// L2 penalty for the regressor (0 = ordinary least squares)
    #[arg(long, env = "RIDGE_ALPHA", default_value_t = 0.0, global = true)]
    pub ridge_alpha: f64,
}

impl AppConfig {
    pub fn model_store(&self) -> FileModelStore {
        FileModelStore::new(&self.model_dir)
    }

    /// Builds the upstream client. Fails when the key is missing or the URL
    /// does not parse.
    pub fn openweather_client(&self) -> Result<OpenWeatherClient<UrlParam<BasicClient>>> {
        let api_key = self
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .context("OPENWEATHERMAP_API_KEY must be set")?;
        let base_url = Url::parse(&self.api_url)
            .with_context(|| format!("invalid OPENWEATHERMAP_API_URL '{}'", self.api_url))?;
        let http = BasicClient::new(
            Duration::from_secs(self.request_timeout_secs),
            Duration::from_secs(self.connect_timeout_secs),
        )?;

        Ok(OpenWeatherClient::new(base_url, api_key, http))
    }

    pub fn validate(&self) -> Result<()> {
        if self.ridge_alpha.is_nan() || self.ridge_alpha < 0.0 {
            anyhow::bail!("ridge alpha must be non-negative, got {}", self.ridge_alpha);
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request timeout must be at least one second");
        }
        Ok(())
    }
}
