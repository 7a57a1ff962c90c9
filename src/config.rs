use config::{Config, ConfigError, Environment, File, FileFormat};
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use url::Url;

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub scraper: ScraperConfig,
    pub valuation: ValuationConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Site root the make/model path segments are appended to.
    pub base_url: String,
    /// Seconds.
    pub request_timeout: u64,
    pub user_agent: String,
    pub selectors: SelectorConfig,
}

/// CSS selectors locating an ad row and the fields inside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    pub ad_row: String,
    pub ad_url: String,
    pub price: String,
    pub mileage: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationConfig {
    /// Relative deviation at which an ad leaves the "normal" bucket.
    pub threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub raw_file: String,
    pub cleaned_file: String,
    pub results_file: String,
    pub plot_file: String,
}

impl OutputConfig {
    pub fn raw_path(&self) -> PathBuf {
        self.directory.join(&self.raw_file)
    }

    pub fn cleaned_path(&self) -> PathBuf {
        self.directory.join(&self.cleaned_file)
    }

    pub fn results_path(&self) -> PathBuf {
        self.directory.join(&self.results_file)
    }

    pub fn plot_path(&self) -> PathBuf {
        self.directory.join(&self.plot_file)
    }
}

impl AppConfig {
    /// Built-in defaults only, without files or environment.
    pub fn defaults() -> Result<Self, ConfigError> {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(extra: Option<&Path>) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            // Start with the embedded defaults
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            // Add environment-specific config
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add local config (ignored by git)
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = extra {
            builder = builder.add_source(File::from(path).required(true));
        }

        // Environment variables with prefix "CARVAL_" win over files
        let s = builder
            .add_source(Environment::with_prefix("CARVAL").separator("__"))
            .build()?;

        let config: AppConfig = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port must be greater than 0".into()));
        }

        if Url::parse(&self.scraper.base_url).is_err() {
            return Err(ConfigError::Message("Invalid scraper base_url format".into()));
        }

        if self.scraper.request_timeout == 0 {
            return Err(ConfigError::Message("Scraper request_timeout must be greater than 0".into()));
        }

        let selectors = &self.scraper.selectors;
        for (name, selector) in [
            ("ad_row", &selectors.ad_row),
            ("ad_url", &selectors.ad_url),
            ("price", &selectors.price),
            ("mileage", &selectors.mileage),
        ] {
            if let Err(e) = Selector::parse(selector) {
                return Err(ConfigError::Message(format!(
                    "Invalid CSS selector for scraper.selectors.{}: {:?}",
                    name, e
                )));
            }
        }

        let threshold = self.valuation.threshold;
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(ConfigError::Message("Valuation threshold must be between 0 and 1".into()));
        }

        let output = &self.output;
        for (name, file) in [
            ("raw_file", &output.raw_file),
            ("cleaned_file", &output.cleaned_file),
            ("results_file", &output.results_file),
            ("plot_file", &output.plot_file),
        ] {
            if file.trim().is_empty() {
                return Err(ConfigError::Message(format!("Output {} must not be empty", name)));
            }
        }

        Ok(())
    }
}
