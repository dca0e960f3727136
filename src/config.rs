use crate::error::Result;
use crate::models::Pollutant;
use crate::utils::constants::{
    DEFAULT_CONFIG_FILE, DEFAULT_RISK_THRESHOLD, DEFAULT_TOP_STATIONS, ENV_PREFIX, FORMAT_TEXT,
};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

/// Defaults for the CLI, layered file < environment. Command-line arguments
/// override whatever is loaded here.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    pub input: Option<PathBuf>,

    pub pollutant: String,

    #[validate(range(min = 0.0))]
    pub threshold: f64,

    #[validate(range(min = 1))]
    pub top: usize,

    pub format: String,
}

impl Settings {
    /// Load from `path`, or from `air-quality.toml` in the working directory
    /// when it exists, then apply `AIRQ_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let builder = Config::builder()
            .set_default("pollutant", Pollutant::Pm25.label())?
            .set_default("threshold", DEFAULT_RISK_THRESHOLD)?
            .set_default("top", DEFAULT_TOP_STATIONS as i64)?
            .set_default("format", FORMAT_TEXT)?;

        let builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => {
                let default_file = File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml);
                builder.add_source(default_file.required(false))
            }
        };

        let settings: Settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        debug!(?settings, "Loaded settings");
        Ok(settings)
    }

    pub fn pollutant(&self) -> Result<Pollutant> {
        self.pollutant.parse()
    }
}
