#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::app::render::OutputFormat;
use crate::core::transport::DEFAULT_TIMEOUT;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use std::path::PathBuf;
use std::time::Duration;
use toml_config::FileConfig;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const API_URL_ENV: &str = "CLUB_ADMIN_API_URL";
pub const DEFAULT_OUTPUT_DIR: &str = "./output";

/// Values given on the command line (or its env fallbacks); `None` defers to lower layers.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub config_path: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub output_dir: Option<String>,
    pub format: Option<OutputFormat>,
}

/// Effective settings after layering defaults, config file and overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub timeout: Duration,
    pub output_dir: String,
    pub format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            format: OutputFormat::Table,
        }
    }
}

impl Settings {
    pub fn resolve(overrides: &Overrides) -> Result<Self> {
        let file = match &overrides.config_path {
            Some(path) => {
                let file = FileConfig::from_file(path)?;
                file.validate()?;
                Some(file)
            }
            None => None,
        };
        let settings = Self::layered(file.as_ref(), overrides);
        settings.validate()?;
        Ok(settings)
    }

    fn layered(file: Option<&FileConfig>, overrides: &Overrides) -> Self {
        let mut settings = Self::default();

        if let Some(file) = file {
            if let Some(url) = &file.api.base_url {
                settings.api_url = url.clone();
            }
            if let Some(secs) = file.api.timeout_secs {
                settings.timeout = Duration::from_secs(secs);
            }
            if let Some(dir) = &file.output.dir {
                settings.output_dir = dir.clone();
            }
            if let Some(format) = file.output.format {
                settings.format = format;
            }
        }

        if let Some(url) = &overrides.api_url {
            settings.api_url = url.clone();
        }
        if let Some(secs) = overrides.timeout_secs {
            settings.timeout = Duration::from_secs(secs);
        }
        if let Some(dir) = &overrides.output_dir {
            settings.output_dir = dir.clone();
        }
        if let Some(format) = overrides.format {
            settings.format = format;
        }

        settings
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("api_url", &self.api_url)?;
        validate_range("timeout_secs", self.timeout.as_secs(), 1, 300)?;
        validate_path("output_dir", &self.output_dir)?;
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn api_base_url(&self) -> &str {
        &self.api_url
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn output_dir(&self) -> &str {
        &self.output_dir
    }
}
