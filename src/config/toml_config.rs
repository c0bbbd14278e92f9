use crate::app::render::OutputFormat;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern compiles"));

/// Optional config file; every key may be omitted.
///
/// ```toml
/// [api]
/// base_url = "${CLUB_API_HOST}/api"
/// timeout_secs = 10
///
/// [output]
/// dir = "./exports"
/// format = "table"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSection {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    pub dir: Option<String>,
    pub format: Option<OutputFormat>,
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading config file {}", path.display());
        let content = std::fs::read_to_string(path).map_err(AppError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        toml::from_str(&processed)
            .map_err(|e| AppError::config(format!("TOML parsing error: {}", e)))
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl Validate for FileConfig {
    fn validate(&self) -> Result<()> {
        if let Some(url) = &self.api.base_url {
            validate_url("api.base_url", url)?;
        }
        if let Some(timeout) = self.api.timeout_secs {
            validate_range("api.timeout_secs", timeout, 1, 300)?;
        }
        if let Some(dir) = &self.output.dir {
            validate_path("output.dir", dir)?;
        }
        Ok(())
    }
}
