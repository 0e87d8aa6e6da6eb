//! CLI configuration

use crate::error::{CliError, CliResult};
use gepa_engine::OptimizerConfig;
use gepa_llm::ChatSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration, read from TOML.
///
/// ```toml
/// [optimizer]
/// rollout_budget = 10
/// seed = 7
///
/// [llm]
/// model = "gpt-4o-mini"
/// api_key_env = "OPENAI_API_KEY"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub optimizer: OptimizerConfig,
    pub llm: ChatSettings,
}

impl CliConfig {
    /// Load configuration from `path`, or from the default location when
    /// no path is given. A missing default file yields the defaults.
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        match path {
            Some(p) => Self::from_file(Path::new(p)),
            None => {
                let default_path = Self::default_config_path()?;
                if default_path.exists() {
                    Self::from_file(&default_path)
                } else {
                    Ok(CliConfig::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Err(CliError::Config(format!(
                "config file {} does not exist",
                path.display()
            )));
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Get the default configuration file path
    fn default_config_path() -> CliResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CliError::Config("Cannot find config directory".into()))?;
        Ok(config_dir.join("gepa").join("config.toml"))
    }
}
