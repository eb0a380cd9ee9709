// ABOUTME: Configuration types and parsing for rapidctl.yml.
// ABOUTME: Names the managed image repository, its baseline tag, and runtime overrides.

mod deserialize;
mod init;

pub use init::init_config;

use crate::error::{Error, Result};
use crate::runtime::RuntimeConfig;
use crate::types::ImageRef;
use deserialize::{deserialize_repository, deserialize_tag};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "rapidctl.yml";
pub const CONFIG_FILENAME_ALT: &str = "rapidctl.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".rapidctl/config.yml";

pub const DEFAULT_BASELINE_VERSION: &str = "1.0.0";
pub const DEFAULT_COMMAND_PATH: &str = "/opt/rapidctl/cmd/";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Image repository whose tags are managed, without a tag.
    #[serde(deserialize_with = "deserialize_repository")]
    pub repository: String,

    /// Tag used until a pin is recorded.
    #[serde(
        default = "default_baseline_version",
        deserialize_with = "deserialize_tag"
    )]
    pub baseline_version: String,

    /// Directory inside the image holding the tool's commands.
    #[serde(default = "default_command_path")]
    pub command_path: PathBuf,

    #[serde(flatten)]
    pub runtime: RuntimeConfig,
}

fn default_baseline_version() -> String {
    DEFAULT_BASELINE_VERSION.to_string()
}

fn default_command_path() -> PathBuf {
    PathBuf::from(DEFAULT_COMMAND_PATH)
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        tracing::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// The baseline tag must form a valid reference with the repository.
    fn validate(&self) -> Result<()> {
        if ImageRef::new(&self.repository, &self.baseline_version).is_none() {
            return Err(Error::InvalidConfig(format!(
                "baseline_version {:?} is not a valid tag for {}",
                self.baseline_version, self.repository
            )));
        }
        Ok(())
    }

    pub fn template() -> Self {
        Config {
            repository: "ghcr.io/my-org/my-tool".to_string(),
            baseline_version: default_baseline_version(),
            command_path: default_command_path(),
            runtime: RuntimeConfig::default(),
        }
    }
}
