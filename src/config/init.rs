// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates rapidctl.yml template files.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::ImageRef;

use super::deserialize::parse_repository;
use super::{CONFIG_FILENAME, Config};

pub fn init_config(
    dir: &Path,
    repository: Option<&str>,
    baseline_version: Option<&str>,
    force: bool,
) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = Config::template();

    if let Some(r) = repository {
        config.repository = parse_repository(r).map_err(Error::InvalidConfig)?;
    }

    if let Some(v) = baseline_version {
        config.baseline_version = v.to_string();
    }

    if ImageRef::new(&config.repository, &config.baseline_version).is_none() {
        return Err(Error::InvalidConfig(format!(
            "{}:{} is not a valid image reference",
            config.repository, config.baseline_version
        )));
    }

    let yaml = generate_template_yaml(&config);
    std::fs::write(&config_path, yaml)?;
    tracing::debug!("wrote {}", config_path.display());

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    format!(
        r#"repository: {}
baseline_version: "{}"
command_path: {}
# Runtime socket (default: auto-detected; RAPIDCTL_SOCKET overrides)
# runtime: podman
# socket: /run/user/1000/podman/podman.sock
# connect_timeout: 2m
"#,
        config.repository,
        config.baseline_version,
        config.command_path.display()
    )
}
