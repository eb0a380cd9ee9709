// ABOUTME: Controller client holding the repository and its effective version.
// ABOUTME: The pin is read from the preference store and falls back to the baseline.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::diagnostics::Warning;
use crate::error::{Error, Result};
use crate::preferences::PreferenceStore;
use crate::types::ImageRef;

/// Where the effective version came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSource {
    Baseline,
    Pinned,
}

#[derive(Debug, Clone)]
pub struct CtlClient {
    repository: String,
    baseline_version: String,
    command_path: PathBuf,
    version: String,
    source: VersionSource,
    store: PreferenceStore,
}

impl CtlClient {
    pub fn new(config: &Config, store: PreferenceStore) -> Self {
        let mut client = Self {
            repository: config.repository.clone(),
            baseline_version: config.baseline_version.clone(),
            command_path: config.command_path.clone(),
            version: config.baseline_version.clone(),
            source: VersionSource::Baseline,
            store,
        };
        client.reload();
        client
    }

    /// Re-read the pin from disk.
    pub fn reload(&mut self) {
        match self.store.read(&self.repository) {
            Some(tag) => {
                tracing::debug!("{} pinned to {}", self.repository, tag);
                self.version = tag;
                self.source = VersionSource::Pinned;
            }
            None => {
                tracing::debug!(
                    "{} has no pin, using baseline {}",
                    self.repository,
                    self.baseline_version
                );
                self.version = self.baseline_version.clone();
                self.source = VersionSource::Baseline;
            }
        }
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn baseline_version(&self) -> &str {
        &self.baseline_version
    }

    pub fn source(&self) -> VersionSource {
        self.source
    }

    pub fn command_path(&self) -> &Path {
        &self.command_path
    }

    pub fn store(&self) -> &PreferenceStore {
        &self.store
    }

    /// Pin `tag` for this run and persist it.
    ///
    /// An invalid tag is an error. A failed write is returned as a warning and
    /// the new version still applies to this process.
    pub fn set_version(&mut self, tag: &str) -> Result<Option<Warning>> {
        if ImageRef::new(&self.repository, tag).is_none() {
            return Err(Error::InvalidReference(format!("{}:{}", self.repository, tag)));
        }

        self.version = tag.to_string();
        self.source = VersionSource::Pinned;

        match self.store.write(&self.repository, tag) {
            Ok(()) => Ok(None),
            Err(e) => Ok(Some(Warning::preference_write(format!(
                "could not save pin {} for {}: {}",
                tag, self.repository, e
            )))),
        }
    }

    /// `repository:version`, sanitized.
    pub fn container_reference(&self) -> Result<ImageRef> {
        ImageRef::new(&self.repository, &self.version)
            .ok_or_else(|| Error::InvalidReference(format!("{}:{}", self.repository, self.version)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::WarningKind;

    fn config() -> Config {
        Config::from_yaml("repository: ghcr.io/org/tool\n").unwrap()
    }

    fn store(dir: &tempfile::TempDir) -> PreferenceStore {
        PreferenceStore::at(dir.path().join("versions.json"))
    }

    #[test]
    fn starts_at_baseline_without_pin() {
        let dir = tempfile::tempdir().unwrap();
        let client = CtlClient::new(&config(), store(&dir));

        assert_eq!(client.version(), "1.0.0");
        assert_eq!(client.source(), VersionSource::Baseline);
        assert_eq!(client.command_path(), Path::new("/opt/rapidctl/cmd/"));
        assert_eq!(
            client.container_reference().unwrap().to_string(),
            "ghcr.io/org/tool:1.0.0"
        );
    }

    #[test]
    fn loads_existing_pin() {
        let dir = tempfile::tempdir().unwrap();
        store(&dir).write("ghcr.io/org/tool", "1746190043").unwrap();

        let client = CtlClient::new(&config(), store(&dir));
        assert_eq!(client.version(), "1746190043");
        assert_eq!(client.source(), VersionSource::Pinned);
    }

    #[test]
    fn set_version_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = CtlClient::new(&config(), store(&dir));

        assert!(client.set_version("2.0.0").unwrap().is_none());
        assert_eq!(client.version(), "2.0.0");

        let reopened = CtlClient::new(&config(), store(&dir));
        assert_eq!(reopened.version(), "2.0.0");
    }

    #[test]
    fn failed_write_keeps_version_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let store = PreferenceStore::at(blocker.join("versions.json"));

        let mut client = CtlClient::new(&config(), store);
        let warning = client.set_version("3.0.0").unwrap().unwrap();

        assert_eq!(warning.kind, WarningKind::PreferenceWrite);
        assert_eq!(client.version(), "3.0.0");
        assert_eq!(
            client.container_reference().unwrap().tag(),
            Some("3.0.0")
        );
    }

    #[test]
    fn rejects_tags_that_do_not_survive_sanitizing() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = CtlClient::new(&config(), store(&dir));

        assert!(matches!(
            client.set_version("1.0; rm -rf /"),
            Err(Error::InvalidReference(_))
        ));
        assert_eq!(client.version(), "1.0.0");
        assert_eq!(store(&dir).read("ghcr.io/org/tool"), None);
    }

    #[test]
    fn reload_picks_up_external_changes() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = CtlClient::new(&config(), store(&dir));

        store(&dir).write("ghcr.io/org/tool", "1.5.0").unwrap();
        client.reload();
        assert_eq!(client.version(), "1.5.0");
    }
}
