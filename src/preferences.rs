// ABOUTME: Durable repository -> pinned tag preferences in ~/.local/state/rapidctl/.
// ABOUTME: Unreadable or corrupt state degrades to "no pin" instead of failing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Base directory for rapidctl state files (XDG Base Directory compliant).
const STATE_DIR: &str = ".local/state/rapidctl";
const STATE_FILE: &str = "versions.json";

/// Errors from persisting preferences. Reads never fail.
#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

/// JSON file mapping repository identifiers to pinned tags.
///
/// The whole file is read on every lookup and rewritten on every update.
/// Concurrent writers are last-writer-wins.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$HOME/.local/state/rapidctl/versions.json`.
    pub fn default_location() -> Result<Self, PreferenceError> {
        Ok(Self::at(home_dir()?.join(STATE_DIR).join(STATE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Pinned tag for a repository, if any.
    pub fn read(&self, repository: &str) -> Option<String> {
        self.all().remove(repository)
    }

    /// Every pin currently on disk.
    pub fn all(&self) -> BTreeMap<String, String> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                tracing::warn!("ignoring unreadable state file {}: {}", self.path.display(), e);
                return BTreeMap::new();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("ignoring corrupt state file {}: {}", self.path.display(), e);
            BTreeMap::new()
        })
    }

    /// Pin `tag` for `repository`, keeping every other entry.
    pub fn write(&self, repository: &str, tag: &str) -> Result<(), PreferenceError> {
        let mut records = self.all();
        records.insert(repository.to_string(), tag.to_string());

        let json = serde_json::to_string_pretty(&records)?;
        let io_err = |source: std::io::Error| PreferenceError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        // Replace the file in one step so readers never see half a record set.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;

        tracing::debug!("pinned {} to {} in {}", repository, tag, self.path.display());
        Ok(())
    }
}

/// Prefer `$HOME` so overrides in containers and tests are respected.
fn home_dir() -> Result<PathBuf, PreferenceError> {
    if let Ok(home) = std::env::var("HOME")
        && !home.is_empty()
    {
        return Ok(PathBuf::from(home));
    }
    dirs::home_dir().ok_or(PreferenceError::NoHomeDir)
}
