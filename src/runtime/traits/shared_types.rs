// ABOUTME: Shared types used across runtime trait definitions.
// ABOUTME: ImageSummary, PulledImage, RegistryAuth, RuntimeMetadata.

use crate::types::ImageId;
use std::fmt;

/// A locally stored image as listed by the runtime.
#[derive(Debug, Clone)]
pub struct ImageSummary {
    /// Image ID.
    pub id: ImageId,
    /// Fully qualified `repository:tag` names, in runtime order.
    pub tags: Vec<String>,
}

/// Result of a successful pull.
#[derive(Debug, Clone)]
pub struct PulledImage {
    /// Image ID.
    pub id: ImageId,
    /// Fully qualified names now pointing at the image.
    pub tags: Vec<String>,
    /// Size on disk.
    pub size_bytes: u64,
    /// Progress lines reported while pulling.
    pub log: Vec<String>,
}

/// Registry authentication credentials.
#[derive(Clone)]
pub struct RegistryAuth {
    /// Username.
    pub username: String,
    /// Password or token.
    pub password: String,
    /// Registry server (e.g., "ghcr.io").
    pub server: Option<String>,
}

// Keeps passwords out of logs.
impl fmt::Debug for RegistryAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("server", &self.server)
            .finish()
    }
}

/// Runtime metadata.
#[derive(Debug, Clone)]
pub struct RuntimeMetadata {
    /// Runtime name (e.g., "docker", "podman").
    pub name: String,
    /// Runtime version.
    pub version: String,
    /// API version.
    pub api_version: String,
    /// Operating system.
    pub os: String,
    /// Architecture.
    pub arch: String,
}
