// ABOUTME: Image operations trait for container runtimes.
// ABOUTME: List local images, pull from a registry, and log in to a registry.

use super::sealed::Sealed;
use super::shared_types::{ImageSummary, PulledImage, RegistryAuth};
use crate::types::ImageRef;
use async_trait::async_trait;

/// Substrings (lowercase) that mark a runtime failure as an authentication problem.
const AUTH_MARKERS: &[&str] = &[
    "unauthorized",
    "auth token",
    "401",
    "authentication required",
];

/// Image operations: list, pull, registry login.
#[async_trait]
pub trait ImageOps: Sealed + Send + Sync {
    /// List images present in local storage.
    async fn list_images(&self) -> Result<Vec<ImageSummary>, ImageError>;

    /// Pull an image from a registry.
    async fn pull_image(
        &self,
        reference: &ImageRef,
        auth: Option<&RegistryAuth>,
    ) -> Result<PulledImage, ImageError>;

    /// Verify credentials against a registry.
    async fn login(&self, auth: &RegistryAuth) -> Result<(), ImageError>;
}

/// Errors from image operations.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("failed to list images: {0}")]
    ListFailed(String),

    #[error("authentication failed for registry: {0}")]
    AuthenticationFailed(String),

    #[error("pull failed: {0}")]
    PullFailed(String),

    #[error("login failed: {0}")]
    LoginFailed(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}

impl ImageError {
    /// Build a pull error, promoting authentication-looking messages.
    pub fn pull(message: impl Into<String>) -> Self {
        let message = message.into();
        if is_auth_message(&message) {
            ImageError::AuthenticationFailed(message)
        } else {
            ImageError::PullFailed(message)
        }
    }

    /// Whether this failure can be cured by logging in.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            ImageError::AuthenticationFailed(_) => true,
            ImageError::PullFailed(msg) | ImageError::Runtime(msg) => is_auth_message(msg),
            ImageError::ListFailed(_) | ImageError::LoginFailed(_) => false,
        }
    }
}

/// Case-insensitive check for authentication failure markers.
pub fn is_auth_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    AUTH_MARKERS.iter().any(|marker| lower.contains(marker))
}
