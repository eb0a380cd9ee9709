// ABOUTME: Error types for image acquisition.
// ABOUTME: Human-readable failures the CLI reports before exiting non-zero.

use crate::credentials::PromptError;

/// Why an acquisition ended without the image being available.
#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    /// Local image listing failed.
    #[error("failed to search local images: {0}")]
    Lookup(String),

    /// Pull failed for a reason logging in cannot fix.
    #[error("failed to pull {reference}: {reason}")]
    PullFailed { reference: String, reason: String },

    /// The registry still rejected the pull after logging in.
    #[error("registry still rejected {reference} after logging in")]
    AuthenticationFailed { reference: String },

    /// The registry rejected the supplied credentials.
    #[error("login to {registry} failed: {reason}")]
    LoginFailed { registry: String, reason: String },

    /// Credentials could not be collected.
    #[error("could not obtain credentials for {registry}: {source}")]
    Prompt {
        registry: String,
        #[source]
        source: PromptError,
    },
}
