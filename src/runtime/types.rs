// ABOUTME: Runtime type definitions for Docker and Podman.
// ABOUTME: Includes RuntimeType, detected RuntimeInfo, and the RuntimeConfig override.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The container runtime type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeType {
    Docker,
    Podman,
}

impl RuntimeType {
    /// Guess the runtime from a socket path.
    pub fn from_socket_path(path: &str) -> Self {
        if path.contains("podman") {
            RuntimeType::Podman
        } else {
            RuntimeType::Docker
        }
    }
}

impl std::fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeType::Docker => write!(f, "docker"),
            RuntimeType::Podman => write!(f, "podman"),
        }
    }
}

/// Detected runtime information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    /// The type of runtime detected.
    pub runtime_type: RuntimeType,
    /// Filesystem path to the runtime socket.
    pub socket_path: String,
}

impl RuntimeInfo {
    /// Build from a socket path or `unix://` URI, inferring the runtime type.
    pub fn from_socket(socket: &str, runtime: Option<RuntimeType>) -> Self {
        let socket_path = socket.strip_prefix("unix://").unwrap_or(socket).to_string();
        let runtime_type = runtime.unwrap_or_else(|| RuntimeType::from_socket_path(&socket_path));
        Self {
            runtime_type,
            socket_path,
        }
    }

    /// Socket as a `unix://` URI.
    pub fn uri(&self) -> String {
        format!("unix://{}", self.socket_path)
    }
}

/// Configuration for explicit runtime override.
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    /// Explicit runtime type (overrides auto-detection).
    #[serde(default)]
    pub runtime: Option<RuntimeType>,
    /// Explicit socket path (overrides default).
    #[serde(default)]
    pub socket: Option<String>,
    /// Socket connect timeout.
    #[serde(default = "default_connect_timeout", with = "humantime_serde")]
    pub connect_timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            runtime: None,
            socket: None,
            connect_timeout: default_connect_timeout(),
        }
    }
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(120)
}
