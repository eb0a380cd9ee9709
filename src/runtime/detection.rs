// ABOUTME: Container runtime socket discovery, one detector per host platform.
// ABOUTME: Environment and config overrides take precedence over auto-detection.

use super::types::{RuntimeConfig, RuntimeInfo};
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};

/// Environment variable that overrides socket discovery.
pub const SOCKET_ENV: &str = "RAPIDCTL_SOCKET";
/// Older override still honored when [`SOCKET_ENV`] is unset.
pub const LEGACY_SOCKET_ENV: &str = "PODMAN_SOCKET";

const ROOTFUL_PODMAN: &str = "/run/podman/podman.sock";
const DOCKER_SOCKET: &str = "/var/run/docker.sock";
const PODMAN_MACHINE_DIR: &str = ".local/share/containers/podman/machine";
const PODMAN_DESKTOP_SOCKET: &str = ".local/share/containers/podman/podman.sock";

/// Error during runtime detection.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("no container runtime found (checked Podman and Docker sockets)")]
    NoRuntimeFound,

    #[error("socket discovery is not supported on {0}")]
    UnsupportedPlatform(String),
}

/// Finds the container runtime socket on one kind of host.
pub trait SocketDetector {
    /// Platform name, for diagnostics.
    fn platform(&self) -> &'static str;

    /// Socket paths to try, in order of preference.
    fn candidates(&self) -> Vec<PathBuf>;

    /// First usable socket as a `unix://` URI.
    fn detect_socket(&self) -> Option<String> {
        self.candidates().into_iter().find_map(|path| {
            tracing::trace!(platform = self.platform(), path = %path.display(), "checking socket");
            is_usable_socket(&path).then(|| format!("unix://{}", path.display()))
        })
    }
}

/// Linux: rootless Podman, rootful Podman, then Docker.
#[derive(Debug, Clone, Default)]
pub struct LinuxDetector {
    uid: Option<String>,
}

impl LinuxDetector {
    pub fn new() -> Self {
        Self { uid: get_uid() }
    }

    pub fn with_uid(uid: impl Into<String>) -> Self {
        Self {
            uid: Some(uid.into()),
        }
    }
}

impl SocketDetector for LinuxDetector {
    fn platform(&self) -> &'static str {
        "linux"
    }

    fn candidates(&self) -> Vec<PathBuf> {
        let mut candidates = Vec::with_capacity(3);
        if let Some(uid) = &self.uid {
            candidates.push(PathBuf::from(format!("/run/user/{}/podman/podman.sock", uid)));
        }
        candidates.push(PathBuf::from(ROOTFUL_PODMAN));
        candidates.push(PathBuf::from(DOCKER_SOCKET));
        candidates
    }
}

/// macOS: the Podman machine socket, docker.sock, Podman Desktop, then any
/// per-machine socket under the machine directory.
#[derive(Debug, Clone)]
pub struct MacDetector {
    home: Option<PathBuf>,
}

impl MacDetector {
    pub fn new() -> Self {
        Self {
            home: dirs::home_dir(),
        }
    }

    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self {
            home: Some(home.into()),
        }
    }
}

impl Default for MacDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl SocketDetector for MacDetector {
    fn platform(&self) -> &'static str {
        "macos"
    }

    fn candidates(&self) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(home) = &self.home {
            candidates.push(home.join(PODMAN_MACHINE_DIR).join("podman.sock"));
        }
        candidates.push(PathBuf::from(DOCKER_SOCKET));

        if let Some(home) = &self.home {
            candidates.push(home.join(PODMAN_DESKTOP_SOCKET));

            // Sorted for a stable pick when several machines exist.
            if let Ok(entries) = std::fs::read_dir(home.join(PODMAN_MACHINE_DIR)) {
                let mut machines: Vec<PathBuf> = entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.path())
                    .filter(|p| p.is_dir())
                    .collect();
                machines.sort();
                candidates.extend(machines.into_iter().map(|m| m.join("podman.sock")));
            }
        }
        candidates
    }
}

/// Pick the detector for the host OS.
pub fn detector_for_platform() -> Result<Box<dyn SocketDetector>, DetectionError> {
    detector_for(std::env::consts::OS)
}

fn detector_for(os: &str) -> Result<Box<dyn SocketDetector>, DetectionError> {
    match os {
        "linux" => Ok(Box::new(LinuxDetector::new())),
        "macos" => Ok(Box::new(MacDetector::new())),
        other => Err(DetectionError::UnsupportedPlatform(other.to_string())),
    }
}

/// Socket override from the environment, if set and non-empty.
pub fn socket_from_env() -> Option<String> {
    [SOCKET_ENV, LEGACY_SOCKET_ENV]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

/// Detect the container runtime on the local system.
///
/// Resolution order:
/// 1. `RAPIDCTL_SOCKET` (or `PODMAN_SOCKET`) from the environment
/// 2. `socket` from the config file
/// 3. the platform detector
pub fn detect_local(config: Option<&RuntimeConfig>) -> Result<RuntimeInfo, DetectionError> {
    let runtime = config.and_then(|c| c.runtime);

    if let Some(socket) = socket_from_env() {
        tracing::debug!("using socket from environment: {}", socket);
        return Ok(RuntimeInfo::from_socket(&socket, runtime));
    }

    if let Some(socket) = config.and_then(|c| c.socket.as_deref()) {
        tracing::debug!("using socket from config: {}", socket);
        return Ok(RuntimeInfo::from_socket(socket, runtime));
    }

    let detector = detector_for_platform()?;
    let socket = detector
        .detect_socket()
        .ok_or(DetectionError::NoRuntimeFound)?;
    tracing::debug!(platform = detector.platform(), "detected socket {}", socket);
    Ok(RuntimeInfo::from_socket(&socket, runtime))
}

fn is_usable_socket(path: &Path) -> bool {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => path.exists(),
        Ok(meta) => meta.file_type().is_socket(),
        Err(_) => false,
    }
}

fn get_uid() -> Option<String> {
    std::env::var("UID").ok().or_else(|| {
        // Fall back to reading /proc/self/status
        std::fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|s| {
                s.lines()
                    .find(|l| l.starts_with("Uid:"))
                    .and_then(|l| l.split_whitespace().nth(1))
                    .map(|s| s.to_string())
            })
    })
}
