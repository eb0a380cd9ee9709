// ABOUTME: Container runtime access for Docker and Podman.
// ABOUTME: Socket discovery, capability traits, and the bollard-backed client.

mod bollard;
mod detection;
mod error;
#[cfg(test)]
pub(crate) mod testing;
pub mod traits;
mod types;

pub use self::bollard::BollardRuntime;
pub use detection::{
    DetectionError, LEGACY_SOCKET_ENV, LinuxDetector, MacDetector, SOCKET_ENV, SocketDetector,
    detect_local, detector_for_platform, socket_from_env,
};
pub use error::{RuntimeError, RuntimeErrorKind};
pub use traits::{
    ImageError, ImageOps, ImageSummary, PulledImage, RegistryAuth, RuntimeInfo as RuntimeInfoTrait,
    RuntimeInfoError, RuntimeMetadata, is_auth_message,
};
pub use types::{RuntimeConfig, RuntimeInfo, RuntimeType};
