// ABOUTME: Integration tests for runtime socket resolution order.
// ABOUTME: Environment overrides beat config, config beats platform detection.

use rapidctl::runtime::{
    LEGACY_SOCKET_ENV, RuntimeConfig, RuntimeType, SOCKET_ENV, detect_local, socket_from_env,
};

fn config_with_socket(socket: &str) -> RuntimeConfig {
    RuntimeConfig {
        socket: Some(socket.to_string()),
        ..RuntimeConfig::default()
    }
}

#[test]
fn env_override_wins_over_config() {
    temp_env::with_vars(
        [
            (SOCKET_ENV, Some("unix:///tmp/env/podman.sock")),
            (LEGACY_SOCKET_ENV, None),
        ],
        || {
            let info = detect_local(Some(&config_with_socket("/var/run/docker.sock"))).unwrap();
            assert_eq!(info.socket_path, "/tmp/env/podman.sock");
            assert_eq!(info.runtime_type, RuntimeType::Podman);
        },
    );
}

#[test]
fn legacy_env_is_honored() {
    temp_env::with_vars(
        [
            (SOCKET_ENV, None),
            (LEGACY_SOCKET_ENV, Some("/tmp/legacy/podman.sock")),
        ],
        || {
            assert_eq!(socket_from_env().as_deref(), Some("/tmp/legacy/podman.sock"));
        },
    );
}

#[test]
fn primary_env_beats_legacy_env() {
    temp_env::with_vars(
        [
            (SOCKET_ENV, Some("/tmp/primary.sock")),
            (LEGACY_SOCKET_ENV, Some("/tmp/legacy.sock")),
        ],
        || {
            assert_eq!(socket_from_env().as_deref(), Some("/tmp/primary.sock"));
        },
    );
}

#[test]
fn empty_env_is_ignored() {
    temp_env::with_vars(
        [(SOCKET_ENV, Some("  ")), (LEGACY_SOCKET_ENV, None)],
        || {
            let info = detect_local(Some(&config_with_socket("/srv/docker.sock"))).unwrap();
            assert_eq!(info.socket_path, "/srv/docker.sock");
            assert_eq!(info.runtime_type, RuntimeType::Docker);
        },
    );
}

#[test]
fn config_runtime_type_overrides_inference() {
    temp_env::with_vars(
        [(SOCKET_ENV, None::<&str>), (LEGACY_SOCKET_ENV, None)],
        || {
            let config = RuntimeConfig {
                runtime: Some(RuntimeType::Podman),
                socket: Some("/srv/engine.sock".to_string()),
                ..RuntimeConfig::default()
            };
            let info = detect_local(Some(&config)).unwrap();
            assert_eq!(info.runtime_type, RuntimeType::Podman);
            assert_eq!(info.uri(), "unix:///srv/engine.sock");
        },
    );
}
