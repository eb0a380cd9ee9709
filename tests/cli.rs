// ABOUTME: Integration tests for the rapidctl CLI commands.
// ABOUTME: Validates --help output, init, status and use without a container runtime.

mod support;

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use support::Workspace;

fn rapidctl_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("rapidctl"))
}

fn rapidctl_in(ws: &Workspace) -> Command {
    let mut cmd = rapidctl_cmd();
    cmd.current_dir(ws.dir.path())
        .env("HOME", ws.home.path())
        .env_remove("RAPIDCTL_SOCKET")
        .env_remove("PODMAN_SOCKET");
    cmd
}

#[test]
fn help_shows_commands() {
    rapidctl_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("versions"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("use"))
        .stdout(predicate::str::contains("ensure"));
}

#[test]
fn init_creates_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("rapidctl.yml");

    rapidctl_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--repository", "ghcr.io/acme/tool"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created rapidctl.yml"));

    assert!(config_path.exists(), "rapidctl.yml should be created");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("repository: ghcr.io/acme/tool"));
    assert!(content.contains("baseline_version:"));
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("rapidctl.yml");

    fs::write(&config_path, "repository: existing/tool\n").unwrap();

    rapidctl_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(
        fs::read_to_string(&config_path).unwrap(),
        "repository: existing/tool\n"
    );
}

#[test]
fn init_rejects_repository_with_tag() {
    let temp_dir = tempfile::tempdir().unwrap();

    rapidctl_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--repository", "ghcr.io/acme/tool:1.0"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("tag or digest"));

    assert!(!temp_dir.path().join("rapidctl.yml").exists());
}

#[test]
fn missing_config_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    rapidctl_cmd()
        .current_dir(temp_dir.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn status_reports_baseline_without_pin() {
    let ws = Workspace::new("repository: ghcr.io/acme/tool\nbaseline_version: 2.0.0\n");

    rapidctl_in(&ws)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Repository: ghcr.io/acme/tool"))
        .stdout(predicate::str::contains("Version: 2.0.0 (baseline)"))
        .stdout(predicate::str::contains("Command path: /opt/rapidctl/cmd/"));
}

#[test]
fn status_shows_configured_command_path() {
    let ws = Workspace::new("repository: ghcr.io/acme/tool
command_path: /usr/local/tool/bin/
");

    let assert = rapidctl_in(&ws).args(["--json", "status"]).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let event: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();

    assert_eq!(event["data"]["command_path"], "/usr/local/tool/bin/");
}

#[test]
fn use_persists_pin() {
    let ws = Workspace::new("repository: ghcr.io/acme/tool\n");

    rapidctl_in(&ws)
        .args(["use", "1746190043"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pinned ghcr.io/acme/tool to 1746190043"));

    let state: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(ws.state_file()).unwrap()).unwrap();
    assert_eq!(state["ghcr.io/acme/tool"], "1746190043");

    rapidctl_in(&ws)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Version: 1746190043 (pinned)"));
}

#[test]
fn use_rejects_unsafe_tag() {
    let ws = Workspace::new("repository: ghcr.io/acme/tool\n");

    rapidctl_in(&ws)
        .args(["use", "1.0; rm -rf /"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid image reference"));

    assert!(!ws.state_file().exists());
}

#[test]
fn status_json_output() {
    let ws = Workspace::new("repository: ghcr.io/acme/tool\n");

    let assert = rapidctl_in(&ws).args(["--json", "status"]).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let event: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();

    assert_eq!(event["event"], "status");
    assert_eq!(event["data"]["repository"], "ghcr.io/acme/tool");
    assert_eq!(event["data"]["version"], "1.0.0");
    assert_eq!(event["data"]["pinned"], false);
}

#[test]
fn ensure_fails_when_socket_is_missing() {
    let ws = Workspace::new("repository: ghcr.io/acme/tool\n");
    let missing = ws.dir.path().join("missing.sock");

    rapidctl_in(&ws)
        .env("RAPIDCTL_SOCKET", &missing)
        .arg("ensure")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn ensure_json_error_reports_duration() {
    let ws = Workspace::new("repository: ghcr.io/acme/tool\n");
    let missing = ws.dir.path().join("missing.sock");

    rapidctl_in(&ws)
        .env("RAPIDCTL_SOCKET", &missing)
        .args(["--json", "ensure"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(r#""event":"error""#))
        .stderr(predicate::str::contains("duration_secs"));
}
