// ABOUTME: Status command implementation.
// ABOUTME: Shows the managed repository and which version is in effect.

use rapidctl::client::{CtlClient, VersionSource};
use rapidctl::output::Output;
use serde::Serialize;

#[derive(Serialize)]
struct Status<'a> {
    repository: &'a str,
    version: &'a str,
    pinned: bool,
    baseline_version: &'a str,
    command_path: String,
    state_file: String,
}

pub fn status(client: &CtlClient, output: &Output) {
    let pinned = client.source() == VersionSource::Pinned;

    output.line(&format!("Repository: {}", client.repository()));
    output.line(&format!(
        "Version: {}{}",
        client.version(),
        if pinned { " (pinned)" } else { " (baseline)" }
    ));
    output.line(&format!("Command path: {}", client.command_path().display()));
    output.line(&format!("State file: {}", client.store().path().display()));

    output.data(
        "status",
        &Status {
            repository: client.repository(),
            version: client.version(),
            pinned,
            baseline_version: client.baseline_version(),
            command_path: client.command_path().display().to_string(),
            state_file: client.store().path().display().to_string(),
        },
    );
}
