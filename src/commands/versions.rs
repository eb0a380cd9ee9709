// ABOUTME: Versions command implementation.
// ABOUTME: Lists local tags of the managed repository, newest first.

use super::runtime_connection::{connect_to_runtime, emit_warnings};
use rapidctl::catalog::list_local_versions;
use rapidctl::client::CtlClient;
use rapidctl::config::Config;
use rapidctl::diagnostics::Diagnostics;
use rapidctl::error::Result;
use rapidctl::output::Output;
use serde::Serialize;

#[derive(Serialize)]
struct VersionList<'a> {
    repository: &'a str,
    current: &'a str,
    versions: &'a [String],
}

pub async fn versions(config: &Config, client: &CtlClient, output: &Output) -> Result<()> {
    let mut diag = Diagnostics::default();
    let runtime = connect_to_runtime(&config.runtime, output, &mut diag).await?;
    emit_warnings(&diag, output);

    let versions = list_local_versions(&runtime, client.repository()).await?;

    if versions.is_empty() {
        output.line(&format!("No local versions of {}", client.repository()));
    }
    for tag in &versions {
        let marker = if tag == client.version() { "*" } else { " " };
        output.line(&format!("{marker} {tag}"));
    }

    output.data(
        "versions",
        &VersionList {
            repository: client.repository(),
            current: client.version(),
            versions: &versions,
        },
    );
    Ok(())
}
