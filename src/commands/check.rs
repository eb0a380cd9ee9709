// ABOUTME: Check command implementation.
// ABOUTME: Finds a newer local version than the pin and optionally pins it.

use super::runtime_connection::{connect_to_runtime, emit_warnings};
use rapidctl::catalog::find_newer_version;
use rapidctl::client::CtlClient;
use rapidctl::config::Config;
use rapidctl::diagnostics::Diagnostics;
use rapidctl::error::Result;
use rapidctl::output::Output;
use serde::Serialize;

#[derive(Serialize)]
struct CheckResult<'a> {
    repository: &'a str,
    current: &'a str,
    newer: Option<&'a str>,
    applied: bool,
}

pub async fn check(
    config: &Config,
    client: &mut CtlClient,
    apply: bool,
    output: &Output,
) -> Result<()> {
    let mut diag = Diagnostics::default();
    let runtime = connect_to_runtime(&config.runtime, output, &mut diag).await?;

    let current = client.version().to_string();
    let newer = find_newer_version(&runtime, client.repository(), &current).await?;

    let applied = match newer.as_deref() {
        Some(tag) if apply => {
            if let Some(warning) = client.set_version(tag)? {
                diag.warn(warning);
            }
            output.success(&format!(
                "Updated {} from {} to {}",
                client.repository(),
                current,
                tag
            ));
            true
        }
        Some(tag) => {
            output.success(&format!(
                "Newer version available: {tag} (current {current}); run `rapidctl check --apply` to use it"
            ));
            false
        }
        None => {
            output.success(&format!("{} is up to date at {}", client.repository(), current));
            false
        }
    };

    emit_warnings(&diag, output);
    output.data(
        "check",
        &CheckResult {
            repository: client.repository(),
            current: &current,
            newer: newer.as_deref(),
            applied,
        },
    );
    Ok(())
}
