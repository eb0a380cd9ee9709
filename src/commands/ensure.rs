// ABOUTME: Ensure command implementation.
// ABOUTME: Makes the pinned image available locally, logging in once if required.

use super::runtime_connection::{connect_to_runtime, emit_warnings};
use rapidctl::acquire::{Acquisition, AcquisitionOutcome, AcquisitionState};
use rapidctl::client::CtlClient;
use rapidctl::config::Config;
use rapidctl::credentials::{CredentialCache, TerminalPrompt};
use rapidctl::diagnostics::Diagnostics;
use rapidctl::error::Result;
use rapidctl::output::Output;
use serde::Serialize;

#[derive(Serialize)]
struct Ensured<'a> {
    reference: String,
    image_id: &'a str,
    pulled: bool,
    attempts: u8,
    state: AcquisitionState,
}

pub async fn ensure(config: &Config, client: &CtlClient, output: &Output) -> Result<()> {
    let mut diag = Diagnostics::default();
    let reference = client.container_reference()?;
    let runtime = connect_to_runtime(&config.runtime, output, &mut diag).await?;
    emit_warnings(&diag, output);

    output.progress(&format!("  → Ensuring {reference} is present..."));
    let mut cache = CredentialCache::new();
    let prompt = TerminalPrompt;
    let report = Acquisition::new(&runtime, &prompt)
        .run(&mut cache, &reference)
        .await;

    if let AcquisitionOutcome::Pulled { log, .. } = &report.outcome {
        for line in log {
            output.progress(&format!("    {line}"));
        }
    }

    let pulled = matches!(report.outcome, AcquisitionOutcome::Pulled { .. });
    let attempts = report.attempts;
    let state = report.state;
    tracing::debug!("acquisition path: {:?}", report.history);
    let id = report.into_result()?;

    output.success(&format!(
        "{} ready ({}{})",
        reference,
        id.short(),
        if pulled { ", pulled" } else { "" }
    ));
    output.data(
        "ensure",
        &Ensured {
            reference: reference.to_string(),
            image_id: id.as_str(),
            pulled,
            attempts,
            state,
        },
    );
    Ok(())
}
