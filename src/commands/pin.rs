// ABOUTME: Use command implementation.
// ABOUTME: Pins a tag for the managed repository.

use super::runtime_connection::emit_warnings;
use rapidctl::client::CtlClient;
use rapidctl::diagnostics::Diagnostics;
use rapidctl::error::Result;
use rapidctl::output::Output;

pub fn pin(client: &mut CtlClient, tag: &str, output: &Output) -> Result<()> {
    let mut diag = Diagnostics::default();
    let previous = client.version().to_string();

    if let Some(warning) = client.set_version(tag)? {
        diag.warn(warning);
    }
    emit_warnings(&diag, output);

    output.success(&format!(
        "Pinned {} to {} (was {})",
        client.repository(),
        client.version(),
        previous
    ));
    Ok(())
}
