// ABOUTME: Shared helper for connecting to the local container runtime.
// ABOUTME: Detects the socket, connects, and checks the runtime answers.

use rapidctl::diagnostics::{Diagnostics, Warning};
use rapidctl::error::Result;
use rapidctl::output::Output;
use rapidctl::runtime::{
    BollardRuntime, RuntimeConfig, RuntimeError, RuntimeInfoTrait, detect_local,
};

/// Connect to the container runtime on this machine.
///
/// This handles the common pattern of:
/// 1. Detecting the runtime type and socket path
/// 2. Outputting progress messages
/// 3. Establishing and checking the connection
pub async fn connect_to_runtime(
    config: &RuntimeConfig,
    output: &Output,
    diag: &mut Diagnostics,
) -> Result<BollardRuntime> {
    output.progress("  → Detecting runtime...");
    let runtime_info = detect_local(Some(config)).map_err(RuntimeError::from)?;

    output.progress(&format!(
        "  → Found {} at {}",
        runtime_info.runtime_type, runtime_info.socket_path
    ));

    let runtime = BollardRuntime::connect(&runtime_info, config).map_err(RuntimeError::from)?;
    runtime.ping().await.map_err(RuntimeError::from)?;

    match runtime.info().await {
        Ok(meta) => tracing::debug!(
            "connected to {} {} (API {})",
            meta.name,
            meta.version,
            meta.api_version
        ),
        Err(e) => diag.warn(Warning::runtime_query(format!(
            "could not read runtime version: {e}"
        ))),
    }

    Ok(runtime)
}

/// Print collected warnings.
pub fn emit_warnings(diag: &Diagnostics, output: &Output) {
    for warning in diag.warnings() {
        output.warning(&warning.message);
    }
}
