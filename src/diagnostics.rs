// ABOUTME: Diagnostics accumulator for non-fatal warnings during a command.
// ABOUTME: Collects warnings that shouldn't fail the command but should be shown to users.

/// Collects non-fatal warnings during a command.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// The pin could not be saved; it still applies to this run.
    pub fn preference_write(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::PreferenceWrite,
            message: message.into(),
        }
    }

    /// Runtime metadata could not be read after connecting.
    pub fn runtime_query(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::RuntimeQuery,
            message: message.into(),
        }
    }
}

/// Categories of warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Failed to persist a version pin (state file unchanged).
    PreferenceWrite,
    /// Failed to query runtime version information.
    RuntimeQuery,
}
