// ABOUTME: Registry credentials: a caller-owned cache and the interactive prompt.
// ABOUTME: Prompting reads from the controlling terminal and refuses to run without one.

use crate::runtime::RegistryAuth;
use std::collections::HashMap;
use std::io::IsTerminal;

/// Errors while asking the operator for credentials.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("credentials required for {0} but no terminal is attached")]
    NotInteractive(String),

    #[error("empty username for {0}")]
    EmptyUsername(String),

    #[error("terminal prompt failed: {0}")]
    Terminal(#[from] dialoguer::Error),
}

/// Supplies credentials for a registry on demand.
pub trait CredentialPrompt {
    fn prompt(&self, registry: &str) -> Result<RegistryAuth, PromptError>;
}

/// Prompts on the terminal with a visible username and hidden password.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl CredentialPrompt for TerminalPrompt {
    fn prompt(&self, registry: &str) -> Result<RegistryAuth, PromptError> {
        if !std::io::stdin().is_terminal() {
            return Err(PromptError::NotInteractive(registry.to_string()));
        }

        eprintln!("Authentication required for {registry}");
        let username: String = dialoguer::Input::new()
            .with_prompt("Username")
            .interact_text()?;
        if username.trim().is_empty() {
            return Err(PromptError::EmptyUsername(registry.to_string()));
        }
        let password = dialoguer::Password::new()
            .with_prompt("Password")
            .interact()?;

        Ok(RegistryAuth {
            username: username.trim().to_string(),
            password,
            server: Some(registry.to_string()),
        })
    }
}

/// Credentials that worked during this process, keyed by registry host.
///
/// Owned by whoever drives acquisitions; nothing is written to disk.
#[derive(Debug, Default)]
pub struct CredentialCache {
    entries: HashMap<String, RegistryAuth>,
}

impl CredentialCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, registry: &str) -> Option<&RegistryAuth> {
        self.entries.get(registry)
    }

    pub fn insert(&mut self, registry: &str, auth: RegistryAuth) {
        self.entries.insert(registry.to_string(), auth);
    }

    pub fn forget(&mut self, registry: &str) -> Option<RegistryAuth> {
        self.entries.remove(registry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
