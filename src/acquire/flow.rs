// ABOUTME: Drives one acquisition through the state machine against a runtime.
// ABOUTME: Prompts and logs in at most once when the registry asks for credentials.

use super::error::AcquireError;
use super::resolver::{self, AcquisitionOutcome};
use super::state::{AcquisitionEvent as Event, AcquisitionState as State, StateMachine};
use crate::credentials::{CredentialCache, CredentialPrompt};
use crate::runtime::ImageOps;
use crate::types::{ImageId, ImageRef};

/// How an acquisition ended.
#[derive(Debug)]
pub struct AcquisitionReport {
    pub reference: ImageRef,
    /// Terminal state.
    pub state: State,
    /// Outcome of the last attempt.
    pub outcome: AcquisitionOutcome,
    /// Pull attempts made.
    pub attempts: u8,
    /// Every state visited, starting with `Searching`.
    pub history: Vec<State>,
    pub error: Option<AcquireError>,
}

impl AcquisitionReport {
    pub fn is_success(&self) -> bool {
        self.state.is_success()
    }

    pub fn image_id(&self) -> Option<&ImageId> {
        self.outcome.image_id()
    }

    /// The local image, or why it is not available.
    pub fn into_result(self) -> Result<ImageId, AcquireError> {
        match (self.outcome, self.error) {
            (AcquisitionOutcome::Found(id) | AcquisitionOutcome::Pulled { id, .. }, _) => Ok(id),
            (_, Some(error)) => Err(error),
            (AcquisitionOutcome::AuthRequired, None) => Err(AcquireError::AuthenticationFailed {
                reference: self.reference.to_string(),
            }),
            (AcquisitionOutcome::Failed(reason), None) => Err(AcquireError::PullFailed {
                reference: self.reference.to_string(),
                reason,
            }),
        }
    }
}

/// Makes sure an image reference is present locally.
pub struct Acquisition<'a, R: ?Sized, P: ?Sized> {
    runtime: &'a R,
    prompt: &'a P,
}

impl<'a, R, P> Acquisition<'a, R, P>
where
    R: ImageOps + ?Sized,
    P: CredentialPrompt + ?Sized,
{
    pub fn new(runtime: &'a R, prompt: &'a P) -> Self {
        Self { runtime, prompt }
    }

    /// Run the flow to a terminal state.
    ///
    /// Cached credentials for the reference's registry are used for the first
    /// pull. Credentials that log in successfully are stored in `cache`.
    pub async fn run(
        &self,
        cache: &mut CredentialCache,
        reference: &ImageRef,
    ) -> AcquisitionReport {
        let registry = reference.registry_or_default().to_string();
        let mut machine = StateMachine::new();
        let mut outcome = AcquisitionOutcome::Failed("acquisition did not start".to_string());
        let mut error = None;
        let mut attempts = 0u8;

        while !machine.state().is_terminal() {
            match machine.state() {
                State::Searching => match resolver::find_local(self.runtime, reference).await {
                    Ok(Some(id)) => {
                        outcome = AcquisitionOutcome::Found(id);
                        machine.apply(Event::LocalHit);
                    }
                    Ok(None) => {
                        machine.apply(Event::LocalMiss);
                    }
                    Err(e) => {
                        outcome = AcquisitionOutcome::Failed(e.to_string());
                        error = Some(AcquireError::Lookup(e.to_string()));
                        machine.apply(Event::LookupFailed);
                    }
                },
                State::NotFound => {
                    machine.apply(Event::PullStarted);
                }
                State::Pulling | State::RetryPulling => {
                    attempts += 1;
                    outcome = resolver::pull(self.runtime, reference, cache.get(&registry)).await;
                    let event = match &outcome {
                        AcquisitionOutcome::Found(_) | AcquisitionOutcome::Pulled { .. } => {
                            Event::PullSucceeded
                        }
                        AcquisitionOutcome::AuthRequired => Event::PullAuthRejected,
                        AcquisitionOutcome::Failed(reason) => {
                            error = Some(AcquireError::PullFailed {
                                reference: reference.to_string(),
                                reason: reason.clone(),
                            });
                            Event::PullFailed
                        }
                    };
                    if machine.apply(event) == State::Failed
                        && outcome == AcquisitionOutcome::AuthRequired
                    {
                        cache.forget(&registry);
                        error = Some(AcquireError::AuthenticationFailed {
                            reference: reference.to_string(),
                        });
                    }
                }
                State::AuthRequired => {
                    if machine.apply(Event::CredentialsRequested) == State::Failed {
                        error = Some(AcquireError::AuthenticationFailed {
                            reference: reference.to_string(),
                        });
                    }
                }
                State::Authenticating => match self.authenticate(&registry, cache).await {
                    Ok(()) => {
                        machine.apply(Event::CredentialsObtained);
                    }
                    Err(e) => {
                        outcome = AcquisitionOutcome::Failed(e.to_string());
                        error = Some(e);
                        machine.apply(Event::LoginFailed);
                    }
                },
                State::Found | State::PullSuccess | State::Failed | State::AuthFailed => break,
            }
        }

        let state = machine.state();
        if state.is_success() {
            error = None;
        }
        tracing::debug!(
            "acquisition of {} finished {} after {} pull attempt(s)",
            reference,
            state,
            attempts
        );

        AcquisitionReport {
            reference: reference.clone(),
            state,
            outcome,
            attempts,
            history: machine.into_history(),
            error,
        }
    }

    async fn authenticate(
        &self,
        registry: &str,
        cache: &mut CredentialCache,
    ) -> Result<(), AcquireError> {
        let auth = self
            .prompt
            .prompt(registry)
            .map_err(|source| AcquireError::Prompt {
                registry: registry.to_string(),
                source,
            })?;

        self.runtime
            .login(&auth)
            .await
            .map_err(|e| AcquireError::LoginFailed {
                registry: registry.to_string(),
                reason: e.to_string(),
            })?;

        tracing::info!("logged in to {} as {}", registry, auth.username);
        cache.insert(registry, auth);
        Ok(())
    }
}
