// ABOUTME: Acquisition states, the events that move between them, and the transition function.
// ABOUTME: The authentication retry counter is capped so only one login cycle can happen.

use std::fmt;

/// Authentication cycles allowed per acquisition.
pub const MAX_AUTH_RETRIES: u8 = 1;

/// Where an acquisition currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum AcquisitionState {
    Searching,
    Found,
    NotFound,
    Pulling,
    PullSuccess,
    AuthRequired,
    Authenticating,
    RetryPulling,
    Failed,
    AuthFailed,
}

impl AcquisitionState {
    /// `Found`, `PullSuccess`, `Failed` and `AuthFailed` end the flow.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AcquisitionState::Found
                | AcquisitionState::PullSuccess
                | AcquisitionState::Failed
                | AcquisitionState::AuthFailed
        )
    }

    /// Terminal and the image is available locally.
    pub fn is_success(self) -> bool {
        matches!(self, AcquisitionState::Found | AcquisitionState::PullSuccess)
    }
}

impl fmt::Display for AcquisitionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AcquisitionState::Searching => "searching",
            AcquisitionState::Found => "found",
            AcquisitionState::NotFound => "not found",
            AcquisitionState::Pulling => "pulling",
            AcquisitionState::PullSuccess => "pulled",
            AcquisitionState::AuthRequired => "authentication required",
            AcquisitionState::Authenticating => "authenticating",
            AcquisitionState::RetryPulling => "retrying pull",
            AcquisitionState::Failed => "failed",
            AcquisitionState::AuthFailed => "authentication failed",
        };
        f.write_str(name)
    }
}

/// Something the driver observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionEvent {
    LocalHit,
    LocalMiss,
    LookupFailed,
    PullStarted,
    PullSucceeded,
    PullAuthRejected,
    PullFailed,
    CredentialsRequested,
    CredentialsObtained,
    LoginFailed,
}

/// Next state and retry count for `event` in `state`.
///
/// Pairs with no defined edge go to `Failed`. Terminal states never move.
pub fn transition(
    state: AcquisitionState,
    event: AcquisitionEvent,
    retries: u8,
) -> (AcquisitionState, u8) {
    use AcquisitionEvent as E;
    use AcquisitionState as S;

    if state.is_terminal() {
        return (state, retries);
    }

    let next = match (state, event) {
        (S::Searching, E::LocalHit) => S::Found,
        (S::Searching, E::LocalMiss) => S::NotFound,
        (S::NotFound, E::PullStarted) => S::Pulling,
        (S::Pulling, E::PullSucceeded) => S::PullSuccess,
        (S::Pulling, E::PullAuthRejected) => S::AuthRequired,
        (S::AuthRequired, E::CredentialsRequested) if retries < MAX_AUTH_RETRIES => {
            return (S::Authenticating, retries + 1);
        }
        (S::Authenticating, E::CredentialsObtained) => S::RetryPulling,
        (S::Authenticating, E::LoginFailed) => S::AuthFailed,
        (S::RetryPulling, E::PullSucceeded) => S::PullSuccess,
        _ => S::Failed,
    };
    (next, retries)
}

/// Tracks the current state, retry count and every state visited.
#[derive(Debug, Clone)]
pub struct StateMachine {
    state: AcquisitionState,
    retries: u8,
    history: Vec<AcquisitionState>,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            state: AcquisitionState::Searching,
            retries: 0,
            history: vec![AcquisitionState::Searching],
        }
    }

    pub fn state(&self) -> AcquisitionState {
        self.state
    }

    pub fn retries(&self) -> u8 {
        self.retries
    }

    pub fn history(&self) -> &[AcquisitionState] {
        &self.history
    }

    pub fn apply(&mut self, event: AcquisitionEvent) -> AcquisitionState {
        let (next, retries) = transition(self.state, event, self.retries);
        if next != self.state {
            tracing::debug!("acquisition: {} -> {} on {:?}", self.state, next, event);
            self.history.push(next);
        }
        self.state = next;
        self.retries = retries;
        next
    }

    pub fn into_history(self) -> Vec<AcquisitionState> {
        self.history
    }
}
