// ABOUTME: Image acquisition: local lookup, pull, and a single authentication retry.
// ABOUTME: The flow is an explicit state machine driven against an ImageOps runtime.

mod error;
mod flow;
pub mod resolver;
pub mod state;

pub use error::AcquireError;
pub use flow::{Acquisition, AcquisitionReport};
pub use resolver::{AcquisitionOutcome, ensure_present, find_local};
pub use state::{AcquisitionEvent, AcquisitionState, MAX_AUTH_RETRIES, StateMachine, transition};
