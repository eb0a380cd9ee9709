// ABOUTME: Command module aggregator for the rapidctl CLI.
// ABOUTME: Re-exports status, versions, check, pin, and ensure command handlers.

mod check;
mod ensure;
mod pin;
mod runtime_connection;
mod status;
mod versions;

pub use check::check;
pub use ensure::ensure;
pub use pin::pin;
pub use status::status;
pub use versions::versions;
