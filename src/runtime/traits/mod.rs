// ABOUTME: Capability traits for container runtimes.
// ABOUTME: Defines ImageOps and RuntimeInfo plus the types they exchange.

mod image;
mod runtime_info;
pub(crate) mod sealed;
mod shared_types;

pub use image::{ImageError, ImageOps, is_auth_message};
pub use runtime_info::{RuntimeInfo, RuntimeInfoError};
pub use shared_types::*;
