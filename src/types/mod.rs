// ABOUTME: Validated domain types: image references, tag versions, identifiers.
// ABOUTME: Parsing here never touches the runtime; sanitization happens before it.

mod id;
mod image_ref;
pub mod version;

pub use id::ImageId;
pub use image_ref::{DEFAULT_REGISTRY, ImageRef, ParseImageRefError, sanitize};
pub use version::{LATEST, Version, VersionKind, compare, newest, rank_newest_first};
