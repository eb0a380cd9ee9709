// ABOUTME: Sealed marker for runtime capability traits.
// ABOUTME: Only runtimes defined in this crate (and its test doubles) may implement them.

/// Marker that closes the runtime traits to outside implementations.
///
/// New trait methods can then be added without a breaking release.
pub trait Sealed {}
