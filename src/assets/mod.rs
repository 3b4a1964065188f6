//! Image acquisition and colour parsing.

/// CSS-style colour codec.
pub mod color;
/// Encoded bytes to RGBA8.
pub mod decode;
/// The image-loading collaborator and its implementations.
pub mod loader;
/// Decoded image records.
pub mod store;
