//! The transition engine and its configuration.

/// Caller options and the resolved configuration.
pub mod options;
/// Pointer tracking in surface coordinates.
pub mod pointer;
/// The per-run frame loop.
pub mod session;
