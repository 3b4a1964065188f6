//! Shared value types, error taxonomy and integer colour math.

/// Colours, points and host environment.
pub mod core;
/// Crate error types.
pub mod error;
pub(crate) mod math;
