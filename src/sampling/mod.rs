//! Mapping images onto the surface and sampling them into particle targets.

/// Fit modes, alignment and the image-to-surface transform.
pub mod fit;
/// Grid sampling with an adaptive step and a resample cache.
pub mod sampler;
