//! Particles, their pointer physics, pooling and nearest-neighbour matching.

/// A single animated particle.
pub mod particle;
/// Spring-damper displacement driven by the pointer.
pub mod physics;
/// Bounded reuse of retired particles.
pub mod pool;
/// Uniform-grid index used to match a generation to its predecessor.
pub mod spatial;
