//! Drawing surfaces.

/// CPU reference surface.
pub mod cpu;
/// The surface collaborator trait.
pub mod surface;
