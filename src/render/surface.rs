use serde::{Deserialize, Serialize};

use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::PixmorphResult;

/// Pixel blending rule for particle draws, named after the 2D canvas operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositeOp {
    /// Draw over existing content.
    #[default]
    SourceOver,
    /// Draw behind existing content.
    DestinationOver,
    /// Replace the frame with the particles.
    Copy,
    /// Keep only non-overlapping parts.
    Xor,
    /// Add colours.
    Lighter,
    /// Multiply colours.
    Multiply,
    /// Inverse multiply.
    Screen,
    /// Multiply or screen by destination.
    Overlay,
    /// Keep the darker colour.
    Darken,
    /// Keep the lighter colour.
    Lighten,
    /// Absolute difference.
    Difference,
}

/// Why a pixel could not be read back.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    /// The coordinates fall outside the surface.
    #[error("pixel ({x}, {y}) is outside the surface")]
    OutOfBounds {
        /// Requested column.
        x: i64,
        /// Requested row.
        y: i64,
    },
    /// The surface holds content that may not be read back.
    #[error("surface is not readable")]
    Tainted,
    /// The surface has no backing pixels.
    #[error("surface has no pixel storage")]
    Unavailable,
}

/// Immediate-mode 2D drawing surface the engine renders onto.
///
/// Drawing calls between two [`Surface::flush`] calls may be batched; reads and full-surface
/// fills only need to observe flushed content.
pub trait Surface {
    /// Backing-store size in pixels.
    fn size(&self) -> (u32, u32);

    /// Insert the surface into the host under `container`.
    fn attach(&mut self, container: &str) -> PixmorphResult<()>;

    /// Remove the surface from the host. Calling it when detached is a no-op.
    fn detach(&mut self);

    /// Reset every pixel to `backdrop`.
    fn clear(&mut self, backdrop: Rgba8);

    /// Source-over fill of the whole surface with `color` at `alpha` opacity.
    fn fill_all(&mut self, color: Rgba8, alpha: f64);

    /// Compositing rule used by subsequent particle draws.
    fn set_composite(&mut self, op: CompositeOp);

    /// Filled circle centred on `center`.
    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8);

    /// Axis-aligned square centred on `center`.
    fn fill_square(&mut self, center: Point, half_extent: f64, color: Rgba8);

    /// Complete all batched drawing.
    fn flush(&mut self) {}

    /// Straight-alpha colour at `(x, y)`.
    fn read_pixel(&self, x: i64, y: i64) -> Result<Rgba8, ReadError>;
}
