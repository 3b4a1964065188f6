use std::sync::Arc;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{PixmorphError, PixmorphResult};

/// Decoded pixels as produced by an [`crate::ImageLoader`].
#[derive(Clone, Debug)]
pub struct PixelData {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Straight RGBA8, row-major, tightly packed.
    pub rgba8: Vec<u8>,
}

impl PixelData {
    /// Validate the buffer length against the dimensions.
    pub fn new(width: u32, height: u32, rgba8: Vec<u8>) -> PixmorphResult<Self> {
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if rgba8.len() != expected {
            return Err(PixmorphError::decode(format!(
                "pixel buffer has {} bytes, expected {expected} for {width}x{height}",
                rgba8.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8,
        })
    }
}

/// Identity of a loaded image for the lifetime of one run. Keys the resample cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub u32);

/// Immutable decoded image owned by the engine for the whole run.
///
/// Cloning is cheap; the pixel buffer is shared.
#[derive(Clone, Debug)]
pub struct LoadedImage {
    /// Position in the run's image list.
    pub id: ImageId,
    /// URL the image was loaded from.
    pub url: Arc<str>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Straight RGBA8, row-major, tightly packed.
    pub rgba8: Arc<Vec<u8>>,
}

impl LoadedImage {
    /// Take ownership of decoded pixels.
    pub fn new(id: ImageId, url: impl Into<Arc<str>>, pixels: PixelData) -> Self {
        Self {
            id,
            url: url.into(),
            width: pixels.width,
            height: pixels.height,
            rgba8: Arc::new(pixels.rgba8),
        }
    }

    /// Colour at `(x, y)`; `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.rgba8.get(i..i + 4)?;
        Some(Rgba8::new(px[0], px[1], px[2], px[3]))
    }
}
