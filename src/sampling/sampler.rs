use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::assets::store::{ImageId, LoadedImage};
use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::{PixmorphError, PixmorphResult};
use crate::sampling::fit::{Align, FitMode, FitTransform, compute_transform};

/// Viewports wider than this get a proportionally coarser sampling grid.
pub const WIDE_VIEWPORT_PX: f64 = 1200.0;

/// Where particle target colours are read from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSampling {
    /// The original buffer, with grid positions mapped back through the fit transform.
    Source,
    /// A copy resampled to the drawn size, matching what is displayed.
    #[default]
    Scaled,
}

/// One opaque sample: where a particle should land and what colour it should become.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetPoint {
    /// Landing position, surface pixels.
    pub pos: Point,
    /// Sampled colour.
    pub color: Rgba8,
}

/// Inputs to [`sample_targets`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleParams {
    /// Base grid spacing.
    pub pixel_step: f64,
    /// Viewport width used for widening.
    pub viewport_width: f64,
    /// Particle cap.
    pub max_particles: Option<usize>,
    /// Exclusive alpha cutoff.
    pub alpha_threshold: u8,
    /// Fit mode.
    pub fit: FitMode,
    /// Horizontal alignment.
    pub align_x: Align,
    /// Vertical alignment.
    pub align_y: Align,
    /// Colour source.
    pub color_sampling: ColorSampling,
}

/// Result of sampling one image.
#[derive(Clone, Debug)]
pub struct SampledImage {
    /// Targets in row-major grid order.
    pub points: Vec<TargetPoint>,
    /// Grid spacing in surface pixels after adaptive widening.
    pub step: u32,
    /// Mapping used for the positions.
    pub transform: FitTransform,
}

/// Grid spacing for a drawn area of `grid_w x grid_h` surface pixels.
///
/// Wide viewports scale the base step by `viewport_width / 1200`; a particle cap then widens it
/// by `sqrt(estimated / max_particles)`. The result is rounded up.
pub fn effective_step(
    pixel_step: f64,
    viewport_width: f64,
    grid_w: f64,
    grid_h: f64,
    max_particles: Option<usize>,
) -> u32 {
    let mut step = if pixel_step.is_finite() {
        pixel_step.max(1.0)
    } else {
        1.0
    };
    if viewport_width > WIDE_VIEWPORT_PX {
        step *= viewport_width / WIDE_VIEWPORT_PX;
    }
    step = step.ceil();

    if let Some(max) = max_particles.filter(|&m| m > 0) {
        let estimated = (grid_w / step).ceil().max(0.0) * (grid_h / step).ceil().max(0.0);
        if estimated > max as f64 {
            step = (step * (estimated / max as f64).sqrt()).ceil();
        }
    }
    step.clamp(1.0, f64::from(u32::MAX)) as u32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct ResampleKey {
    image: ImageId,
    w: u32,
    h: u32,
}

/// Per image x size cache of resampled pixel buffers.
#[derive(Debug, Default)]
pub struct ResampleCache {
    entries: HashMap<ResampleKey, Arc<image::RgbaImage>>,
    resamples: u64,
}

impl ResampleCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resampled copy of `img` at `w x h`, computed once per size.
    pub fn get_or_resample(
        &mut self,
        img: &LoadedImage,
        w: u32,
        h: u32,
    ) -> PixmorphResult<Arc<image::RgbaImage>> {
        let key = ResampleKey {
            image: img.id,
            w,
            h,
        };
        if let Some(hit) = self.entries.get(&key) {
            return Ok(hit.clone());
        }

        // Resize premultiplied, then restore straight alpha.
        let premul: Vec<u8> = img
            .rgba8
            .chunks_exact(4)
            .flat_map(|px| Rgba8::new(px[0], px[1], px[2], px[3]).to_premul())
            .collect();
        let view = image::RgbaImage::from_raw(img.width, img.height, premul)
            .ok_or_else(|| PixmorphError::decode("image buffer does not match its dimensions"))?;
        let mut resized =
            image::imageops::resize(&view, w, h, image::imageops::FilterType::Triangle);
        for px in resized.pixels_mut() {
            let c = Rgba8::from_premul(px.0);
            px.0 = [c.r, c.g, c.b, c.a];
        }
        let resized = Arc::new(resized);
        self.resamples += 1;
        self.entries.insert(key, resized.clone());
        Ok(resized)
    }

    /// How many resamples actually ran.
    pub fn resample_count(&self) -> u64 {
        self.resamples
    }

    /// Cached buffers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every cached buffer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Turn every sufficiently opaque grid pixel of `img` into a particle target on a
/// `surface_w x surface_h` surface.
#[tracing::instrument(skip(img, params, cache), fields(image = img.id.0))]
pub fn sample_targets(
    img: &LoadedImage,
    surface_w: u32,
    surface_h: u32,
    params: &SampleParams,
    cache: &mut ResampleCache,
) -> PixmorphResult<SampledImage> {
    if img.width == 0 || img.height == 0 {
        return Err(PixmorphError::decode("cannot sample an empty image"));
    }
    let transform = compute_transform(
        img.width,
        img.height,
        surface_w,
        surface_h,
        params.fit,
        params.align_x,
        params.align_y,
    );
    let drawn_w = transform.drawn_width.round().max(1.0) as u32;
    let drawn_h = transform.drawn_height.round().max(1.0) as u32;
    let step = effective_step(
        params.pixel_step,
        params.viewport_width,
        f64::from(drawn_w),
        f64::from(drawn_h),
        params.max_particles,
    );

    let sw = f64::from(surface_w);
    let sh = f64::from(surface_h);
    let scaled = match params.color_sampling {
        ColorSampling::Scaled => Some(cache.get_or_resample(img, drawn_w, drawn_h)?),
        ColorSampling::Source => None,
    };

    let mut points = Vec::new();
    for gy in (0..drawn_h).step_by(step as usize) {
        let y = transform.offset_y + f64::from(gy);
        if y < 0.0 || y >= sh {
            continue;
        }
        for gx in (0..drawn_w).step_by(step as usize) {
            let x = transform.offset_x + f64::from(gx);
            if x < 0.0 || x >= sw {
                continue;
            }

            let color = match &scaled {
                Some(buf) => {
                    let px = buf.get_pixel(gx, gy).0;
                    Rgba8::new(px[0], px[1], px[2], px[3])
                }
                None => {
                    let sx = (f64::from(gx) / transform.scale_x).floor() as u32;
                    let sy = (f64::from(gy) / transform.scale_y).floor() as u32;
                    match img.pixel(sx.min(img.width - 1), sy.min(img.height - 1)) {
                        Some(c) => c,
                        None => continue,
                    }
                }
            };

            if color.a <= params.alpha_threshold {
                continue;
            }
            points.push(TargetPoint {
                pos: Point::new(x, y),
                color,
            });
        }
    }

    Ok(SampledImage {
        points,
        step,
        transform,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/sampling/sampler.rs"]
mod tests;
