use serde::{Deserialize, Serialize};

use crate::animation::ease::Easing;
use crate::assets::color::ColorCache;
use crate::foundation::core::{HostEnv, Rgba8};
use crate::foundation::error::{PixmorphError, PixmorphResult};
use crate::foundation::math::clamp_finite;
use crate::particles::particle::PointShape;
use crate::particles::physics::InteractionMode;
use crate::particles::pool::DEFAULT_POOL_CAPACITY;
use crate::render::surface::CompositeOp;
use crate::sampling::fit::{Align, FitMode};
use crate::sampling::sampler::{ColorSampling, SampleParams};

/// Pointer interaction tuning. Every field has a default, so `{}` or `true` enable it as-is.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionOptions {
    /// `false` turns interaction off.
    pub enabled: bool,
    /// Force applied around the pointer.
    pub mode: InteractionMode,
    /// Influence radius, surface pixels.
    pub radius: f64,
    /// Force strength.
    pub strength: f64,
    /// Velocity retained per 1/60 s.
    pub damping: f64,
    /// Spring constant pulling particles home.
    pub spring: f64,
    /// Press burst radius; `None` or `<= 0` disables the burst.
    pub burst_radius: Option<f64>,
    /// Press burst impulse.
    pub burst_strength: Option<f64>,
}

impl Default for InteractionOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: InteractionMode::Repel,
            radius: 120.0,
            strength: 900.0,
            damping: 0.88,
            spring: 36.0,
            burst_radius: Some(220.0),
            burst_strength: Some(1100.0),
        }
    }
}

/// `interaction` accepts `false`, `true` or an options object.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InteractionSetting {
    /// `true` enables default interaction, `false` disables it.
    Flag(bool),
    /// Explicit tuning.
    Options(InteractionOptions),
}

impl Default for InteractionSetting {
    fn default() -> Self {
        Self::Flag(false)
    }
}

impl InteractionSetting {
    fn resolve(self) -> Option<InteractionOptions> {
        match self {
            Self::Flag(false) => None,
            Self::Flag(true) => Some(InteractionOptions::default()),
            Self::Options(o) if o.enabled => Some(o),
            Self::Options(_) => None,
        }
    }
}

/// Caller-supplied options for one run. Field names match the camelCase JSON schema.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MorphOptions {
    /// Image URLs in display order.
    pub images: Vec<String>,
    /// Surface width in host pixels; defaults to the viewport.
    pub width: Option<f64>,
    /// Surface height in host pixels; defaults to the viewport.
    pub height: Option<f64>,
    /// Host element the surface is attached to.
    pub container: String,
    /// Per-image animation length, ms.
    pub duration: f64,
    /// Pause between images, ms.
    pub delay: f64,
    /// Loop over the images forever.
    pub infinity: bool,
    /// Morph from the previous generation's positions instead of random ones.
    pub is_update_from_last_position: bool,
    /// CSS colour painted behind the particles.
    pub background: String,
    /// Base sampling grid spacing, surface pixels.
    pub pixel_step: f64,
    /// Pixels at or below this alpha are skipped.
    pub alpha_threshold: u8,
    /// Upper bound on particles per image; widens the step.
    pub max_particles: Option<usize>,
    /// Particle radius (circles) or half extent (squares).
    #[serde(alias = "size")]
    pub point_size: f64,
    /// How each particle is drawn.
    #[serde(alias = "shape")]
    pub point_shape: PointShape,
    /// Random per-draw offset, surface pixels.
    pub jitter: f64,
    /// Position and colour easing.
    pub easing: Easing,
    /// How images are fitted onto the surface.
    pub fit: FitMode,
    /// Horizontal placement of the fitted image.
    pub align_x: Align,
    /// Vertical placement of the fitted image.
    pub align_y: Align,
    /// Blending rule for particle draws.
    pub composite_operation: CompositeOp,
    /// Trail retention: `>= 0.999` clears every frame, lower values leave trails.
    pub fade: f64,
    /// Read continuity start colours back from the surface.
    pub sample_from_canvas: bool,
    /// Pointer interaction: a flag or an options object.
    pub interaction: InteractionSetting,
    /// Where target colours are read from.
    pub color_sampling: ColorSampling,
    /// Retired particles kept for reuse.
    pub pool_capacity: usize,
    /// Fixes every random choice when set.
    pub seed: Option<u64>,
}

impl Default for MorphOptions {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            width: None,
            height: None,
            container: "body".to_owned(),
            duration: 1000.0,
            delay: 1000.0,
            infinity: false,
            is_update_from_last_position: false,
            background: "#000".to_owned(),
            pixel_step: 4.0,
            alpha_threshold: 0,
            max_particles: None,
            point_size: 1.0,
            point_shape: PointShape::Circle,
            jitter: 0.0,
            easing: Easing::default(),
            fit: FitMode::Contain,
            align_x: Align::Center,
            align_y: Align::Center,
            composite_operation: CompositeOp::SourceOver,
            fade: 1.0,
            sample_from_canvas: true,
            interaction: InteractionSetting::default(),
            color_sampling: ColorSampling::Scaled,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            seed: None,
        }
    }
}

impl MorphOptions {
    /// Parse camelCase JSON options.
    pub fn from_json(s: &str) -> PixmorphResult<Self> {
        serde_json::from_str(s).map_err(|e| PixmorphError::serde(e.to_string()))
    }

    /// Use a custom easing function for every particle.
    pub fn with_easing_fn(mut self, f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        self.easing = Easing::custom(f);
        self
    }

    /// Resolve defaults and clamp every field once, up front.
    pub fn resolve(&self, env: &HostEnv) -> ResolvedConfig {
        let dpr = if env.device_pixel_ratio.is_finite() && env.device_pixel_ratio > 0.0 {
            env.device_pixel_ratio
        } else {
            1.0
        };
        let css = |v: Option<f64>, fallback: f64| -> f64 {
            match v {
                Some(v) if v.is_finite() && v > 0.0 => v,
                _ if fallback.is_finite() && fallback > 0.0 => fallback,
                _ => 1.0,
            }
        };
        let display_width = css(self.width, env.viewport_width);
        let display_height = css(self.height, env.viewport_height);

        let mut colors = ColorCache::new();
        let interaction = self.interaction.resolve().map(|o| InteractionConfig {
            mode: o.mode,
            radius: clamp_finite(o.radius, 0.0, f64::MAX),
            strength: clamp_finite(o.strength, 0.0, f64::MAX),
            damping: clamp_finite(o.damping, 0.0, 1.0),
            spring: clamp_finite(o.spring, 0.0, f64::MAX),
            burst: match (o.burst_radius, o.burst_strength) {
                (Some(r), Some(s)) if r > 0.0 && s.is_finite() => Some((r, s)),
                _ => None,
            },
        });

        ResolvedConfig {
            images: self.images.clone(),
            container: self.container.clone(),
            display_width,
            display_height,
            surface_width: (display_width * dpr).round().max(1.0) as u32,
            surface_height: (display_height * dpr).round().max(1.0) as u32,
            viewport_width: env.viewport_width,
            duration: clamp_finite(self.duration, 1.0, f64::MAX),
            delay: clamp_finite(self.delay, 0.0, f64::MAX),
            infinity: self.infinity,
            continuity: self.is_update_from_last_position,
            background: colors.parse(&self.background),
            sample: SampleParams {
                pixel_step: clamp_finite(self.pixel_step, 1.0, f64::MAX),
                viewport_width: env.viewport_width,
                max_particles: self.max_particles.filter(|&m| m > 0),
                alpha_threshold: self.alpha_threshold,
                fit: self.fit,
                align_x: self.align_x,
                align_y: self.align_y,
                color_sampling: self.color_sampling,
            },
            point_size: clamp_finite(self.point_size, 0.0, f64::MAX),
            point_shape: self.point_shape,
            jitter: clamp_finite(self.jitter, 0.0, f64::MAX),
            easing: self.easing.clone(),
            composite: self.composite_operation,
            fade: clamp_finite(self.fade, 0.0, 1.0),
            sample_from_canvas: self.sample_from_canvas,
            interaction,
            pool_capacity: self.pool_capacity,
            seed: self.seed,
        }
    }
}

/// Frozen pointer-interaction parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionConfig {
    /// Force applied around the pointer.
    pub mode: InteractionMode,
    /// Influence radius, surface pixels.
    pub radius: f64,
    /// Force strength.
    pub strength: f64,
    /// Velocity retained per 1/60 s.
    pub damping: f64,
    /// Spring constant.
    pub spring: f64,
    /// `(radius, strength)` of the press burst.
    pub burst: Option<(f64, f64)>,
}

/// Options after defaulting and validation; the only configuration the hot loop reads.
#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    /// Image URLs in display order.
    pub images: Vec<String>,
    /// Host element the surface is attached to.
    pub container: String,
    /// Displayed size in host pixels.
    pub display_width: f64,
    /// Displayed height in host pixels.
    pub display_height: f64,
    /// Backing-store size in surface pixels.
    pub surface_width: u32,
    /// Backing-store height.
    pub surface_height: u32,
    /// Viewport width used for step widening.
    pub viewport_width: f64,
    /// Animation length per image, ms.
    pub duration: f64,
    /// Pause after each image, ms.
    pub delay: f64,
    /// Loop forever.
    pub infinity: bool,
    /// Match new targets against previous particles.
    pub continuity: bool,
    /// Parsed background colour.
    pub background: Rgba8,
    /// Sampling parameters.
    pub sample: SampleParams,
    /// Particle radius or half extent.
    pub point_size: f64,
    /// Particle shape.
    pub point_shape: PointShape,
    /// Random draw offset.
    pub jitter: f64,
    /// Particle easing.
    pub easing: Easing,
    /// Blending rule for particle draws.
    pub composite: CompositeOp,
    /// Trail retention in `0..=1`.
    pub fade: f64,
    /// Read continuity colours back from the surface.
    pub sample_from_canvas: bool,
    /// `None` when interaction is off.
    pub interaction: Option<InteractionConfig>,
    /// Pool capacity.
    pub pool_capacity: usize,
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

#[cfg(test)]
#[path = "../../tests/unit/engine/options.rs"]
mod tests;
