//! Pixmorph turns a sequence of images into a particle "materialization" effect.
//!
//! Each image is sampled into a sparse grid of coloured particles that fly from their previous
//! positions (or random ones) to the image's pixels, then the run moves on to the next image.
//!
//! # Pipeline overview
//!
//! 1. **Load**: every URL is fetched and decoded concurrently through an [`ImageLoader`].
//! 2. **Sample**: [`sample_targets`] maps an image onto the surface under a [`FitMode`] and
//!    turns every opaque grid pixel into a [`TargetPoint`].
//! 3. **Match**: with continuity enabled, the previous generation is indexed in a
//!    [`SpatialIndex`] and each target claims its nearest predecessor; the rest come from the
//!    [`ParticlePool`].
//! 4. **Animate**: [`MorphEngine::tick`] fades the [`Surface`], then updates and draws every
//!    [`Particle`] until all have arrived, waits, and starts the next image.
//!
//! The host owns the clock: call [`MorphEngine::tick`] once per display refresh, forward
//! pointer events, and call [`MorphEngine::destroy`] (or drop the engine) to tear down.
//! [`CpuSurface`] is a reference surface rasterized on the CPU.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod assets;
mod engine;
mod foundation;
mod particles;
mod render;
mod sampling;

pub use animation::ease::{CustomEase, Ease, Easing};
pub use assets::color::{
    COLOR_CACHE_SLOTS, ColorCache, format_color, parse_color, try_parse_color,
};
pub use assets::decode::decode_image;
pub use assets::loader::{FsImageLoader, ImageLoader, MemoryImageLoader, load_all};
pub use assets::store::{ImageId, LoadedImage, PixelData};
pub use engine::options::{
    InteractionConfig, InteractionOptions, InteractionSetting, MorphOptions, ResolvedConfig,
};
pub use engine::pointer::{PointerEvent, PointerTracker};
pub use engine::session::{DoneCallback, FrameStatus, HeadlessRun, MorphEngine, MorphStats, Phase};
pub use foundation::core::{HostEnv, Point, Rgba8, Vec2};
pub use foundation::error::{PixmorphError, PixmorphResult};
pub use particles::particle::{COMPLETE_AT, Particle, ParticleInit, PointShape};
pub use particles::physics::{Burst, InteractionFrame, InteractionMode, PhysicsState};
pub use particles::pool::{DEFAULT_POOL_CAPACITY, ParticlePool, PoolStats};
pub use particles::spatial::{Positioned, SpatialIndex};
pub use render::cpu::CpuSurface;
pub use render::surface::{CompositeOp, ReadError, Surface};
pub use sampling::fit::{Align, FitMode, FitTransform, compute_transform};
pub use sampling::sampler::{
    ColorSampling, ResampleCache, SampleParams, SampledImage, TargetPoint, WIDE_VIEWPORT_PX,
    effective_step, sample_targets,
};
