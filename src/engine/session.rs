use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::mpsc;

use crate::assets::loader::{ImageLoader, load_all};
use crate::assets::store::{ImageId, LoadedImage};
use crate::engine::options::{MorphOptions, ResolvedConfig};
use crate::engine::pointer::{PointerEvent, PointerTracker};
use crate::foundation::core::{HostEnv, Point, Rgba8, Vec2};
use crate::foundation::error::{PixmorphError, PixmorphResult};
use crate::particles::particle::{Particle, ParticleInit};
use crate::particles::physics::{Burst, InteractionFrame};
use crate::particles::pool::{ParticlePool, PoolStats};
use crate::particles::spatial::{Positioned, SpatialIndex};
use crate::render::surface::Surface;
use crate::sampling::sampler::{ResampleCache, TargetPoint, sample_targets};

/// Longest physics step, in seconds. Longer gaps between ticks (a backgrounded host, a stall)
/// are integrated as this.
const MAX_PHYSICS_DT: f64 = 0.05;

/// Step assumed for the very first frame.
const FIRST_FRAME_DT: f64 = 1.0 / 60.0;

/// Called once when a non-looping run has shown its last image.
pub type DoneCallback = Box<dyn FnOnce() + Send + 'static>;

/// Where a run is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    /// Waiting for image decoding.
    Loading,
    /// The next tick builds a generation from the next queued image.
    Generating,
    /// The active generation is moving toward its targets.
    Animating,
    /// Every particle arrived; the next image starts at `until` (ms).
    Delaying {
        /// Deadline for the next generation, ms.
        until: f64,
    },
    /// The queue ran dry in non-looping mode.
    Done,
    /// `destroy` ran; the engine is inert.
    Destroyed,
}

/// What a call to [`MorphEngine::tick`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    /// Images are still decoding; nothing was drawn.
    Pending,
    /// A frame was drawn.
    Rendered,
    /// The run completed; the frame loop is stopped.
    Finished,
    /// The engine was torn down.
    Destroyed,
}

/// Counters accumulated over a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MorphStats {
    /// Frames drawn so far.
    pub frames_rendered: u64,
    /// Generations started.
    pub generations: u64,
    /// Previous-generation particles claimed by continuity matching.
    pub particles_matched: u64,
    /// Particles taken from the pool for a generation.
    pub particles_pooled: u64,
    /// Particles allocated for a generation.
    pub particles_created: u64,
    /// Continuity colours that fell back to interpolation because read-back failed.
    pub readback_fallbacks: u64,
}

/// Fixed-step clock for driving an engine without a display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadlessRun {
    /// Frames per simulated second.
    pub fps: f64,
    /// Stop after this many ticks.
    pub max_frames: u64,
    /// Timestamp of the first frame, ms.
    pub start_ms: f64,
}

impl Default for HeadlessRun {
    fn default() -> Self {
        Self {
            fps: 60.0,
            max_frames: 600,
            start_ms: 0.0,
        }
    }
}

/// One particle-morph run over a sequence of images.
///
/// The host drives it by calling [`MorphEngine::tick`] once per display refresh with a
/// monotonic millisecond timestamp. All state, including the particle pool and the random
/// "current" colour, belongs to the instance, so independent engines never interfere.
pub struct MorphEngine<S: Surface> {
    cfg: ResolvedConfig,
    surface: S,
    phase: Phase,
    loading: Option<mpsc::Receiver<Vec<LoadedImage>>>,
    queue: VecDeque<LoadedImage>,
    history: VecDeque<LoadedImage>,
    current: Option<ImageId>,
    active: Vec<Particle>,
    pool: ParticlePool,
    resample: ResampleCache,
    rng: fastrand::Rng,
    current_color: Rgba8,
    pointer: PointerTracker,
    last_tick: Option<f64>,
    on_done: Option<DoneCallback>,
    stats: MorphStats,
}

impl<S: Surface> MorphEngine<S> {
    /// Resolve `options`, create and attach the surface, and start decoding every image in the
    /// background. The engine stays in [`Phase::Loading`] until the decodes have all finished.
    pub fn start<F>(
        options: MorphOptions,
        env: &HostEnv,
        loader: Arc<dyn ImageLoader>,
        make_surface: F,
        on_done: Option<DoneCallback>,
    ) -> PixmorphResult<Self>
    where
        F: FnOnce(u32, u32) -> PixmorphResult<S>,
    {
        let cfg = options.resolve(env);
        let mut surface = make_surface(cfg.surface_width, cfg.surface_height)?;
        surface.attach(&cfg.container)?;
        surface.clear(cfg.background);

        let (tx, rx) = mpsc::channel();
        let urls = cfg.images.clone();
        if urls.is_empty() {
            let _ = tx.send(Vec::new());
        } else {
            rayon::spawn(move || {
                let images = load_all(loader.as_ref(), &urls);
                // The receiver is gone when the run was torn down first.
                let _ = tx.send(images);
            });
        }

        let mut rng = match cfg.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let current_color = random_color(&mut rng);
        tracing::debug!(
            images = cfg.images.len(),
            width = cfg.surface_width,
            height = cfg.surface_height,
            "morph run started"
        );

        Ok(Self {
            pool: ParticlePool::new(cfg.pool_capacity),
            cfg,
            surface,
            phase: Phase::Loading,
            loading: Some(rx),
            queue: VecDeque::new(),
            history: VecDeque::new(),
            current: None,
            active: Vec::new(),
            resample: ResampleCache::new(),
            rng,
            current_color,
            pointer: PointerTracker::new(),
            last_tick: None,
            on_done,
            stats: MorphStats::default(),
        })
    }

    /// Wait for background decoding to finish. Returns the number of usable images.
    pub fn block_until_loaded(&mut self) -> usize {
        if let Some(rx) = self.loading.take() {
            let images = rx.recv().unwrap_or_else(|_| {
                tracing::warn!("image loading stopped before delivering results");
                Vec::new()
            });
            self.images_loaded(images);
        }
        self.queue.len()
    }

    fn poll_loading(&mut self) {
        let Some(rx) = &self.loading else {
            return;
        };
        match rx.try_recv() {
            Ok(images) => {
                self.loading = None;
                self.images_loaded(images);
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                tracing::warn!("image loading stopped before delivering results");
                self.loading = None;
                self.images_loaded(Vec::new());
            }
        }
    }

    fn images_loaded(&mut self, images: Vec<LoadedImage>) {
        if self.phase != Phase::Loading {
            return;
        }
        tracing::debug!(
            loaded = images.len(),
            requested = self.cfg.images.len(),
            "images decoded"
        );
        self.queue = images.into();
        self.phase = Phase::Generating;
    }

    /// Advance the run to `now` (ms) and draw one frame.
    pub fn tick(&mut self, now: f64) -> FrameStatus {
        match self.phase {
            Phase::Destroyed => return FrameStatus::Destroyed,
            Phase::Done => return FrameStatus::Finished,
            Phase::Loading => {
                self.poll_loading();
                if self.phase == Phase::Loading {
                    return FrameStatus::Pending;
                }
            }
            Phase::Delaying { until } if now >= until => self.phase = Phase::Generating,
            _ => {}
        }

        if self.phase == Phase::Generating && !self.next_generation(now) {
            self.finish();
            return FrameStatus::Finished;
        }

        let all_done = self.render_frame(now);
        if self.phase == Phase::Animating && all_done {
            self.generation_complete(now);
        }
        FrameStatus::Rendered
    }

    fn next_image(&mut self) -> Option<LoadedImage> {
        if self.queue.is_empty()
            && self.cfg.infinity
            && let Some(img) = self.history.pop_front()
        {
            self.queue.push_back(img);
        }
        self.queue.pop_front()
    }

    /// Build the next generation. Returns `false` when there is nothing left to show.
    fn next_generation(&mut self, now: f64) -> bool {
        let (sw, sh) = self.surface.size();
        while let Some(img) = self.next_image() {
            match sample_targets(&img, sw, sh, &self.cfg.sample, &mut self.resample) {
                Ok(sampled) => {
                    self.build_generation(&sampled.points, f64::from(sampled.step), now);
                    tracing::debug!(
                        image = img.id.0,
                        particles = self.active.len(),
                        step = sampled.step,
                        "generation started"
                    );
                    self.current = Some(img.id);
                    self.history.push_back(img);
                    self.phase = Phase::Animating;
                    self.stats.generations += 1;
                    return true;
                }
                Err(err) => {
                    tracing::warn!(url = %img.url, error = %err, "image could not be sampled, skipping");
                }
            }
        }
        false
    }

    fn build_generation(&mut self, targets: &[TargetPoint], step: f64, now: f64) {
        let (sw, sh) = self.surface.size();
        let bounds = Vec2::new(f64::from(sw), f64::from(sh));
        let previous = std::mem::take(&mut self.active);
        let pool_before = self.pool.stats();
        let mut next = Vec::with_capacity(targets.len());

        if self.cfg.continuity && !previous.is_empty() {
            let cell = SpatialIndex::<Particle>::cell_size_for_step(step);
            let mut index = SpatialIndex::build(previous, cell);
            let mut slots: Vec<Option<Particle>> = Vec::with_capacity(targets.len());
            for tp in targets {
                let claimed = index.take_closest(tp.pos).map(|mut p| {
                    let from = self.continuity_color(&mut p);
                    let init = self.particle_init(tp, Some(p.position()), from, bounds, now);
                    p.reset(init, &mut self.rng);
                    self.stats.particles_matched += 1;
                    p
                });
                slots.push(claimed);
            }
            // Unclaimed particles refill the pool before unmatched targets draw from it.
            self.pool.recycle(index.drain_remaining());
            for (tp, slot) in targets.iter().zip(slots) {
                let p = match slot {
                    Some(p) => p,
                    None => {
                        let init = self.particle_init(tp, None, self.current_color, bounds, now);
                        self.pool.acquire_or_create(init, &mut self.rng)
                    }
                };
                next.push(p);
            }
        } else {
            self.pool.recycle(previous);
            for tp in targets {
                let init = self.particle_init(tp, None, self.current_color, bounds, now);
                next.push(self.pool.acquire_or_create(init, &mut self.rng));
            }
        }

        let pool_after = self.pool.stats();
        self.stats.particles_pooled += pool_after.reused - pool_before.reused;
        self.stats.particles_created += pool_after.created - pool_before.created;
        self.active = next;
    }

    fn particle_init(
        &self,
        tp: &TargetPoint,
        start: Option<Point>,
        from_color: Rgba8,
        bounds: Vec2,
        now: f64,
    ) -> ParticleInit {
        ParticleInit {
            target: tp.pos,
            start,
            bounds,
            size: self.cfg.point_size,
            shape: self.cfg.point_shape,
            jitter: self.cfg.jitter,
            from_color,
            to_color: tp.color,
            easing: self.cfg.easing.clone(),
            duration: self.cfg.duration,
            now,
        }
    }

    /// Start colour for a particle that continues from the previous generation: what is on the
    /// surface under it, or its own interpolated colour when that cannot be read.
    fn continuity_color(&mut self, p: &mut Particle) -> Rgba8 {
        if !self.cfg.sample_from_canvas {
            return p.current_color();
        }
        let pos = p.position();
        match self
            .surface
            .read_pixel(pos.x.floor() as i64, pos.y.floor() as i64)
        {
            Ok(c) => c,
            Err(err) => {
                tracing::debug!(x = pos.x, y = pos.y, error = %err, "read-back failed, interpolating");
                self.stats.readback_fallbacks += 1;
                p.current_color()
            }
        }
    }

    /// Fade, then update and draw every active particle. Returns whether all have arrived.
    fn render_frame(&mut self, now: f64) -> bool {
        let dt = match self.last_tick {
            Some(prev) => ((now - prev) / 1000.0).clamp(0.0, MAX_PHYSICS_DT),
            None => FIRST_FRAME_DT,
        };
        self.last_tick = Some(now);

        if self.cfg.fade >= 0.999 {
            self.surface.clear(self.cfg.background);
        } else {
            self.surface.fill_all(self.cfg.background, 1.0 - self.cfg.fade);
        }
        self.surface.set_composite(self.cfg.composite);

        let frame = self.interaction_frame(dt);
        let mut all_done = true;
        for p in &mut self.active {
            p.update(now, frame.as_ref());
            p.render(&mut self.surface, &mut self.rng);
            all_done &= p.is_completed();
        }
        self.surface.flush();
        self.stats.frames_rendered += 1;
        all_done
    }

    fn interaction_frame(&mut self, dt: f64) -> Option<InteractionFrame> {
        let cfg = self.cfg.interaction?;
        let burst = self.pointer.take_burst().and_then(|center| {
            cfg.burst
                .map(|(radius, strength)| Burst { center, radius, strength })
        });
        Some(InteractionFrame {
            mode: cfg.mode,
            pointer: self.pointer.pointer(),
            radius: cfg.radius,
            strength: cfg.strength,
            damping: cfg.damping,
            spring: cfg.spring,
            burst,
            dt,
        })
    }

    fn generation_complete(&mut self, now: f64) {
        self.current_color = random_color(&mut self.rng);
        let until = now + self.cfg.delay + self.cfg.duration;
        tracing::debug!(image = ?self.current.map(|id| id.0), until, "generation complete");
        self.phase = Phase::Delaying { until };
    }

    fn finish(&mut self) {
        self.phase = Phase::Done;
        tracing::info!(
            generations = self.stats.generations,
            frames = self.stats.frames_rendered,
            "morph run finished"
        );
        if let Some(cb) = self.on_done.take() {
            cb();
        }
    }

    /// Stop the run, recycle its particles and detach the surface. Safe to call repeatedly and
    /// while images are still loading.
    pub fn destroy(&mut self) {
        if self.phase == Phase::Destroyed {
            return;
        }
        self.phase = Phase::Destroyed;
        self.loading = None;
        self.on_done = None;
        self.pool.recycle(self.active.drain(..));
        self.queue.clear();
        self.history.clear();
        self.current = None;
        self.pointer.reset();
        self.surface.detach();
        tracing::info!(frames = self.stats.frames_rendered, "morph run destroyed");
    }

    fn interaction_enabled(&self) -> bool {
        self.cfg.interaction.is_some() && self.phase != Phase::Destroyed
    }

    /// Forward a pointer move in host coordinates.
    pub fn pointer_move(&mut self, ev: PointerEvent) {
        if self.interaction_enabled() {
            self.pointer.moved(&ev, self.surface.size());
        }
    }

    /// Pointer entered the surface.
    pub fn pointer_enter(&mut self, ev: PointerEvent) {
        self.pointer_move(ev);
    }

    /// Pointer left the surface.
    pub fn pointer_leave(&mut self) {
        if self.interaction_enabled() {
            self.pointer.left();
        }
    }

    /// Press: moves the pointer and stages a burst for the next frame.
    pub fn pointer_down(&mut self, ev: PointerEvent) {
        if self.interaction_enabled() {
            self.pointer.pressed(&ev, self.surface.size());
        }
    }

    /// Drive the run with a fixed-step clock, calling `on_frame` after every rendered frame.
    /// Stops after `max_frames` ticks or when the run finishes. Returns the frames rendered.
    pub fn run_headless(
        &mut self,
        run: HeadlessRun,
        mut on_frame: impl FnMut(u64, &mut S),
    ) -> PixmorphResult<u64> {
        if !run.fps.is_finite() || run.fps <= 0.0 {
            return Err(PixmorphError::validation("headless fps must be positive"));
        }
        self.block_until_loaded();

        let frame_ms = 1000.0 / run.fps;
        let mut rendered = 0;
        for i in 0..run.max_frames {
            let now = run.start_ms + i as f64 * frame_ms;
            match self.tick(now) {
                FrameStatus::Rendered => {
                    on_frame(rendered, &mut self.surface);
                    rendered += 1;
                }
                FrameStatus::Pending => {}
                FrameStatus::Finished | FrameStatus::Destroyed => break,
            }
        }
        Ok(rendered)
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Counters for this run.
    pub fn stats(&self) -> MorphStats {
        self.stats
    }

    /// Pool counters.
    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Configuration the run was resolved to.
    pub fn config(&self) -> &ResolvedConfig {
        &self.cfg
    }

    /// The active generation.
    pub fn particles(&self) -> &[Particle] {
        &self.active
    }

    /// Number of active particles.
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Images waiting to be shown.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Images already shown and kept for looping.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Image the active generation is morphing toward.
    pub fn current_image(&self) -> Option<ImageId> {
        self.current
    }

    /// Start colour for particles that have no previous colour.
    pub fn current_color(&self) -> Rgba8 {
        self.current_color
    }

    /// How many image resamples have been computed so far.
    pub fn resample_count(&self) -> u64 {
        self.resample.resample_count()
    }

    /// The surface being drawn on.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

impl<S: Surface> Drop for MorphEngine<S> {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn random_color(rng: &mut fastrand::Rng) -> Rgba8 {
    Rgba8::opaque(rng.u8(..), rng.u8(..), rng.u8(..))
}

#[cfg(test)]
#[path = "../../tests/unit/engine/session.rs"]
mod tests;
