use serde::{Deserialize, Serialize};

use crate::animation::ease::Easing;
use crate::foundation::core::{Point, Rgba8, Vec2};
use crate::particles::physics::{InteractionFrame, PhysicsState};
use crate::particles::spatial::Positioned;
use crate::render::surface::Surface;

/// Progress at which a particle counts as arrived.
pub const COMPLETE_AT: f64 = 0.999;

/// Minimum progress change before the interpolated colour is recomputed.
const COLOR_REFRESH_STEP: f64 = 0.01;

/// How a particle is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointShape {
    /// Filled circle of radius `size`.
    #[default]
    Circle,
    /// Filled square of half extent `size`.
    Square,
}

/// Everything needed to (re)arm a particle for a new generation.
#[derive(Clone, Debug)]
pub struct ParticleInit {
    /// Where the particle should land.
    pub target: Point,
    /// Explicit start; `None` picks a uniform-random point inside `bounds`.
    pub start: Option<Point>,
    /// Surface size used for random starts.
    pub bounds: Vec2,
    /// Radius or half extent.
    pub size: f64,
    /// Draw shape.
    pub shape: PointShape,
    /// Random per-draw offset.
    pub jitter: f64,
    /// Colour at the start of the ramp.
    pub from_color: Rgba8,
    /// Colour at the end of the ramp.
    pub to_color: Rgba8,
    /// Motion and colour easing.
    pub easing: Easing,
    /// Animation length in milliseconds.
    pub duration: f64,
    /// Timestamp (ms) the animation starts at.
    pub now: f64,
}

/// One animated dot: eased motion from `start` to `target`, a colour ramp, and an optional
/// pointer displacement on top.
#[derive(Clone, Debug)]
pub struct Particle {
    id: u64,
    pos: Point,
    base: Point,
    physics: PhysicsState,
    start: Point,
    target: Point,
    start_time: f64,
    duration: f64,
    easing: Easing,
    shape: PointShape,
    size: f64,
    jitter: f64,
    from_color: Rgba8,
    to_color: Rgba8,
    cached_color: Rgba8,
    cached_progress: f64,
    progress: f64,
    completed: bool,
}

impl Particle {
    /// Fresh particle with the given id, armed by `init`.
    pub fn new(id: u64, init: ParticleInit, rng: &mut fastrand::Rng) -> Self {
        let mut p = Self {
            id,
            pos: Point::ZERO,
            base: Point::ZERO,
            physics: PhysicsState::default(),
            start: Point::ZERO,
            target: Point::ZERO,
            start_time: 0.0,
            duration: 1.0,
            easing: Easing::default(),
            shape: PointShape::Circle,
            size: 1.0,
            jitter: 0.0,
            from_color: Rgba8::WHITE,
            to_color: Rgba8::WHITE,
            cached_color: Rgba8::WHITE,
            cached_progress: f64::NEG_INFINITY,
            progress: 0.0,
            completed: false,
        };
        p.reset(init, rng);
        p
    }

    /// Re-arm for a new target. Restarts the clock and zeroes physics.
    pub fn reset(&mut self, init: ParticleInit, rng: &mut fastrand::Rng) {
        let start = init.start.unwrap_or_else(|| {
            Point::new(
                rng.f64() * init.bounds.x.max(0.0),
                rng.f64() * init.bounds.y.max(0.0),
            )
        });
        self.pos = start;
        self.base = start;
        self.physics.reset();
        self.start = start;
        self.target = init.target;
        self.start_time = init.now;
        self.duration = if init.duration.is_finite() {
            init.duration.max(1.0)
        } else {
            1.0
        };
        self.easing = init.easing;
        self.shape = init.shape;
        self.size = init.size.max(0.0);
        self.jitter = init.jitter.max(0.0);
        self.from_color = init.from_color;
        self.to_color = init.to_color;
        self.cached_color = init.from_color;
        self.cached_progress = f64::NEG_INFINITY;
        self.progress = 0.0;
        self.completed = false;
    }

    /// Advance to `now` (ms). `frame` carries pointer physics when interaction is enabled.
    pub fn update(&mut self, now: f64, frame: Option<&InteractionFrame>) {
        let t = ((now - self.start_time) / self.duration).clamp(0.0, 1.0);
        self.progress = self.easing.apply(t);
        self.base = self.start.lerp(self.target, self.progress);
        self.completed = self.progress >= COMPLETE_AT;

        match frame {
            None => {
                self.physics.reset();
                self.pos = self.base;
            }
            Some(frame) => {
                self.physics.step(self.base, frame);
                self.pos = self.base + self.physics.offset;
            }
        }
    }

    /// Draw at the current position with the colour for the current progress.
    pub fn render(&mut self, surface: &mut dyn Surface, rng: &mut fastrand::Rng) {
        let mut center = self.pos;
        if self.jitter > 0.0 {
            center.x += (rng.f64() - 0.5) * self.jitter;
            center.y += (rng.f64() - 0.5) * self.jitter;
        }
        let color = self.current_color();
        match self.shape {
            PointShape::Circle => surface.fill_circle(center, self.size, color),
            PointShape::Square => surface.fill_square(center, self.size, color),
        }
    }

    /// Colour for the current progress. Snaps to the target once complete and otherwise only
    /// recomputes after progress moved by at least 0.01.
    pub fn current_color(&mut self) -> Rgba8 {
        if self.progress >= COMPLETE_AT {
            return self.to_color;
        }
        if (self.progress - self.cached_progress).abs() >= COLOR_REFRESH_STEP {
            self.cached_color = self.from_color.lerp(self.to_color, self.progress);
            self.cached_progress = self.progress;
        }
        self.cached_color
    }

    /// Stable id, preserved across pooling.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Landing position.
    pub fn target(&self) -> Point {
        self.target
    }

    /// Position the animation started from.
    pub fn start(&self) -> Point {
        self.start
    }

    /// Eased progress in `0..=1`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Whether the particle has arrived.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Pointer displacement on top of the eased position.
    pub fn offset(&self) -> Vec2 {
        self.physics.offset
    }

    /// Colour at the end of the ramp.
    pub fn target_color(&self) -> Rgba8 {
        self.to_color
    }
}

impl Positioned for Particle {
    fn position(&self) -> Point {
        self.pos
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/particle.rs"]
mod tests;
