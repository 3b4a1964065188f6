use serde::{Deserialize, Serialize};

use crate::foundation::core::{Point, Vec2};

/// Reference rate the damping factor is expressed against.
const DAMPING_REFERENCE_HZ: f64 = 60.0;

/// Force applied around the pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// No force.
    None,
    /// Push particles away from the pointer.
    #[default]
    Repel,
    /// Pull particles toward the pointer.
    Attract,
    /// Swirl particles around the pointer.
    Vortex,
}

/// One-frame velocity kick staged by a pointer press.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Burst {
    /// Press position, surface pixels.
    pub center: Point,
    /// Reach of the kick.
    pub radius: f64,
    /// Impulse at the centre.
    pub strength: f64,
}

/// Interaction inputs for one frame, shared by every particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionFrame {
    /// Force applied around the pointer.
    pub mode: InteractionMode,
    /// Pointer position in surface pixels while the pointer is over the surface.
    pub pointer: Option<Point>,
    /// Influence radius.
    pub radius: f64,
    /// Force strength.
    pub strength: f64,
    /// Velocity retained per 1/60 s.
    pub damping: f64,
    /// Spring constant.
    pub spring: f64,
    /// Burst staged for this frame.
    pub burst: Option<Burst>,
    /// Seconds since the previous frame.
    pub dt: f64,
}

impl InteractionFrame {
    /// Largest displacement allowed on each axis.
    pub fn offset_limit(&self) -> f64 {
        (self.radius * 1.5).max(10.0)
    }
}

/// Spring-damper displacement layered on top of a particle's eased position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PhysicsState {
    /// Current displacement.
    pub offset: Vec2,
    /// Current velocity.
    pub velocity: Vec2,
}

impl PhysicsState {
    /// Back to rest.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.velocity = Vec2::ZERO;
    }

    /// Advance one semi-implicit Euler step for a particle whose eased position is `base`.
    pub fn step(&mut self, base: Point, frame: &InteractionFrame) {
        let pos = base + self.offset;
        let mut acc = Vec2::ZERO;

        if let Some(pointer) = frame.pointer
            && frame.mode != InteractionMode::None
            && frame.radius > 0.0
        {
            let d = pos - pointer;
            let dist = d.hypot();
            if dist < frame.radius && dist > 1e-6 {
                let n = d / dist;
                let f = frame.strength * (1.0 - dist / frame.radius);
                acc += match frame.mode {
                    InteractionMode::Repel => n * f,
                    InteractionMode::Attract => -n * f,
                    InteractionMode::Vortex => Vec2::new(-n.y, n.x) * f,
                    InteractionMode::None => Vec2::ZERO,
                };
            }
        }

        if let Some(burst) = frame.burst
            && burst.radius > 0.0
        {
            let d = pos - burst.center;
            let dist = d.hypot();
            if dist < burst.radius && dist > 1e-6 {
                self.velocity += d / dist * (burst.strength * (1.0 - dist / burst.radius));
            }
        }

        acc -= self.offset * frame.spring;

        let dt = frame.dt.max(0.0);
        self.velocity += acc * dt;
        self.velocity *= frame.damping.clamp(0.0, 1.0).powf(dt * DAMPING_REFERENCE_HZ);
        self.offset += self.velocity * dt;

        let limit = frame.offset_limit();
        self.offset.x = self.offset.x.clamp(-limit, limit);
        self.offset.y = self.offset.y.clamp(-limit, limit);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/physics.rs"]
mod tests;
