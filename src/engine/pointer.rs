use serde::{Deserialize, Serialize};

use crate::foundation::core::Point;

/// A pointer event in host (displayed) coordinates.
///
/// `display_width`/`display_height` are the size the surface is shown at, which can differ from
/// its backing-store size on high-density displays or when the host scales it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerEvent {
    /// Horizontal position, host pixels.
    pub x: f64,
    /// Vertical position, host pixels.
    pub y: f64,
    /// Displayed surface width, host pixels.
    pub display_width: f64,
    /// Displayed surface height, host pixels.
    pub display_height: f64,
}

impl PointerEvent {
    /// Event at `(x, y)` over a surface shown at the given size.
    pub fn new(x: f64, y: f64, display_width: f64, display_height: f64) -> Self {
        Self {
            x,
            y,
            display_width,
            display_height,
        }
    }

    /// Map into backing-store pixels of a `surface_w x surface_h` surface.
    pub fn to_surface(&self, surface_w: u32, surface_h: u32) -> Point {
        let scale = |backing: u32, displayed: f64| {
            if displayed.is_finite() && displayed > 0.0 {
                f64::from(backing) / displayed
            } else {
                1.0
            }
        };
        Point::new(
            self.x * scale(surface_w, self.display_width),
            self.y * scale(surface_h, self.display_height),
        )
    }
}

/// Tracks whether the pointer is over the surface, where, and any staged press burst.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerTracker {
    active: bool,
    position: Option<Point>,
    burst: Option<Point>,
}

impl PointerTracker {
    /// Inactive tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer moved over the surface.
    pub fn moved(&mut self, ev: &PointerEvent, surface: (u32, u32)) {
        self.active = true;
        self.position = Some(ev.to_surface(surface.0, surface.1));
    }

    /// Pointer left the surface.
    pub fn left(&mut self) {
        self.active = false;
    }

    /// Press: track the position and stage a burst there for the next pass.
    pub fn pressed(&mut self, ev: &PointerEvent, surface: (u32, u32)) {
        self.moved(ev, surface);
        self.burst = self.position;
    }

    /// Pointer position while it is over the surface.
    pub fn pointer(&self) -> Option<Point> {
        if self.active { self.position } else { None }
    }

    /// Whether the pointer is over the surface.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether a press burst waits for the next frame.
    pub fn has_pending_burst(&self) -> bool {
        self.burst.is_some()
    }

    /// Consume the staged burst, if any.
    pub fn take_burst(&mut self) -> Option<Point> {
        self.burst.take()
    }

    /// Forget position and any staged burst.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/pointer.rs"]
mod tests;
