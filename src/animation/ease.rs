use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

/// Built-in easing curves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ease {
    /// Identity.
    Linear,
    /// Quadratic, accelerating.
    InQuad,
    /// Quadratic, decelerating.
    OutQuad,
    /// Quadratic, both ends.
    InOutQuad,
    /// Cubic, accelerating.
    InCubic,
    /// Cubic, decelerating.
    OutCubic,
    /// Cubic, both ends.
    InOutCubic,
    /// Elastic overshoot at the start.
    InElastic,
    /// Elastic overshoot at the end.
    OutElastic,
    /// Elastic overshoot at both ends.
    InOutElastic,
    /// Bounce at the start.
    InBounce,
    /// Bounce at the end.
    OutBounce,
    /// Bounce at both ends.
    InOutBounce,
}

impl Ease {
    /// Every built-in curve.
    pub const ALL: [Ease; 13] = [
        Ease::Linear,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
        Ease::InElastic,
        Ease::OutElastic,
        Ease::InOutElastic,
        Ease::InBounce,
        Ease::OutBounce,
        Ease::InOutBounce,
    ];

    /// Look up a curve by name. CSS keywords alias the cubic family.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.trim() {
            "linear" => Self::Linear,
            "ease" | "ease-in-out" | "easeInOutCubic" => Self::InOutCubic,
            "ease-in" | "easeInCubic" => Self::InCubic,
            "ease-out" | "easeOutCubic" => Self::OutCubic,
            "easeInQuad" => Self::InQuad,
            "easeOutQuad" => Self::OutQuad,
            "easeInOutQuad" => Self::InOutQuad,
            "easeInElastic" => Self::InElastic,
            "easeOutElastic" => Self::OutElastic,
            "easeInOutElastic" => Self::InOutElastic,
            "easeInBounce" => Self::InBounce,
            "easeOutBounce" => Self::OutBounce,
            "easeInOutBounce" => Self::InOutBounce,
            _ => return None,
        })
    }

    /// Evaluate the curve at `t`, clamped to `0..=1`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => t * (2.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => (t - 1.0).powi(3) + 1.0,
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::InElastic => {
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    let c4 = (2.0 * PI) / 3.0;
                    -(2f64.powf(10.0 * t - 10.0)) * ((10.0 * t - 10.75) * c4).sin()
                }
            }
            Self::OutElastic => {
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    let c4 = (2.0 * PI) / 3.0;
                    2f64.powf(-10.0 * t) * ((10.0 * t - 0.75) * c4).sin() + 1.0
                }
            }
            Self::InOutElastic => {
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    let c5 = (2.0 * PI) / 4.5;
                    if t < 0.5 {
                        -(2f64.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * c5).sin()) / 2.0
                    } else {
                        (2f64.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * c5).sin()) / 2.0
                            + 1.0
                    }
                }
            }
            Self::InBounce => 1.0 - out_bounce(1.0 - t),
            Self::OutBounce => out_bounce(t),
            Self::InOutBounce => {
                if t < 0.5 {
                    (1.0 - out_bounce(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + out_bounce(2.0 * t - 1.0)) / 2.0
                }
            }
        }
    }
}

fn out_bounce(t: f64) -> f64 {
    const N1: f64 = 7.5625;
    const D1: f64 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

/// Caller-supplied easing function, used verbatim.
#[derive(Clone)]
pub struct CustomEase(Arc<dyn Fn(f64) -> f64 + Send + Sync>);

impl CustomEase {
    /// Wrap a function of progress in `0..=1`.
    pub fn new(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }
}

impl fmt::Debug for CustomEase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomEase(..)")
    }
}

/// Easing selector carried by every particle: a named curve or a custom function.
#[derive(Clone, Debug)]
pub enum Easing {
    /// A built-in curve.
    Named(Ease),
    /// A caller-supplied function.
    Custom(CustomEase),
}

impl Default for Easing {
    fn default() -> Self {
        Self::Named(Ease::InOutCubic)
    }
}

impl Easing {
    /// Resolve a name; unknown names fall back to `easeInOutCubic`.
    pub fn from_name(name: &str) -> Self {
        Self::Named(Ease::from_name(name).unwrap_or(Ease::InOutCubic))
    }

    /// Easing backed by a caller-supplied function.
    pub fn custom(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::Custom(CustomEase::new(f))
    }

    /// Eased value at progress `t`.
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Self::Named(ease) => ease.apply(t),
            Self::Custom(CustomEase(f)) => f(t.clamp(0.0, 1.0)),
        }
    }
}

impl<'de> serde::Deserialize<'de> for Easing {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = Option::<String>::deserialize(deserializer)?;
        Ok(name.as_deref().map(Easing::from_name).unwrap_or_default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
