use serde::{Deserialize, Serialize};

/// How a source image maps onto the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Native pixel size.
    None,
    /// Uniform scale so the whole image is visible.
    #[default]
    Contain,
    /// Uniform scale so the image covers the whole surface.
    Cover,
    /// Independent scale per axis to fill exactly.
    Stretch,
}

/// Placement of the drawn image along one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// Left or top.
    #[serde(alias = "left", alias = "top")]
    Start,
    /// Centred.
    #[default]
    Center,
    /// Right or bottom.
    #[serde(alias = "right", alias = "bottom")]
    End,
}

impl Align {
    fn offset(self, remaining: f64) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Center => remaining / 2.0,
            Self::End => remaining,
        }
    }
}

/// Image-to-surface mapping: `surface = offset + image * scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitTransform {
    /// Horizontal scale.
    pub scale_x: f64,
    /// Vertical scale.
    pub scale_y: f64,
    /// Left edge of the drawn image.
    pub offset_x: f64,
    /// Top edge of the drawn image.
    pub offset_y: f64,
    /// Drawn size in surface pixels.
    pub drawn_width: f64,
    /// Drawn height in surface pixels.
    pub drawn_height: f64,
}

/// Place an `img_w x img_h` image on the surface.
pub fn compute_transform(
    img_w: u32,
    img_h: u32,
    surface_w: u32,
    surface_h: u32,
    fit: FitMode,
    align_x: Align,
    align_y: Align,
) -> FitTransform {
    let iw = f64::from(img_w.max(1));
    let ih = f64::from(img_h.max(1));
    let sw = f64::from(surface_w);
    let sh = f64::from(surface_h);

    let (scale_x, scale_y) = match fit {
        FitMode::Stretch => (sw / iw, sh / ih),
        FitMode::Contain => {
            let s = (sw / iw).min(sh / ih);
            (s, s)
        }
        FitMode::Cover => {
            let s = (sw / iw).max(sh / ih);
            (s, s)
        }
        FitMode::None => (1.0, 1.0),
    };

    let drawn_width = iw * scale_x;
    let drawn_height = ih * scale_y;
    FitTransform {
        scale_x,
        scale_y,
        offset_x: align_x.offset(sw - drawn_width),
        offset_y: align_y.offset(sh - drawn_height),
        drawn_width,
        drawn_height,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sampling/fit.rs"]
mod tests;
