use vello_cpu::kurbo::Shape;

use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::{PixmorphError, PixmorphResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8};
use crate::render::surface::{CompositeOp, ReadError, Surface};

const CIRCLE_TOLERANCE: f64 = 0.1;

/// Reference [`Surface`] backed by `vello_cpu`.
///
/// Particle draws are rasterized into a transient layer; [`Surface::flush`] composites that layer
/// onto the persistent premultiplied frame buffer with the current [`CompositeOp`]. The frame
/// buffer is never cleared implicitly, which is what makes trails possible.
pub struct CpuSurface {
    width: u16,
    height: u16,
    frame: vello_cpu::Pixmap,
    layer: vello_cpu::Pixmap,
    ctx: vello_cpu::RenderContext,
    pending: bool,
    composite: CompositeOp,
    container: Option<String>,
    readable: bool,
}

impl CpuSurface {
    /// Transparent surface of `width x height` pixels.
    pub fn new(width: u32, height: u32) -> PixmorphResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| PixmorphError::surface("surface width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| PixmorphError::surface("surface height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(PixmorphError::surface("surface must be at least 1x1"));
        }
        Ok(Self {
            width: w,
            height: h,
            frame: vello_cpu::Pixmap::new(w, h),
            layer: vello_cpu::Pixmap::new(w, h),
            ctx: vello_cpu::RenderContext::new(w, h),
            pending: false,
            composite: CompositeOp::SourceOver,
            container: None,
            readable: true,
        })
    }

    /// Simulate a surface whose pixels may not be read back.
    pub fn set_readable(&mut self, readable: bool) {
        self.readable = readable;
    }

    /// Container the surface is attached to, if any.
    pub fn container(&self) -> Option<&str> {
        self.container.as_deref()
    }

    /// Premultiplied RGBA8 of everything flushed so far.
    pub fn premul_data(&self) -> &[u8] {
        self.frame.data_as_u8_slice()
    }

    /// Straight-alpha RGBA8 copy of the frame buffer, suitable for encoding.
    pub fn frame_rgba(&mut self) -> Vec<u8> {
        self.flush();
        let mut out = self.frame.data_as_u8_slice().to_vec();
        for px in out.chunks_exact_mut(4) {
            let c = Rgba8::from_premul([px[0], px[1], px[2], px[3]]);
            px.copy_from_slice(&[c.r, c.g, c.b, c.a]);
        }
        out
    }
}

impl Surface for CpuSurface {
    fn size(&self) -> (u32, u32) {
        (u32::from(self.width), u32::from(self.height))
    }

    fn attach(&mut self, container: &str) -> PixmorphResult<()> {
        if container.trim().is_empty() {
            return Err(PixmorphError::surface("container selector must be non-empty"));
        }
        self.container = Some(container.to_owned());
        Ok(())
    }

    fn detach(&mut self) {
        self.container = None;
    }

    fn clear(&mut self, backdrop: Rgba8) {
        self.flush();
        let px = backdrop.to_premul();
        for d in self.frame.data_as_u8_slice_mut().chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
    }

    fn fill_all(&mut self, color: Rgba8, alpha: f64) {
        self.flush();
        let src = color.with_opacity(alpha).to_premul();
        if src[3] == 0 {
            return;
        }
        for d in self.frame.data_as_u8_slice_mut().chunks_exact_mut(4) {
            let out = source_over([d[0], d[1], d[2], d[3]], src);
            d.copy_from_slice(&out);
        }
    }

    fn set_composite(&mut self, op: CompositeOp) {
        if op != self.composite {
            self.flush();
            self.composite = op;
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        if radius <= 0.0 || color.a == 0 {
            return;
        }
        let path = vello_cpu::kurbo::Circle::new((center.x, center.y), radius)
            .to_path(CIRCLE_TOLERANCE);
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, color.a));
        self.ctx.fill_path(&path);
        self.pending = true;
    }

    fn fill_square(&mut self, center: Point, half_extent: f64, color: Rgba8) {
        if half_extent <= 0.0 || color.a == 0 {
            return;
        }
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, color.a));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            center.x - half_extent,
            center.y - half_extent,
            center.x + half_extent,
            center.y + half_extent,
        ));
        self.pending = true;
    }

    fn flush(&mut self) {
        if !self.pending {
            return;
        }
        self.layer.data_as_u8_slice_mut().fill(0);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.layer);
        self.ctx.reset();
        self.pending = false;

        composite_in_place(
            self.frame.data_as_u8_slice_mut(),
            self.layer.data_as_u8_slice(),
            self.composite,
        );
    }

    fn read_pixel(&self, x: i64, y: i64) -> Result<Rgba8, ReadError> {
        if !self.readable {
            return Err(ReadError::Tainted);
        }
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return Err(ReadError::OutOfBounds { x, y });
        }
        let i = ((y as usize) * usize::from(self.width) + (x as usize)) * 4;
        let px = self
            .frame
            .data_as_u8_slice()
            .get(i..i + 4)
            .ok_or(ReadError::Unavailable)?;
        Ok(Rgba8::from_premul([px[0], px[1], px[2], px[3]]))
    }
}

type Premul = [u8; 4];

fn source_over(d: Premul, s: Premul) -> Premul {
    let inv = 255u16 - u16::from(s[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = add_sat_u8(s[i], mul_div255_u8(u16::from(d[i]), inv));
    }
    out
}

fn destination_over(d: Premul, s: Premul) -> Premul {
    source_over(s, d)
}

fn xor(d: Premul, s: Premul) -> Premul {
    let inv_sa = 255u16 - u16::from(s[3]);
    let inv_da = 255u16 - u16::from(d[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = add_sat_u8(
            mul_div255_u8(u16::from(s[i]), inv_da),
            mul_div255_u8(u16::from(d[i]), inv_sa),
        );
    }
    out
}

fn lighter(d: Premul, s: Premul) -> Premul {
    [
        add_sat_u8(d[0], s[0]),
        add_sat_u8(d[1], s[1]),
        add_sat_u8(d[2], s[2]),
        add_sat_u8(d[3], s[3]),
    ]
}

/// Separable blend on unpremultiplied channels, composited source-over:
/// `out_p = sp * (1 - da) + dp * (1 - sa) + B(sc, dc) * sa * da`.
#[inline(always)]
fn blend_with<F>(d: Premul, s: Premul, blend_fn: &F) -> Premul
where
    F: Fn(f32, f32) -> f32,
{
    let sa = f32::from(s[3]) / 255.0;
    let da = f32::from(d[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);

    let mut out = [0u8; 4];
    for i in 0..3 {
        let sp = f32::from(s[i]) / 255.0;
        let dp = f32::from(d[i]) / 255.0;
        let sc = if sa > 0.0 { (sp / sa).min(1.0) } else { 0.0 };
        let dc = if da > 0.0 { (dp / da).min(1.0) } else { 0.0 };
        let v = sp * (1.0 - da) + dp * (1.0 - sa) + blend_fn(sc, dc) * sa * da;
        out[i] = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    }
    out[3] = (out_a.clamp(0.0, 1.0) * 255.0).round() as u8;
    out
}

fn apply_kernel(dst: &mut [u8], src: &[u8], kernel: impl Fn(Premul, Premul) -> Premul) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let out = kernel([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
}

/// Composite a premultiplied layer onto a premultiplied destination of the same size.
///
/// The operation is dispatched once per call, not per pixel.
pub(crate) fn composite_in_place(dst: &mut [u8], src: &[u8], op: CompositeOp) {
    match op {
        CompositeOp::SourceOver => apply_kernel(dst, src, source_over),
        CompositeOp::DestinationOver => apply_kernel(dst, src, destination_over),
        CompositeOp::Copy => {
            let n = dst.len().min(src.len());
            dst[..n].copy_from_slice(&src[..n]);
        }
        CompositeOp::Xor => apply_kernel(dst, src, xor),
        CompositeOp::Lighter => apply_kernel(dst, src, lighter),
        CompositeOp::Multiply => apply_kernel(dst, src, |d, s| blend_with(d, s, &|s, d| s * d)),
        CompositeOp::Screen => {
            apply_kernel(dst, src, |d, s| blend_with(d, s, &|s, d| s + d - s * d))
        }
        CompositeOp::Overlay => apply_kernel(dst, src, |d, s| {
            blend_with(d, s, &|s, d| {
                if d <= 0.5 {
                    2.0 * s * d
                } else {
                    1.0 - 2.0 * (1.0 - s) * (1.0 - d)
                }
            })
        }),
        CompositeOp::Darken => apply_kernel(dst, src, |d, s| blend_with(d, s, &|s, d| s.min(d))),
        CompositeOp::Lighten => apply_kernel(dst, src, |d, s| blend_with(d, s, &|s, d| s.max(d))),
        CompositeOp::Difference => {
            apply_kernel(dst, src, |d, s| blend_with(d, s, &|s, d| (d - s).abs()))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
